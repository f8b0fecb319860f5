//! SQL DDL for initializing the dealership store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `motos`: one row per listing, `preco` held as integer cents,
///   `imagem_url` duplicating the cover path from `moto_imagens`,
///   `marca_chave` the Unicode-lowercased brand used by the brand filter
/// - `moto_imagens`: images owned by a listing, removed with it (`ON DELETE CASCADE`)
/// - `usuarios`: admin credentials, `username` UNIQUE, PHC-format hash
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS motos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    marca TEXT NOT NULL,
    marca_chave TEXT NOT NULL DEFAULT '', -- lowercased marca, for filtering
    modelo TEXT NOT NULL,
    ano INTEGER NOT NULL,
    km INTEGER NOT NULL,
    preco INTEGER NOT NULL, -- cents
    imagem_url TEXT NULL,
    descricao TEXT NULL,
    destaque INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_motos_marca_chave ON motos(marca_chave);

CREATE TABLE IF NOT EXISTS moto_imagens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    moto_id INTEGER NOT NULL REFERENCES motos(id) ON DELETE CASCADE,
    imagem_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_moto_imagens_moto_id ON moto_imagens(moto_id);

CREATE TABLE IF NOT EXISTS usuarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);
"#;
