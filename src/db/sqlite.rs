use crate::db::models::{DbListing, DbListingImage, DbUser};
use crate::db::schema::SQLITE_INIT;
use crate::error::DealerError;
use crate::types::listing::ListingFields;
use crate::types::price::Price;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite, SqliteConnection};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const LISTING_COLUMNS: &str =
    "id, marca, modelo, ano, km, preco, imagem_url, descricao, destaque";

/// Open the pool (creating the database file if missing) and apply the schema.
///
/// Foreign keys are switched on per connection; the image cascade depends on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DealerError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(connect_opts)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DealerError> {
    // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Optional filters for the stock listing.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Case-insensitive exact brand match.
    pub brand: Option<String>,
    /// Substring of the model name.
    pub keyword: Option<String>,
}

#[derive(Clone)]
pub struct ListingsStorage {
    pool: SqlitePool,
}

impl ListingsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Filtered listing, newest id first. Absent filters match everything.
    pub async fn list(&self, filter: &ListingFilter) -> Result<Vec<DbListing>, DealerError> {
        let keyword_pattern = filter
            .keyword
            .as_deref()
            .map(|k| format!("%{}%", escape_like(k)));
        let rows = sqlx::query(&format!(
            r#"SELECT {LISTING_COLUMNS} FROM motos
               WHERE (?1 IS NULL OR marca_chave = ?1)
                 AND (?2 IS NULL OR modelo LIKE ?2 ESCAPE '\')
               ORDER BY id DESC"#
        ))
        .bind(filter.brand.as_deref().map(brand_key))
        .bind(keyword_pattern)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_listing).collect()
    }

    pub async fn list_featured(&self) -> Result<Vec<DbListing>, DealerError> {
        let rows = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM motos WHERE destaque = 1 ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_listing).collect()
    }

    pub async fn distinct_brands(&self) -> Result<Vec<String>, DealerError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT marca FROM motos ORDER BY marca ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(b,)| b).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DbListing>, DealerError> {
        let row = sqlx::query(&format!("SELECT {LISTING_COLUMNS} FROM motos WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_listing).transpose()
    }

    pub async fn images_for(&self, listing_id: i64) -> Result<Vec<DbListingImage>, DealerError> {
        let rows = sqlx::query_as::<_, DbListingImage>(
            "SELECT id, moto_id, imagem_url FROM moto_imagens WHERE moto_id = ? ORDER BY id",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Remove a listing; its image rows go with it through the cascade.
    /// Returns whether a row existed.
    pub async fn delete_listing(&self, id: i64) -> Result<bool, DealerError> {
        let res = sqlx::query("DELETE FROM motos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Remove one image row by its own id. Returns whether a row existed.
    pub async fn delete_image(&self, image_id: i64) -> Result<bool, DealerError> {
        let res = sqlx::query("DELETE FROM moto_imagens WHERE id = ?")
            .bind(image_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // Statements below run on a caller-supplied connection so the write
    // service can group them in one transaction.

    pub async fn insert_listing(
        conn: &mut SqliteConnection,
        fields: &ListingFields,
        cover: &str,
    ) -> Result<i64, DealerError> {
        let res = sqlx::query(
            r#"
            INSERT INTO motos
                (marca, marca_chave, modelo, ano, km, preco, imagem_url, descricao, destaque)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.brand)
        .bind(brand_key(&fields.brand))
        .bind(&fields.model)
        .bind(fields.year)
        .bind(fields.odometer_km)
        .bind(fields.price.cents())
        .bind(cover)
        .bind(fields.description.as_deref())
        .bind(fields.featured as i64)
        .execute(&mut *conn)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Full overwrite of the text fields. Returns whether the listing exists.
    pub async fn update_fields(
        conn: &mut SqliteConnection,
        id: i64,
        fields: &ListingFields,
    ) -> Result<bool, DealerError> {
        let res = sqlx::query(
            r#"UPDATE motos SET
                marca = ?,
                marca_chave = ?,
                modelo = ?,
                ano = ?,
                km = ?,
                preco = ?,
                descricao = ?,
                destaque = ?
              WHERE id = ?"#,
        )
        .bind(&fields.brand)
        .bind(brand_key(&fields.brand))
        .bind(&fields.model)
        .bind(fields.year)
        .bind(fields.odometer_km)
        .bind(fields.price.cents())
        .bind(fields.description.as_deref())
        .bind(fields.featured as i64)
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn insert_image(
        conn: &mut SqliteConnection,
        listing_id: i64,
        path: &str,
    ) -> Result<i64, DealerError> {
        let res = sqlx::query("INSERT INTO moto_imagens (moto_id, imagem_url) VALUES (?, ?)")
            .bind(listing_id)
            .bind(path)
            .execute(&mut *conn)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn set_cover(
        conn: &mut SqliteConnection,
        listing_id: i64,
        path: &str,
    ) -> Result<(), DealerError> {
        sqlx::query("UPDATE motos SET imagem_url = ? WHERE id = ?")
            .bind(path)
            .bind(listing_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    fn row_to_listing(row: SqliteRow) -> Result<DbListing, DealerError> {
        let id: i64 = row.try_get("id")?;
        let brand: String = row.try_get("marca")?;
        let model: String = row.try_get("modelo")?;
        let year: i64 = row.try_get("ano")?;
        let odometer_km: i64 = row.try_get("km")?;
        let price_cents: i64 = row.try_get("preco")?;
        let imagem_url: Option<String> = row.try_get("imagem_url")?;
        let description: Option<String> = row.try_get("descricao")?;
        let featured_i: i64 = row.try_get("destaque")?;

        Ok(DbListing {
            id,
            brand,
            model,
            year,
            odometer_km,
            price: Price::from_cents(price_cents),
            imagem_url,
            description,
            featured: featured_i != 0,
        })
    }
}

/// Escape LIKE metacharacters so the keyword matches literally.
/// Brand comparison key. SQLite's `UPPER`/`LOWER` only fold ASCII, so the
/// key is computed here with full Unicode lowercasing.
fn brand_key(brand: &str) -> String {
    brand.to_lowercase()
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Clone)]
pub struct UsersStorage {
    pool: SqlitePool,
}

impl UsersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<DbUser>, DealerError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, password_hash FROM usuarios WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert unless the username is taken. Returns whether a row was written.
    pub async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, DealerError> {
        let res = sqlx::query(
            "INSERT INTO usuarios (username, password_hash) VALUES (?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
