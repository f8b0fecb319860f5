#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use serde_json::Value;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const BOUNDARY: &str = "----mybmotos-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub pool: mybmotos::db::SqlitePool,
    pub cfg: mybmotos::config::Config,
    db_path: PathBuf,
    assets_dir: PathBuf,
}

impl TestApp {
    pub async fn spawn(tag: &str) -> Self {
        Self::spawn_with(tag, |_| {}).await
    }

    pub async fn spawn_with(tag: &str, tweak: impl FnOnce(&mut mybmotos::config::Config)) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let stem = format!("mybmotos-it-{tag}-{}-{nanos}", std::process::id());
        let db_path = std::env::temp_dir().join(format!("{stem}.sqlite"));
        let assets_dir = std::env::temp_dir().join(format!("{stem}-assets"));

        let mut cfg = mybmotos::config::Config::default();
        cfg.storage.assets_dir = assets_dir.clone();
        tweak(&mut cfg);

        let pool = mybmotos::db::connect(&format!("sqlite:{}", db_path.display()))
            .await
            .expect("failed to open test database");
        let state = mybmotos::DealerState::new(pool.clone(), &cfg);
        let app = mybmotos::dealer_router(state);

        Self {
            app,
            pool,
            cfg,
            db_path,
            assets_dir,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.expect("request failed")
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let resp = self
            .send(Request::get(uri).body(Body::empty()).expect("failed to build request"))
            .await;
        read_json(resp).await
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count query failed");
        n
    }

    pub fn asset_path(&self, path_ref: &str) -> PathBuf {
        let rel = path_ref.strip_prefix("assets/").expect("path outside assets");
        rel.split('/').fold(self.assets_dir.clone(), |acc, s| acc.join(s))
    }

    pub fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.db_path);
        let _ = std::fs::remove_dir_all(&self.assets_dir);
    }
}

pub async fn read_json(resp: Response<Body>) -> (StatusCode, Value) {
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Hand-rolled multipart/form-data body.
pub struct FormBody {
    buf: Vec<u8>,
}

impl FormBody {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn listing(self, brand: &str, model: &str) -> Self {
        self.text("marca", brand)
            .text("modelo", model)
            .text("ano", "2023")
            .text("km", "9481")
            .text("preco", "16499.99")
            .text("descricao", "Manual e chave. Financiamos e pegamos troca.")
    }

    pub fn request(mut self, method: &str, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.buf))
            .expect("failed to build request")
    }
}

/// Create a listing through the API and return its id.
pub async fn create_listing(app: &TestApp, brand: &str, model: &str, files: &[&str]) -> i64 {
    let form = files.iter().fold(FormBody::new().listing(brand, model), |f, name| {
        f.file("imagens[]", name, name.as_bytes())
    });
    let (status, body) = read_json(app.send(form.request("POST", "/api/motos")).await).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_i64().expect("create response without id")
}
