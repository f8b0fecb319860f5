mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{TestApp, read_json};
use mybmotos::service::credential_check::CredentialChecker;

fn login_request(username: &str, password: &str) -> Request<Body> {
    let payload = serde_json::json!({ "username": username, "password": password });
    Request::post("/api/login")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("failed to build request")
}

#[tokio::test]
async fn login_accepts_correct_credentials() {
    let t = TestApp::spawn("login-ok").await;
    CredentialChecker::new(t.pool.clone())
        .ensure_user("admin", "008856ga")
        .await
        .unwrap();

    let (status, body) = read_json(t.send(login_request("admin", "008856ga")).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login bem-sucedido");

    t.cleanup();
}

#[tokio::test]
async fn wrong_password_and_unknown_user_share_one_401() {
    let t = TestApp::spawn("login-401").await;
    CredentialChecker::new(t.pool.clone())
        .ensure_user("admin", "008856ga")
        .await
        .unwrap();

    let (wrong_status, wrong_body) =
        read_json(t.send(login_request("admin", "nope")).await).await;
    let (unknown_status, unknown_body) =
        read_json(t.send(login_request("fulano", "008856ga")).await).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Credenciais inválidas");

    t.cleanup();
}

#[tokio::test]
async fn malformed_login_body_answers_with_json_error() {
    let t = TestApp::spawn("login-bad-json").await;
    let broken = Request::post("/api/login")
        .header("content-type", "application/json")
        .body(Body::from("{bad"))
        .expect("failed to build request");
    let (status, body) = read_json(t.send(broken).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let untyped = Request::post("/api/login")
        .body(Body::from(r#"{"username":"admin"}"#))
        .expect("failed to build request");
    let (status, body) = read_json(t.send(untyped).await).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    t.cleanup();
}

#[tokio::test]
async fn malformed_financing_query_answers_with_json_error() {
    let t = TestApp::spawn("financing-bad-query").await;
    for uri in [
        "/api/financiamento?valor=1000&parcelas=",
        "/api/financiamento?valor=1000&parcelas=doze",
        "/api/financiamento?valor=1000&valor=2000&parcelas=12",
    ] {
        let (status, body) = t.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
    }

    t.cleanup();
}

#[tokio::test]
async fn financing_quote_clamps_down_payment() {
    let t = TestApp::spawn("financing").await;
    let (status, body) = t
        .get_json("/api/financiamento?valor=10000&entrada=2000&parcelas=12")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valor_financiado"], "8000.00");
    assert_eq!(body["data"]["parcela"], "756.01");
    assert_eq!(body["data"]["taxa_mensal"], "0.0199");

    let (_, clamped) = t
        .get_json("/api/financiamento?valor=5000&entrada=9000&parcelas=24")
        .await;
    assert_eq!(clamped["data"]["entrada"], "5000.00");
    assert_eq!(clamped["data"]["parcela"], "0.00");

    let (bad, _) = t
        .get_json("/api/financiamento?valor=abc&parcelas=12")
        .await;
    assert_eq!(bad, StatusCode::BAD_REQUEST);

    t.cleanup();
}
