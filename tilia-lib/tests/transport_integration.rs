//! `ReqwestTransport` against a mock HTTP server.
//!
//! ```bash
//! cargo test -p tilia-lib --test transport_integration
//! ```

#![cfg(feature = "http-transport")]

use std::time::Duration;

use tilia_lib::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, TiliaErrorCode};
use wiremock::{
    matchers::{body_string, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn request(method: HttpMethod, url: String, body: Option<&str>) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "Bearer tok-1".to_string()),
        ],
        body: body.map(str::to_string),
    }
}

#[tokio::test]
async fn test_get_sends_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/invoice/inv-1"))
        .and(header("Accept", "application/json"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Success",
            "payload": {"invoice_id": "inv-1"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(5).unwrap();
    let response = transport
        .execute(request(
            HttpMethod::Get,
            format!("{}/v2/invoice/inv-1", mock_server.uri()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.error.is_none());
    assert!(response.body.contains("inv-1"));
}

#[tokio::test]
async fn test_empty_post_stays_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/escrow/esc-1/pay"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"Success"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(5).unwrap();
    let response = transport
        .execute(request(
            HttpMethod::Post,
            format!("{}/v2/escrow/esc-1/pay", mock_server.uri()),
            Some(""),
        ))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_put_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/register/reg-1"))
        .and(body_string("reg-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/acc/payout/p-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(5).unwrap();
    let put = transport
        .execute(request(
            HttpMethod::Put,
            format!("{}/v2/register/reg-1", mock_server.uri()),
            Some("reg-1"),
        ))
        .await
        .unwrap();
    let delete = transport
        .execute(request(
            HttpMethod::Delete,
            format!("{}/v2/acc/payout/p-1", mock_server.uri()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(put.status, 200);
    assert_eq!(delete.status, 204);
    assert!(delete.body.is_empty());
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/kyc/acc-1"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"status":"Failed"}"#))
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(5).unwrap();
    let response = transport
        .execute(request(
            HttpMethod::Get,
            format!("{}/v1/kyc/acc-1", mock_server.uri()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert!(response.error.as_deref().unwrap().contains("404"));
    assert_eq!(response.body, r#"{"status":"Failed"}"#);
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(1).unwrap();
    let err = transport
        .execute(request(
            HttpMethod::Get,
            format!("{}/slow", mock_server.uri()),
            None,
        ))
        .await
        .unwrap_err();

    assert_eq!(err.code(), TiliaErrorCode::ConnectionTimeout);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused() {
    let transport = ReqwestTransport::new(5).unwrap();
    let err = transport
        .execute(request(
            HttpMethod::Get,
            "http://127.0.0.1:1/unreachable".to_string(),
            None,
        ))
        .await
        .unwrap_err();

    assert_eq!(err.code(), TiliaErrorCode::ConnectionFailed);
}
