use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde_json::json;

use crate::config::Settings;

/// Liveness route for the monitor process itself.
/// Answers whether this process is alive, never whether the watched
/// target is healthy. Guarded by the shared token, compared byte for byte.
#[get("/health")]
pub async fn health_route(req: HttpRequest, settings: web::Data<Settings>) -> impl Responder {
    let presented = req.headers().get("X-Token").and_then(|value| value.to_str().ok());

    if presented == Some(settings.ssl_token.as_str()) {
        HttpResponse::Ok().json(json!({ "status": "OK" }))
    } else {
        HttpResponse::Forbidden().json(json!({ "detail": "Invalid Token" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test};

    use crate::config::NotifyPolicy;

    fn settings() -> Settings {
        Settings {
            remote_url: "https://api.example.com".to_string(),
            check_interval: Duration::from_secs(60),
            retry_interval: Duration::from_secs(900),
            probe_timeout: Duration::from_secs(60),
            ssl_token: "sekrit".to_string(),
            telegram_token: "123:abc".to_string(),
            telegram_chat_id: "42".to_string(),
            notify_policy: NotifyPolicy::Transition,
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }

    async fn call(token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new().app_data(web::Data::new(settings())).service(health_route),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/health");
        if let Some(token) = token {
            req = req.insert_header(("X-Token", token));
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn exact_token_is_accepted() {
        let (status, body) = call(Some("sekrit")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
    }

    #[actix_web::test]
    async fn missing_token_is_rejected() {
        let (status, body) = call(None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "detail": "Invalid Token" }));
    }

    #[actix_web::test]
    async fn empty_token_is_rejected() {
        let (status, _) = call(Some("")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn near_match_tokens_are_rejected() {
        for token in ["sekri", "sekritt", "Sekrit", "SEKRIT", " sekrit"] {
            let (status, _) = call(Some(token)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "token {token:?} must be rejected");
        }
    }
}
