//! REST API definitions.

pub mod contract;
pub mod user;

use axum::{
    routing::{get, post},
    Router,
};

pub use self::{contract::Contract, user::User};

/// Builds the [`Router`] of all the REST API endpoints.
///
/// The handlers expect a [`Service`] to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
pub fn router() -> Router {
    Router::new()
        .route("/contracts", get(contract::list).post(contract::create))
        .route("/contracts/preview", post(contract::preview))
        .route(
            "/contracts/:id",
            get(contract::get)
                .patch(contract::update)
                .delete(contract::delete),
        )
        .route("/contracts/:id/document", get(contract::document))
        .route("/contracts/:id/print", get(contract::print))
        .route("/users", post(user::create))
        .route("/sessions", post(user::create_session))
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum::{body::Body, Extension, Router};
    use http_body_util::BodyExt as _;
    use serde_json::{json, Value};
    use service::infra::database::Memory;
    use tower::ServiceExt as _;

    use crate::Service;

    fn app() -> Router {
        let service = Service::new(
            service::Config::with_secret(b"test", Duration::from_secs(3600)),
            Memory::default(),
        );
        super::router().layer(Extension(service))
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (http::StatusCode, String) {
        let mut req = http::Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = if let Some(body) = body {
            req.header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
        } else {
            req.body(Body::empty())
        }
        .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn json(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (http::StatusCode, Value) {
        let (status, text) = call(app, method, uri, token, body).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let (status, body) = json(
            app,
            "POST",
            "/users",
            None,
            Some(json!({
                "name": "Maria",
                "email": email,
                "password": "correct horse",
            })),
        )
        .await;
        assert_eq!(status, http::StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    fn form(title: &str) -> Value {
        json!({
            "title": title,
            "contractingParty": "Maria",
            "contractedParty": "João",
            "startDate": "2024-01-10",
            "deadline": "2024-06-30",
            "totalValue": "R$\u{a0}100,00",
            "installments": "4",
            "clauses": [
                {"number": "1", "title": "DO OBJETO", "items": [{"text": "A"}]},
            ],
        })
    }

    #[tokio::test]
    async fn rejects_unauthenticated_requests() {
        let app = app();

        let (status, body) = json(&app, "GET", "/contracts", None, None).await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHORIZATION_REQUIRED");

        let (status, _) =
            json(&app, "GET", "/contracts", Some("garbage"), None).await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn manages_contracts() {
        let app = app();
        let token = sign_up(&app, "maria@example.com").await;
        let token = Some(token.as_str());

        let (status, created) =
            json(&app, "POST", "/contracts", token, Some(form("A"))).await;
        assert_eq!(status, http::StatusCode::CREATED, "{created}");
        assert_eq!(created["status"], "PENDING");
        assert_eq!(created["totalValue"], "100.00");
        assert_eq!(created["downPayment"], "25.00");
        assert_eq!(created["content"]["title"], "A");
        let id = created["id"].as_str().unwrap().to_owned();

        _ = json(&app, "POST", "/contracts", token, Some(form("B"))).await;
        let (status, list) = json(&app, "GET", "/contracts", token, None).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(list[0]["title"], "B");
        assert_eq!(list[1]["title"], "A");

        let uri = format!("/contracts/{id}");
        let (status, patched) = json(
            &app,
            "PATCH",
            &uri,
            token,
            Some(json!({"status": "ACTIVE", "title": "A2"})),
        )
        .await;
        assert_eq!(status, http::StatusCode::OK, "{patched}");
        assert_eq!(patched["status"], "ACTIVE");
        assert_eq!(patched["title"], "A2");
        assert_eq!(patched["createdAt"], created["createdAt"]);

        let (status, text) =
            call(&app, "GET", &format!("{uri}/print"), token, None).await;
        assert_eq!(status, http::StatusCode::OK);
        assert!(text.contains("Cláusula 6ª - DO OBJETO"), "{text}");

        let (status, doc) =
            json(&app, "GET", &format!("{uri}/document"), token, None).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(doc["sections"].as_array().map(Vec::len), Some(5));

        let (status, _) = call(&app, "DELETE", &uri, token, None).await;
        assert_eq!(status, http::StatusCode::NO_CONTENT);
        let (status, body) = json(&app, "GET", &uri, token, None).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "CONTRACT_NOT_EXISTS");
    }

    #[tokio::test]
    async fn hides_contracts_of_other_users() {
        let app = app();
        let owner = sign_up(&app, "maria@example.com").await;
        let other = sign_up(&app, "joao@example.com").await;

        let (_, created) =
            json(&app, "POST", "/contracts", Some(&owner), Some(form("A")))
                .await;
        let uri = format!("/contracts/{}", created["id"].as_str().unwrap());

        for method in ["GET", "DELETE"] {
            let (status, _) = call(&app, method, &uri, Some(&other), None).await;
            assert_eq!(status, http::StatusCode::NOT_FOUND, "{method}");
        }
        let (status, _) =
            call(&app, "PATCH", &uri, Some(&other), Some(json!({}))).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);

        let (_, list) = json(&app, "GET", "/contracts", Some(&other), None).await;
        assert_eq!(list, json!([]));

        let (status, _) =
            call(&app, "GET", "/contracts/not-an-id", Some(&owner), None).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reports_invalid_input() {
        let app = app();
        let token = sign_up(&app, "maria@example.com").await;
        let token = Some(token.as_str());

        let mut invalid = form("");
        invalid["clauses"][0]["items"][0]["text"] = json!("");
        invalid["installments"] = json!("3000000000");
        let (status, body) =
            json(&app, "POST", "/contracts", token, Some(invalid)).await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_CONTRACT");
        let fields: Vec<_> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap().to_owned())
            .collect();
        assert!(fields.contains(&"title".to_owned()), "{fields:?}");
        assert!(
            fields.contains(&"clauses.0.items.0.text".to_owned()),
            "{fields:?}",
        );
        assert!(fields.contains(&"installments".to_owned()), "{fields:?}");

        let (status, body) =
            json(&app, "POST", "/contracts", token, Some(json!([1, 2]))).await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn previews_unsaved_forms() {
        let app = app();
        let token = sign_up(&app, "maria@example.com").await;

        let (status, body) = json(
            &app,
            "POST",
            "/contracts/preview",
            Some(&token),
            Some(json!({
                "totalValue": "R$\u{a0}100,00",
                "downPayment": "R$\u{a0}20,00",
                "installments": "4",
            })),
        )
        .await;
        assert_eq!(status, http::StatusCode::OK, "{body}");
        assert_eq!(body["installmentAmount"], "R$\u{a0}20,00");
        assert_eq!(body["document"]["sections"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn authenticates_users() {
        let app = app();
        _ = sign_up(&app, "maria@example.com").await;

        let (status, body) = json(
            &app,
            "POST",
            "/users",
            None,
            Some(json!({
                "name": "Maria",
                "email": "MARIA@example.com",
                "password": "correct horse",
            })),
        )
        .await;
        assert_eq!(status, http::StatusCode::CONFLICT);
        assert_eq!(body["code"], "EMAIL_OCCUPIED");

        let (status, body) = json(
            &app,
            "POST",
            "/users",
            None,
            Some(json!({"name": "", "email": "x", "password": "short"})),
        )
        .await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"].as_array().map(Vec::len), Some(3));

        let (status, body) = json(
            &app,
            "POST",
            "/sessions",
            None,
            Some(json!({"email": "maria@example.com", "password": "wrong horse"})),
        )
        .await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "WRONG_CREDENTIALS");

        let (status, body) = json(
            &app,
            "POST",
            "/sessions",
            None,
            Some(json!({"email": "maria@example.com", "password": "correct horse"})),
        )
        .await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body["user"]["email"], "maria@example.com");

        let token = body["token"].as_str().unwrap();
        let (status, _) =
            json(&app, "GET", "/contracts", Some(token), None).await;
        assert_eq!(status, http::StatusCode::OK);
    }
}
