pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, MethodRouter},
    Router,
};

use crate::cv::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

fn collection_routes() -> MethodRouter<AppState> {
    get(handlers::handle_list_cvs)
        .post(handlers::handle_create_cv)
        .fallback(handlers::collection_method_not_allowed)
}

fn item_routes() -> MethodRouter<AppState> {
    get(handlers::handle_get_cv)
        .put(handlers::handle_replace_cv)
        .patch(handlers::handle_patch_cv)
        .delete(handlers::handle_delete_cv)
        .fallback(handlers::item_method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/cv", collection_routes())
        .route("/api/cv/:id", item_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, HeaderMap, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::cv::store_memory::MemoryCvStore;

    fn app() -> Router {
        build_router(AppState {
            store: Arc::new(MemoryCvStore::new()),
            config: Config::default(),
        })
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, json)
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, _, json) = call(app, Method::POST, "/api/cv", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
        json
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, json) = call(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_ada_lovelace() {
        let app = app();
        let json = create(&app, json!({ "firstName": "Ada", "lastName": "Lovelace" })).await;

        assert!(!json["_id"].as_str().unwrap().is_empty());
        assert!(json["slug"].as_str().unwrap().starts_with("ada-lovelace-"));
        assert_eq!(json["template"], "modern");
        assert_eq!(json["isPublic"], false);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = app();
        let created = create(
            &app,
            json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "title": "Rear Admiral",
                "skills": [{ "name": "COBOL", "level": "Master", "category": "Languages" }],
                "jobs": [{
                    "title": "Programmer",
                    "company": "Harvard",
                    "startDate": "1944-07",
                    "current": false,
                    "responsibilities": ["Mark I"],
                    "skills": ["COBOL"]
                }]
            }),
        )
        .await;

        let id = created["_id"].as_str().unwrap();
        let (status, _, fetched) = call(&app, Method::GET, &format!("/api/cv/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["jobs"][0]["startDate"], "1944-07-01");
        assert!(fetched["skills"][0]["_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_missing_first_name_is_400_and_nothing_stored() {
        let app = app();
        create(&app, json!({ "firstName": "Ada", "lastName": "Lovelace" })).await;

        let (status, _, json) = call(
            &app,
            Method::POST,
            "/api/cv",
            Some(json!({ "lastName": "Nobody" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Failed to create CV");
        assert!(json["details"].as_str().unwrap().contains("firstName"));

        let (_, _, list) = call(&app, Method::GET, "/api/cv", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_bad_level_is_400() {
        let (status, _, json) = call(
            &app(),
            Method::POST,
            "/api/cv",
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "skills": [{ "name": "Go", "level": "Guru" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Failed to create CV");
    }

    #[tokio::test]
    async fn test_create_malformed_json_is_400() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/cv")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_projects_summary_most_recent_first() {
        let app = app();
        let first = create(
            &app,
            json!({ "firstName": "A", "lastName": "One", "email": "a@example.com" }),
        )
        .await;
        let second = create(&app, json!({ "firstName": "B", "lastName": "Two" })).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        let first_id = first["_id"].as_str().unwrap();
        let (status, _, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/cv/{first_id}"),
            Some(json!({ "title": "Updated" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, list) = call(&app, Method::GET, "/api/cv", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["_id"], first["_id"]);
        assert_eq!(list[1]["_id"], second["_id"]);
        assert!(list[0].get("email").is_none());
        assert!(list[0]["skills"].is_array());
        assert!(list[0]["jobs"].is_array());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_document() {
        let app = app();
        let created = create(
            &app,
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "summary": "Old",
                "skills": [{ "name": "A" }, { "name": "B" }]
            }),
        )
        .await;
        let id = created["_id"].as_str().unwrap();

        let (status, _, replaced) = call(
            &app,
            Method::PUT,
            &format!("/api/cv/{id}"),
            Some(json!({
                "firstName": "Ada",
                "lastName": "King",
                "skills": [{ "name": "C" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced["lastName"], "King");
        assert!(replaced.get("summary").is_none());
        assert_eq!(replaced["skills"].as_array().unwrap().len(), 1);
        assert_eq!(replaced["slug"], created["slug"]);
        assert_eq!(replaced["createdAt"], created["createdAt"]);

        let (_, _, fetched) = call(&app, Method::GET, &format!("/api/cv/{id}"), None).await;
        assert_eq!(fetched, replaced);
    }

    #[tokio::test]
    async fn test_put_unknown_and_invalid() {
        let app = app();
        let missing = uuid::Uuid::new_v4();
        let (status, _, json) = call(
            &app,
            Method::PUT,
            &format!("/api/cv/{missing}"),
            Some(json!({ "firstName": "A", "lastName": "B" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "CV not found" }));

        let created = create(&app, json!({ "firstName": "A", "lastName": "B" })).await;
        let id = created["_id"].as_str().unwrap();
        let (status, _, json) = call(
            &app,
            Method::PUT,
            &format!("/api/cv/{id}"),
            Some(json!({ "firstName": "A", "lastName": "B", "jobs": [{ "title": "Dev" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Failed to update CV");
        assert!(json["details"].as_str().unwrap().contains("jobs.0.company"));
    }

    #[tokio::test]
    async fn test_patch_skills_replaces_list() {
        let app = app();
        let created = create(
            &app,
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "title": "Analyst",
                "skills": [{ "name": "A" }, { "name": "B" }, { "name": "C" }]
            }),
        )
        .await;
        let id = created["_id"].as_str().unwrap();

        let (status, _, patched) = call(
            &app,
            Method::PATCH,
            &format!("/api/cv/{id}"),
            Some(json!({ "skills": [{ "name": "Go", "level": "Expert" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let skills = patched["skills"].as_array().unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0]["name"], "Go");
        assert_eq!(skills[0]["level"], "Expert");
        assert_eq!(patched["title"], "Analyst");
    }

    #[tokio::test]
    async fn test_patch_errors() {
        let app = app();
        let created = create(&app, json!({ "firstName": "Ada", "lastName": "Lovelace" })).await;
        let id = created["_id"].as_str().unwrap();

        let (status, _, json) = call(
            &app,
            Method::PATCH,
            &format!("/api/cv/{id}"),
            Some(json!({ "firstName": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Failed to patch CV");

        let (status, _, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/cv/{id}"),
            Some(json!(["not", "an", "object"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/cv/{}", uuid::Uuid::new_v4()),
            Some(json!({ "title": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let app = app();
        let created = create(&app, json!({ "firstName": "Ada", "lastName": "Lovelace" })).await;
        let uri = format!("/api/cv/{}", created["_id"].as_str().unwrap());

        let (status, _, json) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "CV deleted successfully");

        let (status, _, json) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "CV not found" }));

        let (status, _, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_uuid_id_is_404() {
        let (status, _, json) = call(&app(), Method::GET, "/api/cv/not-an-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "CV not found");
    }

    #[tokio::test]
    async fn test_unsupported_methods_are_405_with_allow() {
        let app = app();
        let (status, headers, json) = call(&app, Method::DELETE, "/api/cv", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ALLOW], "GET, POST");
        assert_eq!(json["error"], "Method DELETE Not Allowed");

        let uri = format!("/api/cv/{}", uuid::Uuid::new_v4());
        let (status, headers, json) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ALLOW], "GET, PUT, PATCH, DELETE");
        assert_eq!(json["error"], "Method POST Not Allowed");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_json() {
        let (status, _, json) = call(&app(), Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Not found");
    }
}
