//! Inventory routes, served under /api/products

use axum::Router;
use domain_inventory::{handlers, InventoryService};

use crate::state::AppState;

/// Create inventory router
pub fn router(state: &AppState) -> Router {
    let service = InventoryService::new(state.repository.clone());
    handlers::router(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum_helpers::server::create_router;
    use core_config::server::ServerConfig;
    use core_config::{app_info, Environment};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(Config {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_full_stack_create_and_list() {
        let state = state();
        let app = create_router::<crate::openapi::ApiDoc>(
            crate::api::routes(&state),
            &state.config.server,
        )
        .unwrap();

        let create = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "product": { "name": "Kettle", "category": "Kitchen", "price": 24.5 },
                    "quantity": 3
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let list = Request::builder()
            .uri("/api/products?page=1&size=5")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(list).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["totalItems"], 1);
        assert_eq!(page["items"][0]["product"]["name"], "Kettle");

        // Routers built from the same state share one store
        let other = router(&state)
            .oneshot(Request::builder().uri("/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(other).await, json!(["Kitchen"]));
    }

    #[tokio::test]
    async fn test_openapi_lists_inventory_paths() {
        let state = state();
        let app = create_router::<crate::openapi::ApiDoc>(
            crate::api::routes(&state),
            &state.config.server,
        )
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/products"].is_object());
        assert!(doc["paths"]["/api/products/{id}/outofstock"].is_object());
        assert!(doc["paths"]["/api/products/metrics"].is_object());
    }
}
