// Bundle Builder - Web Server
// JSON API over the bundle controller, including the debug entry points
// (GET /api/bundle for the current state, POST /api/bundle/reset).

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bundle_builder::{
    logging, BundleController, BundleState, BundleView, Catalog, Config, PageModel,
    ProductCard, RenderedPage,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

type SharedController = Arc<Mutex<BundleController<PageModel>>>;

/// Shared application state
#[derive(Clone)]
struct AppState {
    bundle: SharedController,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

#[derive(Deserialize)]
struct QuantityRequest {
    delta: i32,
}

fn lock(state: &AppState) -> std::result::Result<MutexGuard<'_, BundleController<PageModel>>, Response> {
    state.bundle.lock().map_err(|_| {
        tracing::error!("Bundle controller lock poisoned");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Bundle state unavailable")
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/products - Product cards with their visual state
async fn get_products(State(state): State<AppState>) -> Response {
    let bundle = match lock(&state) {
        Ok(bundle) => bundle,
        Err(response) => return response,
    };

    let cards: Vec<ProductCard> = bundle.view().cards().to_vec();
    (StatusCode::OK, Json(ApiResponse::ok(cards))).into_response()
}

/// GET /api/bundle - Current bundle state
async fn get_bundle(State(state): State<AppState>) -> Response {
    match lock(&state) {
        Ok(bundle) => (StatusCode::OK, Json(ApiResponse::ok(bundle.snapshot()))).into_response(),
        Err(response) => response,
    }
}

/// GET /api/bundle/view - Everything currently rendered
async fn get_rendered(State(state): State<AppState>) -> Response {
    match lock(&state) {
        Ok(bundle) => {
            let page: RenderedPage = bundle.view().rendered();
            (StatusCode::OK, Json(ApiResponse::ok(page))).into_response()
        }
        Err(response) => response,
    }
}

/// Run one product-addressed operation and answer with the new state
fn with_product<F>(state: &AppState, id: &str, op: F) -> Response
where
    F: FnOnce(&mut BundleController<PageModel>),
{
    let mut bundle = match lock(state) {
        Ok(bundle) => bundle,
        Err(response) => return response,
    };

    let known = bundle.view().product_card(id).is_some();
    op(&mut *bundle);

    if !known {
        return error_response(StatusCode::NOT_FOUND, format!("Product {} not found", id));
    }

    let snapshot: BundleState = bundle.snapshot();
    (StatusCode::OK, Json(ApiResponse::ok(snapshot))).into_response()
}

/// POST /api/bundle/toggle/:id
async fn toggle_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    with_product(&state, &id, |bundle| bundle.toggle_selection(&id))
}

/// POST /api/bundle/remove/:id
async fn remove_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    with_product(&state, &id, |bundle| bundle.remove_product(&id))
}

/// POST /api/bundle/quantity/:id - body {"delta": n}
async fn change_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QuantityRequest>,
) -> Response {
    with_product(&state, &id, |bundle| bundle.change_quantity(&id, request.delta))
}

/// POST /api/bundle/confirm - Simulated add to cart
async fn confirm_bundle(State(state): State<AppState>) -> Response {
    let mut bundle = match lock(&state) {
        Ok(bundle) => bundle,
        Err(response) => return response,
    };

    match bundle.confirm_bundle() {
        Some(confirmation) => (StatusCode::OK, Json(ApiResponse::ok(confirmation))).into_response(),
        None => {
            let pricing = bundle.pricing();
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Not enough items selected for bundle (need {})",
                    pricing.discount_threshold
                ),
            )
        }
    }
}

/// POST /api/bundle/reset
async fn reset_bundle(State(state): State<AppState>) -> Response {
    let mut bundle = match lock(&state) {
        Ok(bundle) => bundle,
        Err(response) => return response,
    };

    bundle.reset();
    (StatusCode::OK, Json(ApiResponse::ok(bundle.snapshot()))).into_response()
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(get_products))
        .route("/bundle", get(get_bundle))
        .route("/bundle/view", get(get_rendered))
        .route("/bundle/toggle/:id", post(toggle_product))
        .route("/bundle/remove/:id", post(remove_product))
        .route("/bundle/quantity/:id", post(change_quantity))
        .route("/bundle/confirm", post(confirm_bundle))
        .route("/bundle/reset", post(reset_bundle))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_level)?;

    println!("🌐 Bundle Builder - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = Catalog::load(&config.catalog_path)?;
    println!("✓ Catalog loaded: {} products", catalog.len());

    let controller = BundleController::new(PageModel::from_products(catalog.products()), config.pricing);
    let state = AppState {
        bundle: Arc::new(Mutex::new(controller)),
    };

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   State: GET  /api/bundle");
    println!("   Reset: POST /api/bundle/reset");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bundle_builder::PricingConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let cards = [("a", 10.0), ("b", 20.0), ("c", 15.0)]
            .iter()
            .map(|(id, price)| ProductCard {
                id: id.to_string(),
                name: format!("Product {}", id),
                price: *price,
                image: String::new(),
                selected: false,
                added: false,
            })
            .collect();
        let controller = BundleController::new(PageModel::new(cards), PricingConfig::default());
        AppState {
            bundle: Arc::new(Mutex::new(controller)),
        }
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state();
        let (status, json) = call(&state, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_toggle_and_state() {
        let state = test_state();

        let (status, json) = call(&state, "POST", "/api/bundle/toggle/a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 1);

        let (_, json) = call(&state, "GET", "/api/bundle", None).await;
        assert_eq!(json["data"]["selected_products"][0]["id"], "a");
        assert_eq!(json["data"]["has_discount"], false);
    }

    #[tokio::test]
    async fn test_unknown_product_is_404() {
        let state = test_state();
        let (status, json) = call(&state, "POST", "/api/bundle/toggle/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_quantity_and_confirm() {
        let state = test_state();

        let (status, _) = call(&state, "POST", "/api/bundle/confirm", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        for id in ["a", "b", "c"] {
            call(&state, "POST", &format!("/api/bundle/toggle/{}", id), None).await;
        }
        let (_, json) = call(&state, "POST", "/api/bundle/quantity/a", Some(r#"{"delta": 1}"#)).await;
        assert_eq!(json["data"]["selected_products"][0]["quantity"], 2);

        let (status, json) = call(&state, "POST", "/api/bundle/confirm", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["item_count"], 3);
        assert_eq!(json["data"]["total_quantity"], 4);

        // Confirm does not clear the bundle
        let (_, json) = call(&state, "GET", "/api/bundle", None).await;
        assert_eq!(json["data"]["count"], 3);
    }

    #[tokio::test]
    async fn test_extreme_quantity_delta_keeps_api_alive() {
        let state = test_state();
        call(&state, "POST", "/api/bundle/toggle/b", None).await;

        for _ in 0..2 {
            let (status, json) = call(
                &state,
                "POST",
                "/api/bundle/quantity/b",
                Some(r#"{"delta": 2147483647}"#),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                json["data"]["selected_products"][0]["quantity"],
                bundle_builder::MAX_QUANTITY
            );
        }

        let (status, json) = call(&state, "GET", "/api/bundle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 1);
    }

    #[tokio::test]
    async fn test_reset_and_view() {
        let state = test_state();
        call(&state, "POST", "/api/bundle/toggle/b", None).await;

        let (_, json) = call(&state, "GET", "/api/bundle/view", None).await;
        assert_eq!(json["data"]["call_to_action"]["label"], "Add 2 More Items to Cart");
        assert_eq!(json["data"]["products"][1]["selected"], true);

        let (status, json) = call(&state, "POST", "/api/bundle/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 0);
        assert_eq!(json["data"]["subtotal"], 0.0);

        let (_, json) = call(&state, "GET", "/api/products", None).await;
        assert_eq!(json["data"][1]["selected"], false);
    }
}
