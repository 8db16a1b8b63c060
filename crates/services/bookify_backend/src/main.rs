// File: services/bookify_backend/src/main.rs
mod app_state;

use app_state::AppState;
use axum::{routing::get, Router};
use bookify_common::{logging, BookifyError, Context};
use bookify_config::load_config;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The full application router: booking routes under `/api`, plus Swagger UI
/// at `/api/docs` when built with `openapi`.
fn app(state: &AppState) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Bookify API!" }))
        .merge(bookify_bookings::routes(state.bookings.clone()));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use bookify_bookings::doc::BookingsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Room and event booking with conflict detection"
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingsApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), BookifyError> {
    let config = load_config().map_err(|e| BookifyError::ConfigError(e.to_string()))?;
    logging::init_from_config(config.logging.as_ref());

    let state = AppState::new(&config).await?;
    let app = app(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
