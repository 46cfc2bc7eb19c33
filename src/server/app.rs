use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{cards, health, import, reference};
use crate::config::ImportOptions;
use crate::services::{CardService, ImportService, ReferenceService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cards: CardService,
    pub references: ReferenceService,
    pub import_options: ImportOptions,
}

impl AppState {
    pub fn new(db: DatabaseConnection, import_options: ImportOptions) -> Self {
        Self {
            cards: CardService::new(db.clone()),
            references: ReferenceService::new(db.clone()),
            db,
            import_options,
        }
    }

    pub fn import_service(&self) -> ImportService {
        ImportService::new(self.db.clone(), self.import_options)
    }
}

pub async fn create_app(
    db: DatabaseConnection,
    cors_origin: Option<&str>,
    import_options: ImportOptions,
) -> Result<Router> {
    let state = AppState::new(db, import_options);

    let cors = match cors_origin {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Card routes
        .route("/cards", get(cards::sample_cards).post(cards::create_card))
        .route("/cards/form", get(cards::form_choices))
        .route("/cards/search", get(cards::search_cards))
        .route("/cards/:id", get(cards::get_card))
        // Reference data
        .route(
            "/editions",
            get(reference::list_editions).post(reference::create_edition),
        )
        .route(
            "/colors",
            get(reference::list_colors).post(reference::create_color),
        )
        // Bulk import
        .route("/import", post(import::import_cards))
}
