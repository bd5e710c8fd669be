// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::OriginalUri,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::IdentityRecord, error::ApiError, state::AppState};

pub mod health;
pub mod telegram;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/telegram", post(telegram::login))
        .route("/auth/telegram/form", post(telegram::login_form))
        .route("/auth/telegram/callback", get(telegram::widget_callback))
        .with_state(state);

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        telegram::login,
        telegram::login_form,
        telegram::widget_callback
    ),
    components(
        schemas(
            IdentityRecord,
            health::HealthResponse,
            telegram::TelegramLoginRequest
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Auth", description = "Telegram Login Widget and Mini App verification")
    )
)]
struct ApiDoc;
