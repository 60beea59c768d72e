use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use pressure_core::auth::AdminGrant;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor for instructor-only handlers.
///
/// The shared secret is read from `Authorization: Bearer <token>` or, for the
/// browser console and the documented URLs, from the `token` query parameter.
/// Rejection is a 401 before the handler body runs, so a refused request never
/// touches simulation state.
#[derive(Debug)]
pub struct Admin(pub AdminGrant);

#[derive(Deserialize)]
struct TokenParam {
    token: Option<String>,
}

impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, AppError> {
        let token = presented_token(parts);
        match app.admin.authorize(token.as_deref()) {
            Ok(grant) => Ok(Admin(grant)),
            Err(e) => {
                tracing::warn!(
                    path = %parts.uri.path(),
                    token_present = token.is_some(),
                    configured = app.admin.is_configured(),
                    "rejected instructor request"
                );
                Err(AppError(e.into()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn presented_token(parts: &Parts) -> Option<String> {
    bearer_token(parts).or_else(|| {
        Query::<TokenParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.token)
    })
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
