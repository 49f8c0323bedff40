//! REST handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quote_document::{CompanyInfo, DocumentId, OwnerId, QuotePatch};
use quote_session::{PreviewOutcome, QuoteSession, SessionError, SessionState};
use serde::Deserialize;

/// Header carrying the caller's identity
pub const USER_HEADER: &str = "x-user-id";

/// Identity of the requesting user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub OwnerId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Caller(OwnerId::new(value)))
            .ok_or(ApiError::Unauthenticated)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuotesParams {
    pub owner: Option<String>,
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /quotes - Validate company info and create a quote
pub async fn create_quote(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.new_session(user);
    let doc = session.create_document(req.company_info, req.logo).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /quotes/{id} - The quote as stored, without unsaved edits
pub async fn get_quote(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session_for(&user, &DocumentId::new(id)).await?;
    let doc = session.persisted_document();
    state.release(&session);
    Ok(Json(doc.ok_or(SessionError::NoDocument)?))
}

/// PATCH /quotes/{id} - Buffer the partial update and commit it
pub async fn patch_quote(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
    Json(patch): Json<QuotePatch>,
) -> Result<StatusCode, ApiError> {
    let session = state.session_for(&user, &DocumentId::new(id)).await?;
    let committed = commit_patch(&session, patch).await;
    state.release(&session);
    committed
}

async fn commit_patch(session: &QuoteSession, patch: QuotePatch) -> Result<StatusCode, ApiError> {
    if session.state() == SessionState::Preview {
        session.back()?;
    }
    session.apply_local_change(patch)?;
    match session.request_preview().await? {
        PreviewOutcome::Ignored => Err(SessionError::SaveInFlight.into()),
        PreviewOutcome::Saved | PreviewOutcome::Unchanged => Ok(StatusCode::NO_CONTENT),
    }
}

/// GET /quotes/{id}/preview
pub async fn preview_quote(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session_for(&user, &DocumentId::new(id)).await?;
    let preview = session.preview();
    state.release(&session);
    Ok(Json(preview?))
}

/// GET /quotes?owner= - The caller's quotes, most recent first
pub async fn list_quotes(
    State(state): State<AppState>,
    Caller(user): Caller,
    Query(params): Query<ListQuotesParams>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(owner) = params.owner {
        if owner != user.as_str() {
            tracing::warn!("User {} attempted to list quotes of {}", user, owner);
            return Err(ApiError::Forbidden);
        }
    }
    let docs = state.new_session(user).list_quotes().await?;
    Ok(Json(docs))
}
