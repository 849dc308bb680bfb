use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{to_pdf, to_text};
use crate::fingerprint::fingerprint;
use crate::models::review::ReviewResult;
use crate::parser::parse_document;
use crate::review::{review, ReviewRequest};
use crate::scoring::RoleTemplate;
use crate::sessions;
use crate::state::AppState;

const SESSIONS_DISABLED: &str = "Session storage is disabled; set SESSIONS_DIR to enable it.";

#[derive(Serialize)]
pub struct RoleSummary {
    pub id: RoleTemplate,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Serialize)]
pub struct SessionSaved {
    pub id: String,
}

#[derive(Serialize)]
pub struct ParsedDocument {
    pub fingerprint: String,
    pub words: usize,
    pub text: String,
}

/// POST /api/v1/reviews
pub async fn handle_review(
    State(state): State<AppState>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResult>, AppError> {
    let result = review(&req, state.llm.as_ref(), &state.config).await?;
    info!(
        "Review {} complete: source={:?} match={}% overall={}",
        result.id.get(..12).unwrap_or(&result.id),
        result.narrative_source,
        result.match_percentage,
        result.overall_score()
    );
    Ok(Json(result))
}

/// POST /api/v1/documents/parse
/// Raw PDF or UTF-8 text body. Returns the normalized text the reviewer scores.
pub async fn handle_parse_document(body: Bytes) -> Result<Json<ParsedDocument>, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("Request body is empty".to_string()));
    }

    let text = tokio::task::spawn_blocking(move || parse_document(&body))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok(Json(ParsedDocument {
        fingerprint: fingerprint(&text),
        words: text.split_whitespace().count(),
        text,
    }))
}

/// GET /api/v1/roles
pub async fn handle_list_roles() -> Json<Vec<RoleSummary>> {
    Json(
        RoleTemplate::ALL
            .into_iter()
            .map(|role| RoleSummary {
                id: role,
                name: role.display_name(),
                keywords: role.keywords(),
            })
            .collect(),
    )
}

/// POST /api/v1/reviews/export/text
pub async fn handle_export_text(Json(result): Json<ReviewResult>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume-feedback.txt\"",
            ),
        ],
        to_text(&result),
    )
}

/// POST /api/v1/reviews/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(result): Json<ReviewResult>,
) -> Result<impl IntoResponse, AppError> {
    // Layout and encoding are CPU-bound.
    let page_config = state.page_config.clone();
    let bytes = tokio::task::spawn_blocking(move || to_pdf(&result, &page_config))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume-feedback.pdf\"",
            ),
        ],
        bytes,
    ))
}

/// POST /api/v1/sessions
pub async fn handle_save_session(
    State(state): State<AppState>,
    Json(result): Json<ReviewResult>,
) -> Result<Json<SessionSaved>, AppError> {
    let dir = state
        .config
        .sessions_dir
        .as_deref()
        .ok_or_else(|| AppError::Disabled(SESSIONS_DISABLED.to_string()))?;
    sessions::save(dir, &result).await?;
    Ok(Json(SessionSaved { id: result.id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_load_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewResult>, AppError> {
    let dir = state
        .config
        .sessions_dir
        .as_deref()
        .ok_or_else(|| AppError::Disabled(SESSIONS_DISABLED.to_string()))?;
    sessions::load(dir, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No saved session with id {id}")))
}
