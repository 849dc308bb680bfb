//! Session files: optional local save/load of review results as JSON.
//!
//! One file per review, named `<id>.json` under the configured directory.
//! Ids must be fingerprints, which keeps paths inside the directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::fingerprint::is_fingerprint;
use crate::models::review::ReviewResult;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session id '{0}'")]
    InvalidId(String),

    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not a valid review: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidId(id) => AppError::Validation(format!("invalid session id '{id}'")),
            other => AppError::Internal(other.into()),
        }
    }
}

fn session_path(dir: &Path, id: &str) -> Result<PathBuf, SessionError> {
    if !is_fingerprint(id) {
        return Err(SessionError::InvalidId(id.to_string()));
    }
    Ok(dir.join(format!("{id}.json")))
}

/// Writes the result to `<dir>/<id>.json`, creating the directory if needed.
/// Saving the same review twice overwrites the file.
pub async fn save(dir: &Path, result: &ReviewResult) -> Result<PathBuf, SessionError> {
    let path = session_path(dir, &result.id)?;
    tokio::fs::create_dir_all(dir).await?;
    let json = serde_json::to_vec_pretty(result)?;
    tokio::fs::write(&path, json).await?;
    info!("Saved session {}", path.display());
    Ok(path)
}

/// Reads a saved result. `Ok(None)` when no file exists for the id.
pub async fn load(dir: &Path, id: &str) -> Result<Option<ReviewResult>, SessionError> {
    let path = session_path(dir, id)?;
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::fingerprint::fingerprint;
    use crate::models::review::FeedbackSource;

    fn result(id: String) -> ReviewResult {
        ReviewResult {
            id,
            target_role: Some("Product Manager".to_string()),
            jd_provided: false,
            keywords: vec!["roadmap".to_string()],
            found_keywords: vec![],
            missing_keywords: vec!["roadmap".to_string()],
            match_percentage: 0,
            sections: BTreeMap::new(),
            narrative: "Add a roadmap example.".to_string(),
            narrative_source: FeedbackSource::RuleBased,
            warnings: vec![],
            improved_draft: None,
            model: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = dir.path().join("sessions");
        let saved = result(fingerprint("resume"));

        let path = save(&sessions, &saved).await.unwrap();
        assert!(path.ends_with(format!("{}.json", saved.id)));

        let loaded = load(&sessions, &saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.narrative, saved.narrative);
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn test_load_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path(), &fingerprint("nothing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), "../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidId(_)));

        let err = save(dir.path(), &result("../escape".to_string())).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let id = fingerprint("corrupt");
        tokio::fs::write(dir.path().join(format!("{id}.json")), b"{not json")
            .await
            .unwrap();
        let err = load(dir.path(), &id).await.unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }
}
