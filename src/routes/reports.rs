use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info};
use serde_json::json;

use crate::db;
use crate::model::NewReport;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .route("/upload", post(upload))
}

/// JSON submission without an attachment.
async fn submit(State(state): State<AppState>, Json(report): Json<NewReport>) -> Response {
    store_and_notify(&state, report, "Report saved.").await
}

/// Multipart submission; the attachment lands in the upload directory and
/// its stored name goes into the report row.
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut report = NewReport::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(e),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("problem") => report.problem = field.text().await.ok(),
            Some("explanation") => report.explanation = field.text().await.ok(),
            Some("location") => report.location = field.text().await.ok(),
            Some("attachment") => {
                let original = field.file_name().unwrap_or("attachment").to_string();
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => return error_response(e),
                };
                let stored = stored_name(&original);
                if let Err(e) = tokio::fs::write(state.config.upload_dir.join(&stored), &data).await
                {
                    error!("failed to store attachment {stored}: {e}");
                    return error_response(e);
                }
                report.attachment = Some(stored);
            }
            _ => {}
        }
    }

    store_and_notify(&state, report, "Report with attachment saved.").await
}

async fn store_and_notify(state: &AppState, report: NewReport, message: &str) -> Response {
    match db::insert_report(&state.config.database_url, report).await {
        Ok(saved) => {
            info!("stored report #{}", saved.id);
            // Best-effort: the submission already succeeded.
            state.notifier.notify().await;
            Json(json!({ "message": message })).into_response()
        }
        Err(e) => {
            error!("failed to store report: {e:#}");
            error_response(e)
        }
    }
}

fn error_response(err: impl ToString) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// `<unix-millis>-<original name>`, reduced to the bare file name so client
/// path components never reach the filesystem.
fn stored_name(original: &str) -> String {
    let base = std::path::Path::new(original)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".into());
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{millis}-{base}")
}

#[cfg(test)]
mod tests {
    use super::stored_name;

    #[test]
    fn stored_name_keeps_original_name() {
        assert!(stored_name("bin.jpg").ends_with("-bin.jpg"));
    }

    #[test]
    fn stored_name_strips_path_components() {
        let name = stored_name("../../etc/passwd");
        assert!(name.ends_with("-passwd"));
        assert!(!name.contains('/'));
    }

    #[test]
    fn stored_name_defaults_when_empty() {
        assert!(stored_name("").ends_with("-attachment"));
    }
}
