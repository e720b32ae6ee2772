// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::api::*;
use crate::config::NodeConfig;
use crate::errors::ApiError;
use crate::telemetry;
use alert_changelog::retention::validate_keep;
use alert_changelog::{Alert, AlertRepository, ChangeHooks, ChangeLog, LogStatus, Operation};
use axum::{
    extract::{Path, Query, Request as AxumRequest, State},
    http::{
        header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Alert store plus the change log its mutations feed.
pub struct AppState {
    pub alerts: AlertRepository,
    pub changelog: ChangeLog,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire the store's hooks to the change log writer and the mutation
    /// counter.
    pub fn new(cfg: &NodeConfig) -> Self {
        let changelog = ChangeLog::open(&cfg.changelog);
        let hooks = ChangeHooks::new()
            .with(changelog.writer.clone())
            .with(Arc::new(telemetry::count_change));
        Self {
            alerts: AlertRepository::new(hooks),
            changelog,
        }
    }
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(p) if p == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: SharedState, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        // Change log management
        .route(
            "/api/data-extraction/files",
            get(list_files).delete(cleanup_files),
        )
        .route("/api/data-extraction/files/count", get(count_files))
        .route("/api/data-extraction/files/:filename", get(download_file))
        .route("/api/data-extraction/status", get(extraction_status))
        // Alerts
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route("/api/alerts/spam", get(spam_alerts).delete(delete_spam_alerts))
        .route("/api/alerts/legitimate", get(legitimate_alerts))
        .route("/api/alerts/high-confidence", get(high_confidence_alerts))
        .route(
            "/api/alerts/low-confidence",
            axum::routing::delete(delete_low_confidence_alerts),
        )
        .route("/api/alerts/count", get(count_alerts))
        .route("/api/alerts/count/spam", get(count_spam_alerts))
        .route("/api/alerts/bulk-update-spam", put(bulk_update_spam))
        .route("/api/alerts/bulk-delete", axum::routing::delete(bulk_delete))
        .route(
            "/api/alerts/:id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
        .route("/api/alerts/:id/spam-status", patch(update_spam_status))
        .route("/api/alerts/:id/confidence", patch(update_confidence))
        .route("/api/alerts/:id/subject", patch(update_subject))
        // Observability
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    app.route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> &'static str {
    "OK"
}

async fn metrics_handler() -> String {
    telemetry::get_metrics()
}

// --- change log ---

async fn list_files(
    State(state): State<SharedState>,
    Query(params): Query<OperationFilter>,
) -> Result<Json<Vec<String>>, ApiError> {
    let filter = Operation::parse_filter(params.operation.as_deref())?;
    Ok(Json(state.changelog.index.list(filter)?))
}

async fn count_files(
    State(state): State<SharedState>,
    Query(params): Query<OperationFilter>,
) -> Result<Json<usize>, ApiError> {
    let filter = Operation::parse_filter(params.operation.as_deref())?;
    Ok(Json(state.changelog.index.count(filter)?))
}

async fn download_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.changelog.index.get(&filename)?;
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

async fn cleanup_files(
    State(state): State<SharedState>,
    Query(params): Query<CleanupParams>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let filter = Operation::parse_filter(params.operation.as_deref())?;
    let keep = match params.keep {
        Some(k) => validate_keep(k)?,
        None => state.changelog.retention.default_keep(),
    };

    let report = state.changelog.retention.prune_with_report(filter, keep)?;
    metrics::counter!(telemetry::ENTRIES_PRUNED, report.deleted as u64);

    Ok(Json(CleanupResponse {
        deleted: report.deleted,
        kept: report.kept,
    }))
}

async fn extraction_status(State(state): State<SharedState>) -> Result<Json<LogStatus>, ApiError> {
    Ok(Json(state.changelog.index.status()?))
}

// --- alerts ---

const HIGH_CONFIDENCE: f64 = 0.8;
const DEFAULT_LOW_CONFIDENCE: f64 = 0.3;

fn validate_confidence(confidence: f64) -> Result<(), ApiError> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "confidence must be within [0, 1], got {}",
            confidence
        )))
    }
}

async fn list_alerts(State(state): State<SharedState>) -> Json<Vec<Alert>> {
    Json(state.alerts.list())
}

async fn spam_alerts(State(state): State<SharedState>) -> Json<Vec<Alert>> {
    Json(state.alerts.list_by_spam(true))
}

async fn legitimate_alerts(State(state): State<SharedState>) -> Json<Vec<Alert>> {
    Json(state.alerts.list_by_spam(false))
}

async fn high_confidence_alerts(State(state): State<SharedState>) -> Json<Vec<Alert>> {
    Json(state.alerts.list_above_confidence(HIGH_CONFIDENCE))
}

async fn count_alerts(State(state): State<SharedState>) -> Json<usize> {
    Json(state.alerts.count())
}

async fn count_spam_alerts(State(state): State<SharedState>) -> Json<usize> {
    Json(state.alerts.count_spam())
}

async fn get_alert(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, ApiError> {
    state
        .alerts
        .get(id)
        .map(Json)
        .ok_or_else(|| alert_changelog::ChangeLogError::AlertNotFound(id).into())
}

async fn create_alert(
    State(state): State<SharedState>,
    Json(payload): Json<AlertRequest>,
) -> Result<Json<Alert>, ApiError> {
    validate_confidence(payload.confidence)?;
    let mut alert = Alert::new(payload.subject, payload.is_spam, payload.confidence);
    alert.email_content = payload.email_content;
    alert.time_detected = payload.time_detected;
    Ok(Json(state.alerts.insert(alert)?))
}

/// Replaces subject, spam flag, confidence and content. Detection time is
/// kept.
async fn update_alert(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<AlertRequest>,
) -> Result<Json<Alert>, ApiError> {
    validate_confidence(payload.confidence)?;
    let updated = state.alerts.update(id, |alert| {
        alert.subject = payload.subject;
        alert.is_spam = payload.is_spam;
        alert.confidence = payload.confidence;
        alert.email_content = payload.email_content;
    })?;
    Ok(Json(updated))
}

async fn update_spam_status(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<SpamStatusRequest>,
) -> Result<Json<Alert>, ApiError> {
    let updated = state.alerts.update(id, |alert| alert.is_spam = payload.is_spam)?;
    Ok(Json(updated))
}

async fn update_confidence(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ConfidenceRequest>,
) -> Result<Json<Alert>, ApiError> {
    validate_confidence(payload.confidence)?;
    let updated = state
        .alerts
        .update(id, |alert| alert.confidence = payload.confidence)?;
    Ok(Json(updated))
}

async fn update_subject(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<SubjectRequest>,
) -> Result<Json<Alert>, ApiError> {
    let updated = state.alerts.update(id, |alert| alert.subject = payload.subject)?;
    Ok(Json(updated))
}

async fn delete_alert(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, ApiError> {
    Ok(Json(state.alerts.delete(id)?))
}

/// Unknown ids are skipped.
async fn bulk_update_spam(
    State(state): State<SharedState>,
    Json(payload): Json<BulkUpdateRequest>,
) -> Json<BulkResponse> {
    let affected = payload
        .ids
        .iter()
        .filter(|id| {
            state
                .alerts
                .update(**id, |alert| alert.is_spam = payload.is_spam)
                .is_ok()
        })
        .count();
    Json(BulkResponse { affected })
}

async fn bulk_delete(
    State(state): State<SharedState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Json<BulkResponse> {
    let affected = payload
        .ids
        .iter()
        .filter(|id| state.alerts.delete(**id).is_ok())
        .count();
    Json(BulkResponse { affected })
}

async fn delete_spam_alerts(State(state): State<SharedState>) -> Json<BulkResponse> {
    let affected = state.alerts.delete_where(|alert| alert.is_spam).len();
    Json(BulkResponse { affected })
}

/// Deletes alerts with confidence strictly below the threshold (default 0.3).
async fn delete_low_confidence_alerts(
    State(state): State<SharedState>,
    Query(params): Query<ThresholdParams>,
) -> Result<Json<BulkResponse>, ApiError> {
    let threshold = params.threshold.unwrap_or(DEFAULT_LOW_CONFIDENCE);
    if !threshold.is_finite() {
        return Err(ApiError::InvalidInput(format!(
            "threshold must be finite, got {}",
            threshold
        )));
    }
    let affected = state
        .alerts
        .delete_where(|alert| alert.confidence < threshold)
        .len();
    Ok(Json(BulkResponse { affected }))
}
