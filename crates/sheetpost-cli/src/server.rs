use crate::commands::{fetch_records, resolve_range, resolve_sheet};
use crate::error::{classify, invalid_input, ErrorClass};
use crate::mailer::{resolve_from, BoxedMailer};
use anyhow::{anyhow, Context as _};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sheetpost_config::AppConfig;
use sheetpost_core::{
    classify_contacts, classify_validation, dispatch, extract_emails, ContactList,
    DispatchRequest, DispatchResult, EmailList, Record, TemplateKind, ValidationReport,
};
use sheetpost_io::{SheetMetadata, SheetSource, TemplateDocument, TemplateStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Collaborators shared by every request. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub source: Box<dyn SheetSource>,
    pub mailer: Option<BoxedMailer>,
    pub templates: TemplateStore,
}

type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Handler error; status and body follow the error's classification.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let class = classify(&self.0);
        let status = match class {
            ErrorClass::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Failure => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = format!("{:#}", self.0);
        warn!(status = status.as_u16(), error = %message, "request failed");
        let body = ErrorBody {
            error: class.label(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

// Extractor rejections are bad input and share the JSON error body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(invalid_input(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(invalid_input(rejection.body_text()))
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    sheet: Option<String>,
    range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    sheet: Option<String>,
    range: Option<String>,
    #[serde(default)]
    fix: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBody {
    sheet: Option<String>,
    range: Option<String>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
    template_type: TemplateKind,
    from: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contacts", get(contacts))
        .route("/api/emails", get(emails))
        .route("/api/validate", get(validate))
        .route("/api/sheets/:id", get(sheet_metadata))
        .route("/api/templates", get(list_templates))
        .route("/api/templates/:name", get(show_template))
        .route("/api/send", post(send))
        .with_state(Arc::new(state))
}

pub async fn run(bind: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    let addr = listener.local_addr().with_context(|| "read bound address")?;
    info!(%addr, "http server listening");
    eprintln!("listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "serve http")?;
    info!("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}

/// Runs a blocking pipeline on the blocking pool.
async fn blocking<T, F>(state: SharedState, work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> anyhow::Result<T> + Send + 'static,
{
    let output = tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|err| anyhow!("worker task failed: {err}"))??;
    Ok(Json(output))
}

fn load(
    state: &AppState,
    sheet: Option<String>,
    range: Option<String>,
) -> anyhow::Result<Vec<Record>> {
    let sheet = resolve_sheet(&state.config, sheet)?;
    let range = resolve_range(&state.config, range);
    fetch_records(state.source.as_ref(), &sheet, &range)
}

async fn contacts(
    State(state): State<SharedState>,
    query: Result<Query<SourceQuery>, QueryRejection>,
) -> ApiResult<ContactList> {
    let Query(query) = query?;
    blocking(state, move |state| {
        let records = load(state, query.sheet, query.range)?;
        Ok(classify_contacts(&records))
    })
    .await
}

async fn emails(
    State(state): State<SharedState>,
    query: Result<Query<SourceQuery>, QueryRejection>,
) -> ApiResult<EmailList> {
    let Query(query) = query?;
    blocking(state, move |state| {
        let records = load(state, query.sheet, query.range)?;
        Ok(extract_emails(&records))
    })
    .await
}

async fn validate(
    State(state): State<SharedState>,
    query: Result<Query<ValidateQuery>, QueryRejection>,
) -> ApiResult<ValidationReport> {
    let Query(query) = query?;
    blocking(state, move |state| {
        let records = load(state, query.sheet, query.range)?;
        Ok(classify_validation(&records, query.fix))
    })
    .await
}

async fn sheet_metadata(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<SheetMetadata> {
    blocking(state, move |state| {
        state
            .source
            .fetch_metadata(&id)
            .with_context(|| format!("read metadata for {id}"))
    })
    .await
}

async fn list_templates(State(state): State<SharedState>) -> ApiResult<Vec<String>> {
    blocking(state, |state| {
        state
            .templates
            .list_templates()
            .with_context(|| "list templates")
    })
    .await
}

async fn show_template(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<TemplateDocument> {
    blocking(state, move |state| {
        state
            .templates
            .load_template(&name)
            .with_context(|| format!("load template {name}"))
    })
    .await
}

async fn send(
    State(state): State<SharedState>,
    body: Result<Json<SendBody>, JsonRejection>,
) -> ApiResult<DispatchResult> {
    let Json(body) = body?;
    blocking(state, move |state| {
        let from = resolve_from(&state.config, body.from);
        let request = DispatchRequest {
            from: &from,
            subject: &body.subject,
            body: &body.body,
            template: body.template_type,
        };
        request.validate()?;
        let mailer = state
            .mailer
            .as_deref()
            .ok_or_else(|| invalid_input("smtp is not configured"))?;

        let records = load(state, body.sheet, body.range)?;
        let contacts = classify_contacts(&records).contacts;
        let result = dispatch(mailer, &contacts, &request)?;
        info!(
            sent = result.sent_count,
            failed = result.failed_count,
            "dispatch finished"
        );
        Ok(result)
    })
    .await
}
