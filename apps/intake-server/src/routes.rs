//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Handling                               │
//! │                                                                         │
//! │  GET /           peek reference ──► IndexPage ──► 200 text/html        │
//! │                                                                         │
//! │  GET /fillform   200, empty                                            │
//! │                                                                         │
//! │  POST /fillform                                                         │
//! │    parse form ── invalid ──► 400                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    spawn ► ledger.lock() ─────────────────────────────────────┐        │
//! │       │  reference = guard.reference()                        │        │
//! │       │  fields    = DocumentFields::map(..)                  │ one at │
//! │       │  backend.fill(..) ── fails ──► 500, counter unchanged │ a time │
//! │       │  viewer::open(document)                               │        │
//! │       │  guard.advance() ── fails ──► 500, counter advanced   │        │
//! │    ◄──┴───────────────────────────────────────────────────────┘        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    302 Location: <Referer>                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::{
    extract::{rejection::FormRejection, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use chrono::Local;
use intake_core::config::TimeoutSettings;
use intake_core::{DocumentFields, RawSubmission, Submission};
use tower::ServiceBuilder;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::document::document_path;
use crate::error::ApiError;
use crate::state::AppState;
use crate::view::IndexPage;
use crate::viewer;

/// Builds the application router.
pub fn router(state: AppState, timeouts: TimeoutSettings) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fillform", get(fillform_noop).post(fillform))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    info_span!(
                        "request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeouts.write(),
                ))
                .layer(RequestBodyTimeoutLayer::new(timeouts.read())),
        )
}

/// Renders the intake form with the next reference.
async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let config = state.ledger.snapshot().await;
    let page = IndexPage::new(config.peek_reference(), &config);
    Ok(Html(page.to_html()?))
}

async fn fillform_noop() {}

/// Turns one submission into a document and advances the counter.
async fn fillform(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<RawSubmission>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(raw) = form?;
    let submission = Submission::parse(raw)?;

    // Detached: a request dropped by the write timeout must not abandon a
    // document whose counter has not been advanced yet.
    tokio::spawn(issue_document(state, submission))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(redirect_back(&headers))
}

/// The critical section: reference, document, viewer, advance.
async fn issue_document(state: AppState, submission: Submission) -> Result<String, ApiError> {
    let guard = state.ledger.lock().await;
    let reference = guard.reference();

    if !submission.displayed_reference.is_empty() && submission.displayed_reference != reference {
        warn!(
            displayed = %submission.displayed_reference,
            issued = %reference,
            "Form was submitted from a stale page"
        );
    }

    let config = guard.config();
    let fields = DocumentFields::map(&submission, config, &reference, Local::now().naive_local());
    let destination = document_path(&config.server.save_path, &reference);
    let launch_viewer = config.server.launch_viewer;

    if let Err(e) = state
        .backend
        .fill(&fields, &config.server.template_path, &destination)
        .await
    {
        error!(%reference, error = %e, "Document generation failed");
        return Err(e.into());
    }
    info!(%reference, ?destination, "Document created");

    if launch_viewer {
        viewer::open(&destination);
    }

    guard.advance().await?;
    Ok(reference)
}

/// 302 to the page the form came from.
fn redirect_back(headers: &HeaderMap) -> Response {
    let location = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("/")
        .to_string();

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
