//! HTTP API handlers for Event Metrycs.
//!
//! Handlers load an [`Event`] from the [`EventStore`], run it through the
//! synthesis and report stages with the current time, and serialize the
//! result. Randomness comes from a per-request [`StdRng`], seeded from
//! configuration when a fixed seed is set.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /events`, `POST /events` - List or register events
//! - `GET /events/:id` - A single event
//! - `GET /events/:id/metrics` - Synthesized metrics snapshot
//! - `GET /events/:id/metrics/update?category=` - Live-update delta
//! - `GET /events/:id/metrics/export?format=` - CSV or JSON export
//! - `GET /events/:id/report` - Qualitative report

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::error::Error;
use crate::export::{ExportFormat, metrics_to_csv, metrics_to_json};
use crate::model::{
    CreateEventRequest, Event, EventMetrics, EventReport, ExportQuery, MetricCategory,
    MetricsUpdate, UpdateQuery,
};
use crate::report::generate_report;
use crate::storage::EventStore;
use crate::synthesis::{generate_metrics_update, synthesize_metrics};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,

    /// Fixed seed for reproducible responses; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl AppState {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", get(get_event))
        .route("/events/:id/metrics", get(get_metrics))
        .route("/events/:id/metrics/update", get(get_metrics_update))
        .route("/events/:id/metrics/export", get(export_metrics))
        .route("/events/:id/report", get(get_report))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Map a boundary error onto an HTTP status.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::EventNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidEvent(_)
        | Error::UnknownCategory(_)
        | Error::UnknownExportFormat(_) => StatusCode::BAD_REQUEST,
    }
}

async fn load_event(state: &AppState, id: &str) -> Result<Event, StatusCode> {
    state.store.get(id).await.map_err(|e| {
        warn!(event_id = %id, error = %e, "Event lookup failed");
        status_for(&e)
    })
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /events - List all events, earliest start first.
#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    let events = state.store.list().await;
    info!(event_count = events.len(), "Events listed");
    Json(events)
}

/// POST /events - Register a new event.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "ETH Cali",
///     "eventType": "meetup",
///     "maxCapacity": 120,
///     "startDate": "2026-11-20T18:00:00Z",
///     "endDate": "2026-11-20T21:00:00Z"
/// }
/// ```
///
/// `code`, `registeredCount` and `shareCount` are optional.
///
/// # Response
///
/// Returns `201 Created` with the stored event, or `400 Bad Request` when the
/// name is blank or the event does not end after it starts.
#[instrument(skip(state, request), fields(name = %request.name))]
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), StatusCode> {
    match state.store.create(request, Utc::now()).await {
        Ok(event) => {
            info!(event_id = %event.id, code = %event.code, "Event created");
            Ok((StatusCode::CREATED, Json(event)))
        }
        Err(e) => {
            warn!(error = %e, "Failed to create event");
            Err(status_for(&e))
        }
    }
}

/// GET /events/:id - Fetch one event.
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, StatusCode> {
    load_event(&state, &id).await.map(Json)
}

/// GET /events/:id/metrics - Synthesize a metrics snapshot.
///
/// Values are random within documented ranges unless a seed is configured.
#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventMetrics>, StatusCode> {
    let event = load_event(&state, &id).await?;
    let metrics = synthesize_metrics(&event, Utc::now(), &mut state.rng());

    info!(
        event_id = %event.id,
        registrations = metrics.registration.total,
        checked_in = metrics.attendance.checked_in,
        "Metrics generated"
    );
    Ok(Json(metrics))
}

/// GET /events/:id/metrics/update - Draw a live-update delta.
///
/// # Query Parameters
///
/// - `category` (required): `registrations`, `attendance`, `onchain` or `social`
///
/// # Response
///
/// ```json
/// {
///     "category": "social",
///     "changes": { "newMentions": 6, "mentions": 148 },
///     "timestamp": "2026-10-18T12:00:00Z"
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_metrics_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<MetricsUpdate>, StatusCode> {
    let category: MetricCategory = query.category.parse().map_err(|e: Error| {
        warn!(category = %query.category, error = %e, "Invalid metric category");
        status_for(&e)
    })?;

    let event = load_event(&state, &id).await?;
    let now = Utc::now();
    let mut rng = state.rng();
    let current = synthesize_metrics(&event, now, &mut rng);
    let update = generate_metrics_update(&current, category, now, &mut rng);

    info!(
        event_id = %event.id,
        category = category.as_str(),
        "Metrics update generated"
    );
    Ok(Json(update))
}

/// GET /events/:id/metrics/export - Export a metrics snapshot.
///
/// # Query Parameters
///
/// - `format` (optional): `csv` (default) or `json`
///
/// The response is served as a file attachment named after the event code.
#[instrument(skip(state))]
pub async fn export_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, StatusCode> {
    let format: ExportFormat = query.format.parse().map_err(|e: Error| {
        warn!(format = %query.format, error = %e, "Invalid export format");
        status_for(&e)
    })?;

    let event = load_event(&state, &id).await?;
    let now = Utc::now();
    let metrics = synthesize_metrics(&event, now, &mut state.rng());

    let body = match format {
        ExportFormat::Csv => metrics_to_csv(&event, &metrics, now),
        ExportFormat::Json => metrics_to_json(&event, &metrics, now).map_err(|e| {
            warn!(event_id = %event.id, error = %e, "Failed to serialize export");
            StatusCode::INTERNAL_SERVER_ERROR
        })?,
    };

    let disposition = format!(
        "attachment; filename=\"{}-metrics.{}\"",
        event.code.to_lowercase(),
        format.extension()
    );

    info!(
        event_id = %event.id,
        format = format.extension(),
        bytes = body.len(),
        "Metrics exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /events/:id/report - Build a qualitative report.
#[instrument(skip(state))]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventReport>, StatusCode> {
    let event = load_event(&state, &id).await?;
    let now = Utc::now();
    let metrics = synthesize_metrics(&event, now, &mut state.rng());
    let report = generate_report(&event, &metrics, now);

    info!(
        event_id = %event.id,
        highlights = report.highlights.len(),
        lowlights = report.lowlights.len(),
        recommendations = report.recommendations.len(),
        "Report generated"
    );
    Ok(Json(report))
}
