// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions, clippy::unused_async)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::{error, info};

use rutero::{BlockRuleSource, SourceUnavailable, StaticDurationTable, StaticFleetCatalog};
use rutero_api::{
    ApiError, AssignVehicleRequest, BookingHistoryResponse, BookingInfo, CheckAvailabilityRequest,
    CheckAvailabilityResponse, CreateBookingRequest, QuoteRequest, QuoteResponse,
    RepriceBookingRequest, ReserveBookingRequest, ReturnOpportunitiesRequest,
    ReturnOpportunitiesResponse, TransitionBookingRequest, assign_vehicle, booking_history,
    check_availability, create_booking, find_return_opportunities, get_booking, quote,
    reprice_booking, reserve_booking, transition_booking,
};
use rutero_audit::Actor;
use rutero_domain::{BlockRule, Place, VehicleClass};
use rutero_persistence::MemoryStore;

/// Rutero Server - HTTP server for the Rutero booking engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON reference-data file (fleet, durations, block rules).
    /// If not provided, uses a built-in starter fleet.
    #[arg(short, long)]
    config: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// One per-destination duration entry in the reference-data file.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DurationEntry {
    /// The destination name.
    destination: String,
    /// Estimated trip length in minutes.
    minutes: i64,
}

/// Reference data loaded at startup.
///
/// The engine consumes this read-only; there is no runtime editing surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReferenceConfig {
    /// The fleet's vehicle-class table.
    fleet: Vec<VehicleClass>,
    /// Per-destination trip durations.
    #[serde(default)]
    durations: Vec<DurationEntry>,
    /// Operator-defined blackout rules.
    #[serde(default)]
    block_rules: Vec<BlockRule>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            fleet: vec![
                VehicleClass::new(String::from("Sedan"), 3, 2),
                VehicleClass::new(String::from("Van"), 10, 1),
            ],
            durations: Vec::new(),
            block_rules: Vec::new(),
        }
    }
}

/// A fixed block-rule table loaded from the reference-data file.
#[derive(Debug, Clone)]
struct FixedRules {
    rules: Vec<BlockRule>,
}

impl BlockRuleSource for FixedRules {
    fn active_rules(&self) -> Result<Vec<BlockRule>, SourceUnavailable> {
        Ok(self.rules.clone())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The booking store.
    store: Arc<MemoryStore>,
    /// The operator block rules.
    rules: Arc<FixedRules>,
    /// The fleet capacity table.
    fleet: Arc<StaticFleetCatalog>,
    /// The per-destination duration table.
    durations: Arc<StaticDurationTable>,
}

/// API request for admitting a draft booking.
///
/// This includes actor attribution in addition to the admission data.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReserveApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's type ("operator", "client", "system").
    actor_type: String,
    /// The booking to admit.
    booking_id: i64,
    /// The version the caller last observed.
    expected_version: u64,
}

/// API request for a lifecycle transition.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TransitionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's type ("operator", "client", "system").
    actor_type: String,
    /// The booking to transition.
    booking_id: i64,
    /// The version the caller last observed.
    expected_version: u64,
    /// The target state name.
    target_state: String,
    /// Optional free-form note recorded on the history event.
    note: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::NotBookable { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Returns the current wall-clock instant as a naive datetime.
fn now() -> PrimitiveDateTime {
    let utc: OffsetDateTime = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(utc.date(), utc.time())
}

/// Handler for GET /availability endpoint.
///
/// Checks whether the requested trip can be admitted right now.
async fn handle_check_availability(
    AxumState(app_state): AxumState<AppState>,
    Query(request): Query<CheckAvailabilityRequest>,
) -> Result<Json<CheckAvailabilityResponse>, HttpError> {
    info!(
        origin = %request.origin,
        destination = %request.destination,
        passengers = request.passengers,
        "Handling check_availability request"
    );

    let response: CheckAvailabilityResponse = check_availability(
        &request,
        app_state.rules.as_ref(),
        app_state.store.as_ref(),
        app_state.fleet.as_ref(),
        app_state.durations.as_ref(),
    )?;

    Ok(Json(response))
}

/// Handler for POST /quote endpoint.
///
/// Computes an itemized price breakdown plus its deposit split.
async fn handle_quote(
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, HttpError> {
    info!(base_fare = request.base_fare, "Handling quote request");

    let response: QuoteResponse = quote(&request)?;

    Ok(Json(response))
}

/// Handler for GET `/return_opportunities` endpoint.
///
/// Finds empty-return opportunities for the requested trip.
async fn handle_return_opportunities(
    AxumState(app_state): AxumState<AppState>,
    Query(request): Query<ReturnOpportunitiesRequest>,
) -> Result<Json<ReturnOpportunitiesResponse>, HttpError> {
    info!(
        origin = %request.origin,
        destination = %request.destination,
        "Handling return_opportunities request"
    );

    let response: ReturnOpportunitiesResponse = find_return_opportunities(
        &request,
        app_state.store.as_ref(),
        app_state.durations.as_ref(),
    )?;

    Ok(Json(response))
}

/// Handler for POST /bookings endpoint.
///
/// Creates a booking in the draft state.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(
        origin = %request.origin,
        destination = %request.destination,
        passengers = request.passengers,
        "Handling create_booking request"
    );

    let booking: BookingInfo = create_booking(app_state.store.as_ref(), &request)?;

    info!(code = %booking.code, "Successfully drafted booking");

    Ok(Json(booking))
}

/// Handler for POST /reserve endpoint.
///
/// Atomically admits a draft booking, moving it to pending.
async fn handle_reserve(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReserveApiRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        booking_id = req.booking_id,
        "Handling reserve request"
    );

    let actor: Actor = Actor::new(req.actor_id, req.actor_type);
    let request: ReserveBookingRequest = ReserveBookingRequest {
        booking_id: req.booking_id,
        expected_version: req.expected_version,
    };

    let booking: BookingInfo = reserve_booking(
        app_state.store.as_ref(),
        &request,
        app_state.rules.as_ref(),
        app_state.fleet.as_ref(),
        app_state.durations.as_ref(),
        actor,
        now(),
    )?;

    info!(code = %booking.code, "Successfully admitted booking");

    Ok(Json(booking))
}

/// Handler for POST /transition endpoint.
///
/// Applies a lifecycle transition to a stored booking.
async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        booking_id = req.booking_id,
        target_state = %req.target_state,
        "Handling transition request"
    );

    let actor: Actor = Actor::new(req.actor_id, req.actor_type);
    let request: TransitionBookingRequest = TransitionBookingRequest {
        booking_id: req.booking_id,
        expected_version: req.expected_version,
        target_state: req.target_state,
        note: req.note,
    };

    let booking: BookingInfo =
        transition_booking(app_state.store.as_ref(), &request, actor, now())?;

    info!(
        code = %booking.code,
        state = %booking.state,
        "Successfully applied transition"
    );

    Ok(Json(booking))
}

/// Handler for POST /assignment endpoint.
///
/// Sets or clears a booking's vehicle/driver assignment.
async fn handle_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<AssignVehicleRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(
        booking_id = request.booking_id,
        vehicle_id = ?request.vehicle_id,
        driver_id = ?request.driver_id,
        "Handling assignment request"
    );

    let booking: BookingInfo = assign_vehicle(app_state.store.as_ref(), &request)?;

    Ok(Json(booking))
}

/// Handler for POST /reprice endpoint.
///
/// Recomputes a draft or pending booking's price.
async fn handle_reprice(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<RepriceBookingRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(
        booking_id = request.booking_id,
        base_fare = request.base_fare,
        "Handling reprice request"
    );

    let booking: BookingInfo = reprice_booking(app_state.store.as_ref(), &request)?;

    Ok(Json(booking))
}

/// Handler for GET `/bookings/{booking_id}` endpoint.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingInfo>, HttpError> {
    info!(booking_id = booking_id, "Handling get_booking request");

    let booking: BookingInfo = get_booking(app_state.store.as_ref(), booking_id)?;

    Ok(Json(booking))
}

/// Handler for GET `/bookings/{booking_id}/history` endpoint.
async fn handle_booking_history(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingHistoryResponse>, HttpError> {
    info!(booking_id = booking_id, "Handling booking_history request");

    let history: BookingHistoryResponse = booking_history(app_state.store.as_ref(), booking_id)?;

    Ok(Json(history))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/availability", get(handle_check_availability))
        .route("/quote", post(handle_quote))
        .route("/return_opportunities", get(handle_return_opportunities))
        .route("/bookings", post(handle_create_booking))
        .route("/reserve", post(handle_reserve))
        .route("/transition", post(handle_transition))
        .route("/assignment", post(handle_assignment))
        .route("/reprice", post(handle_reprice))
        .route("/bookings/{booking_id}", get(handle_get_booking))
        .route("/bookings/{booking_id}/history", get(handle_booking_history))
        .with_state(app_state)
}

/// Builds the shared application state from loaded reference data.
fn build_app_state(config: ReferenceConfig) -> AppState {
    let durations: Vec<(Place, i64)> = config
        .durations
        .iter()
        .map(|entry| (Place::new(&entry.destination), entry.minutes))
        .collect();

    AppState {
        store: Arc::new(MemoryStore::new()),
        rules: Arc::new(FixedRules {
            rules: config.block_rules,
        }),
        fleet: Arc::new(StaticFleetCatalog::new(config.fleet)),
        durations: Arc::new(StaticDurationTable::new(durations)),
    }
}

/// Loads reference data from the given path, or the built-in defaults.
fn load_reference(path: Option<&str>) -> Result<ReferenceConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading reference data from: {}", path);
            let raw: String = std::fs::read_to_string(path)?;
            let config: ReferenceConfig = serde_json::from_str(&raw)?;
            for rule in &config.block_rules {
                rule.validate()?;
            }
            Ok(config)
        }
        None => {
            info!("Using built-in starter reference data");
            Ok(ReferenceConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rutero Server");

    let config: ReferenceConfig = load_reference(args.config.as_deref())?;
    let app_state: AppState = build_app_state(config);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
