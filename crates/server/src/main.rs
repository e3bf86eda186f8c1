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
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use fieldops::{CommitOrchestrator, Stores};
use fieldops_api::{
    ApiError, AssignJobOrderRequest, AssignJobOrderResponse, AuthenticatedActor,
    CheckCandidateResponse, GetJobOrderResponse, JobOrderCandidateInfo, JobOrderHistoryResponse,
    ListLocationNodesResponse, ListLookupResponse, RequiredFieldsResponse,
    RetryApplicationSyncResponse, RetryInventoryReconciliationResponse, Role,
    SubmitJobOrderResponse, assign_job_order, authenticate_stub, check_candidate, get_job_order,
    get_required_fields, job_order_history, list_barangays, list_catalog, list_cities,
    list_location_nodes, list_locations, list_ports, list_regions, retry_application_sync,
    retry_inventory_reconciliation, submit_job_order,
};
use fieldops_audit::Cause;
use fieldops_domain::{MediaKind, MediaRef};
use fieldops_persistence::{
    ACCEPTED_CONTENT_TYPES, DEFAULT_MAX_MEDIA_BYTES, FsMediaStore, Persistence, PersistenceError,
    SharedPersistence,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Field-service job-order server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory captured media files are stored under
    #[arg(long, default_value = "./media")]
    media_dir: PathBuf,

    /// Largest accepted media file, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MEDIA_BYTES)]
    max_media_bytes: usize,
}

/// Application state shared across handlers.
///
/// Store calls are synchronous and run on the blocking pool.
#[derive(Clone)]
struct AppState {
    orchestrator: Arc<CommitOrchestrator>,
    /// Serves stored media back to clients.
    media: FsMediaStore,
}

impl AppState {
    fn new(persistence: Persistence, media: FsMediaStore) -> Self {
        let persistence: SharedPersistence = SharedPersistence::new(persistence);
        let orchestrator: CommitOrchestrator = CommitOrchestrator::new(Stores {
            lookups: Arc::new(persistence.clone()),
            media: Arc::new(media.clone()),
            job_orders: Arc::new(persistence.clone()),
            applications: Arc::new(persistence.clone()),
            ledger: Arc::new(persistence),
        });
        Self {
            orchestrator: Arc::new(orchestrator),
            media,
        }
    }
}

/// API request for assigning a job order to an installation group.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AssignJobOrderApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The application the job order is created for.
    application_id: i64,
    /// The installation group.
    group_assignment: String,
}

/// API request for submitting a job-order form.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubmitJobOrderApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The form as the operator filled it in.
    candidate: JobOrderCandidateInfo,
}

/// API request for re-running a commit step that did not complete.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RetryApiRequest {
    actor_id: String,
    actor_role: String,
    cause_id: String,
    cause_description: String,
}

/// Query parameters for the required-fields listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RequiredFieldsQuery {
    status: String,
    connection_type: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    error: bool,
    message: String,
}

/// HTTP error wrapper that converts API errors to HTTP responses.
#[derive(Debug)]
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
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ValidationFailed { .. } | ApiError::DomainRuleViolation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StepFailed { .. } => StatusCode::BAD_GATEWAY,
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

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        if let PersistenceError::NotFound(what) = &err {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: format!("Not found: {what}"),
            };
        }
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Authenticates the operator named on a write request.
fn authenticate(actor_id: String, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = Role::from_str(actor_role).map_err(ApiError::from)?;
    let actor: AuthenticatedActor = authenticate_stub(actor_id, role).map_err(ApiError::from)?;
    Ok(actor)
}

/// Runs a synchronous operation on the blocking pool.
async fn run_blocking<T, E, F>(operation: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<HttpError> + Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(result) => result.map_err(Into::into),
        Err(join_error) => {
            error!(error = %join_error, "Blocking task did not complete");
            Err(HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::from("Internal error: request task did not complete"),
            })
        }
    }
}

/// Handler for GET `/lookups/regions`.
async fn handle_list_regions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!("Handling list_regions request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse = run_blocking(move || list_regions(&orchestrator)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/regions/{region_id}/cities`.
async fn handle_list_cities(
    AxumState(app_state): AxumState<AppState>,
    Path(region_id): Path<i64>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!(region_id, "Handling list_cities request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse =
        run_blocking(move || list_cities(&orchestrator, region_id)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/cities/{city_id}/barangays`.
async fn handle_list_barangays(
    AxumState(app_state): AxumState<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!(city_id, "Handling list_barangays request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse =
        run_blocking(move || list_barangays(&orchestrator, city_id)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/barangays/{barangay_id}/locations`.
async fn handle_list_locations(
    AxumState(app_state): AxumState<AppState>,
    Path(barangay_id): Path<i64>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!(barangay_id, "Handling list_locations request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse =
        run_blocking(move || list_locations(&orchestrator, barangay_id)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/location_nodes`.
///
/// Returns the whole location hierarchy so clients can validate paths
/// offline.
async fn handle_list_location_nodes(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListLocationNodesResponse>, HttpError> {
    info!("Handling list_location_nodes request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLocationNodesResponse =
        run_blocking(move || list_location_nodes(&orchestrator)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/catalogs/{catalog}`.
async fn handle_list_catalog(
    AxumState(app_state): AxumState<AppState>,
    Path(catalog): Path<String>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!(catalog = %catalog, "Handling list_catalog request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse =
        run_blocking(move || list_catalog(&orchestrator, &catalog)).await?;
    Ok(Json(response))
}

/// Handler for GET `/lookups/lcp_naps/{lcp_nap_id}/ports`.
async fn handle_list_ports(
    AxumState(app_state): AxumState<AppState>,
    Path(lcp_nap_id): Path<i64>,
) -> Result<Json<ListLookupResponse>, HttpError> {
    info!(lcp_nap_id, "Handling list_ports request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: ListLookupResponse =
        run_blocking(move || list_ports(&orchestrator, lcp_nap_id)).await?;
    Ok(Json(response))
}

/// Handler for GET `/required_fields`.
async fn handle_get_required_fields(
    Query(params): Query<RequiredFieldsQuery>,
) -> Result<Json<RequiredFieldsResponse>, HttpError> {
    info!(status = %params.status, "Handling get_required_fields request");
    let response: RequiredFieldsResponse =
        get_required_fields(&params.status, params.connection_type.as_deref())?;
    Ok(Json(response))
}

/// Handler for POST `/job_orders`.
///
/// Dispatchers assign a new job order to an installation group.
async fn handle_assign_job_order(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignJobOrderApiRequest>,
) -> Result<Json<AssignJobOrderResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        application_id = req.application_id,
        "Handling assign_job_order request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignJobOrderRequest = AssignJobOrderRequest {
        application_id: req.application_id,
        group_assignment: req.group_assignment,
    };

    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: AssignJobOrderResponse =
        run_blocking(move || assign_job_order(&orchestrator, &request, &actor, cause)).await?;
    Ok(Json(response))
}

/// Handler for GET `/job_orders/{job_order_id}`.
async fn handle_get_job_order(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
) -> Result<Json<GetJobOrderResponse>, HttpError> {
    info!(job_order_id, "Handling get_job_order request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: GetJobOrderResponse =
        run_blocking(move || get_job_order(&orchestrator, job_order_id)).await?;
    Ok(Json(response))
}

/// Handler for POST `/job_orders/{job_order_id}/check`.
///
/// Reports what a candidate still lacks without writing anything.
async fn handle_check_candidate(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
    Json(candidate): Json<JobOrderCandidateInfo>,
) -> Result<Json<CheckCandidateResponse>, HttpError> {
    info!(job_order_id, "Handling check_candidate request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: CheckCandidateResponse =
        run_blocking(move || check_candidate(&orchestrator, job_order_id, candidate)).await?;
    Ok(Json(response))
}

/// Handler for POST `/job_orders/{job_order_id}/submit`.
///
/// Commits the candidate. Non-fatal follow-up failures are returned as
/// warnings on a 200 response.
async fn handle_submit_job_order(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
    Json(req): Json<SubmitJobOrderApiRequest>,
) -> Result<Json<SubmitJobOrderResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        job_order_id,
        status = %req.candidate.status,
        "Handling submit_job_order request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let candidate: JobOrderCandidateInfo = req.candidate;

    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: SubmitJobOrderResponse = run_blocking(move || {
        submit_job_order(&orchestrator, job_order_id, candidate, &actor, cause)
    })
    .await?;

    if !response.warnings.is_empty() {
        warn!(
            job_order_id,
            warnings = response.warnings.len(),
            "Job order committed with warnings"
        );
    }
    Ok(Json(response))
}

/// Handler for GET `/job_orders/{job_order_id}/history`.
async fn handle_job_order_history(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
) -> Result<Json<JobOrderHistoryResponse>, HttpError> {
    info!(job_order_id, "Handling job_order_history request");
    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: JobOrderHistoryResponse =
        run_blocking(move || job_order_history(&orchestrator, job_order_id)).await?;
    Ok(Json(response))
}

/// Handler for POST `/job_orders/{job_order_id}/inventory/retry`.
async fn handle_retry_inventory_reconciliation(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
    Json(req): Json<RetryApiRequest>,
) -> Result<Json<RetryInventoryReconciliationResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        job_order_id,
        cause_id = %req.cause_id,
        cause_description = %req.cause_description,
        "Handling retry_inventory_reconciliation request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: RetryInventoryReconciliationResponse = run_blocking(move || {
        retry_inventory_reconciliation(&orchestrator, job_order_id, &actor, cause)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for POST `/job_orders/{job_order_id}/application/retry`.
async fn handle_retry_application_sync(
    AxumState(app_state): AxumState<AppState>,
    Path(job_order_id): Path<i64>,
    Json(req): Json<RetryApiRequest>,
) -> Result<Json<RetryApplicationSyncResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        job_order_id,
        cause_id = %req.cause_id,
        cause_description = %req.cause_description,
        "Handling retry_application_sync request"
    );

    let actor: AuthenticatedActor = authenticate(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let orchestrator: Arc<CommitOrchestrator> = Arc::clone(&app_state.orchestrator);
    let response: RetryApplicationSyncResponse =
        run_blocking(move || retry_application_sync(&orchestrator, job_order_id, &actor, cause))
            .await?;
    Ok(Json(response))
}

/// Content type served for a stored file, by extension.
fn media_content_type(file: &str) -> &'static str {
    let extension: &str = file.rsplit_once('.').map_or("", |(_, ext)| ext);
    ACCEPTED_CONTENT_TYPES
        .iter()
        .find(|(_, accepted)| accepted.eq_ignore_ascii_case(extension))
        .map_or("application/octet-stream", |(content_type, _)| *content_type)
}

/// Handler for GET `/media/{kind}/{file}`.
///
/// Serves a file previously stored by a submission.
async fn handle_get_media(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, file)): Path<(String, String)>,
) -> Result<Response, HttpError> {
    info!(kind = %kind, file = %file, "Handling get_media request");

    let kind: MediaKind = MediaKind::from_str(&kind).map_err(|_| HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("Not found: media kind {kind}"),
    })?;
    let content_type: &'static str = media_content_type(&file);
    let reference: MediaRef = MediaRef::new(format!("{}/{file}", kind.as_str()));

    let media: FsMediaStore = app_state.media.clone();
    let bytes: Vec<u8> = run_blocking(move || media.read(&reference)).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/lookups/regions", get(handle_list_regions))
        .route(
            "/lookups/regions/{region_id}/cities",
            get(handle_list_cities),
        )
        .route(
            "/lookups/cities/{city_id}/barangays",
            get(handle_list_barangays),
        )
        .route(
            "/lookups/barangays/{barangay_id}/locations",
            get(handle_list_locations),
        )
        .route("/lookups/location_nodes", get(handle_list_location_nodes))
        .route("/lookups/catalogs/{catalog}", get(handle_list_catalog))
        .route("/lookups/lcp_naps/{lcp_nap_id}/ports", get(handle_list_ports))
        .route("/required_fields", get(handle_get_required_fields))
        .route("/job_orders", post(handle_assign_job_order))
        .route("/job_orders/{job_order_id}", get(handle_get_job_order))
        .route(
            "/job_orders/{job_order_id}/check",
            post(handle_check_candidate),
        )
        .route(
            "/job_orders/{job_order_id}/submit",
            post(handle_submit_job_order),
        )
        .route(
            "/job_orders/{job_order_id}/history",
            get(handle_job_order_history),
        )
        .route(
            "/job_orders/{job_order_id}/inventory/retry",
            post(handle_retry_inventory_reconciliation),
        )
        .route(
            "/job_orders/{job_order_id}/application/retry",
            post(handle_retry_application_sync),
        )
        .route("/media/{kind}/{file}", get(handle_get_media))
        .with_state(app_state)
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

    info!("Initializing job-order server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    info!(
        media_dir = %args.media_dir.display(),
        max_media_bytes = args.max_media_bytes,
        "Using filesystem media store"
    );
    let media: FsMediaStore = FsMediaStore::new(&args.media_dir, args.max_media_bytes)?;

    let app_state: AppState = AppState::new(persistence, media);

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
