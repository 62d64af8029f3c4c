// 🌐 REST API - JSON views over the same page logic the terminal UI drives
//
// Pages are rebuilt for every request, so actions answer with their result
// but leave no trace for the next call. Only the active persona is shared.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::activity::Notice;
use crate::config::Settings;
use crate::entities::{
    Client, ClientStatus, InboxItem, MandantReceipt, MandantTransaction, Message,
    ReceiptReviewState, Transaction, VatPeriodStatus,
};
use crate::error::Error;
use crate::filters::{parse_optional, MonthFilter};
use crate::pages::{
    ClientDetailPage, ClientKpis, ClientListPage, ClientListSummary, InboxKpis, InboxPage,
    MandantDashboardPage, MandantReceiptsPage, MandantTransactionsPage, MandantUploadPage,
    MatchingPage, RiskOverview, UploadOutcome,
};
use crate::requests::ReceiptRequest;
use crate::role::{NavItem, RoleContext, User, UserRole};
use crate::routes::{self, Route};

// ============================================================================
// STATE & RESPONSES
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    role: Arc<RwLock<RoleContext>>,
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            role: Arc::new(RwLock::new(RoleContext::new(settings.role))),
            settings: Arc::new(settings),
        }
    }

    fn roles(&self) -> RoleContext {
        match self.role.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn user(&self) -> User {
        self.roles().current().clone()
    }

    /// Gate a route for the active persona
    fn authorize(&self, route: &Route) -> Result<User, ApiError> {
        let user = self.user();
        route.authorize(user.role)?;
        Ok(user)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::InvalidValue { .. } => StatusCode::BAD_REQUEST,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.message, "Request rejected");
        }
        (self.status, Json(ApiResponse::<()>::err(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/role", get(get_role).put(put_role))
        .route("/navigation", get(navigation))
        .route("/route", get(resolve_route))
        .route("/clients", get(list_clients))
        .route("/clients/:id", get(client_detail))
        .route("/clients/:id/matching", get(matching))
        .route("/clients/:id/matching/requests", post(request_receipts))
        .route("/inbox", get(inbox))
        .route("/mandant/dashboard", get(mandant_dashboard))
        .route("/mandant/transactions", get(mandant_transactions))
        .route("/mandant/transactions/:id/upload", post(upload_for_transaction))
        .route("/mandant/receipts", get(mandant_receipts).post(upload_receipts));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// PERSONA & NAVIGATION
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthView {
    status: &'static str,
    version: &'static str,
}

async fn health() -> ApiResult<HealthView> {
    ok(HealthView {
        status: "ok",
        version: crate::VERSION,
    })
}

#[derive(Debug, Serialize)]
struct RoleView {
    current: User,
    users: Vec<User>,
    navigation: Vec<NavItem>,
    start_path: &'static str,
}

impl RoleView {
    fn from_context(roles: &RoleContext) -> Self {
        Self {
            current: roles.current().clone(),
            users: roles.users().to_vec(),
            navigation: roles.navigation(),
            start_path: roles.role().start_path(),
        }
    }
}

async fn get_role(State(state): State<AppState>) -> ApiResult<RoleView> {
    ok(RoleView::from_context(&state.roles()))
}

#[derive(Debug, Deserialize)]
struct RoleBody {
    role: UserRole,
}

async fn put_role(State(state): State<AppState>, Json(body): Json<RoleBody>) -> ApiResult<RoleView> {
    let mut guard = match state.role.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.switch_to(body.role);
    ok(RoleView::from_context(&guard))
}

async fn navigation(State(state): State<AppState>) -> ApiResult<Vec<NavItem>> {
    ok(state.roles().navigation())
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    path: String,
}

#[derive(Debug, Serialize)]
struct RouteView {
    route: Route,
    path: String,
    title: String,
}

async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> ApiResult<RouteView> {
    let route = routes::resolve(&query.path, state.roles().role())?;
    if let Route::NotFound { path } = &route {
        return Err(ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("No page at {}", path),
        });
    }
    ok(RouteView {
        path: route.to_path(),
        title: route.title(),
        route,
    })
}

// ============================================================================
// KANZLEI
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClientQuery {
    status: Option<String>,
    cadence: Option<String>,
    search: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClientRow {
    #[serde(flatten)]
    client: Client,
    status: ClientStatus,
}

#[derive(Debug, Serialize)]
struct ClientListView {
    summary: ClientListSummary,
    clients: Vec<ClientRow>,
}

async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> ApiResult<ClientListView> {
    state.authorize(&Route::ClientList)?;

    let mut page = ClientListPage::new();
    if let Some(status) = query.status.as_deref() {
        page.set_status(parse_optional(status)?);
    }
    if let Some(cadence) = query.cadence.as_deref() {
        page.set_cadence(parse_optional(cadence)?);
    }
    if let Some(sort) = query.sort.as_deref() {
        page.set_sort(sort.parse()?);
    }
    if let Some(search) = query.search.as_deref() {
        page.set_search(search);
    }

    let clients = page
        .visible()
        .into_iter()
        .map(|client| ClientRow {
            status: client.status(),
            client: client.clone(),
        })
        .collect();

    ok(ClientListView {
        summary: page.summary(),
        clients,
    })
}

#[derive(Debug, Deserialize)]
struct PeriodQuery {
    period: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClientDetailView {
    client: Client,
    period: String,
    kpis: ClientKpis,
    overview: RiskOverview,
    matching_path: String,
}

async fn client_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<ClientDetailView> {
    state.authorize(&Route::ClientDetail {
        client_id: id.clone(),
    })?;

    let mut page = ClientDetailPage::open(&id)?;
    if let Some(period) = query.period.as_deref() {
        page.select_period(period.parse()?);
    }

    ok(ClientDetailView {
        client: page.client().clone(),
        period: page.period().as_str().to_string(),
        kpis: page.kpis(),
        overview: page.overview(),
        matching_path: page.matching_route().to_path(),
    })
}

#[derive(Debug, Deserialize)]
struct MatchingQuery {
    status: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchingView {
    client_id: String,
    client_name: String,
    progress: String,
    matched: usize,
    waiting: usize,
    total: usize,
    transactions: Vec<Transaction>,
}

async fn matching(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchingQuery>,
) -> ApiResult<MatchingView> {
    let user = state.authorize(&Route::Matching {
        client_id: id.clone(),
    })?;

    let mut page = MatchingPage::open(&id, &user.name)?;
    if let Some(status) = query.status.as_deref() {
        page.set_status_filter(parse_optional(status)?);
    }
    if let Some(search) = query.search.as_deref() {
        page.set_search(search);
    }

    ok(MatchingView {
        client_id: page.client().id.clone(),
        client_name: page.client().name.clone(),
        progress: page.progress_label(),
        matched: page.matched_count(),
        waiting: page.waiting_count(),
        total: page.transactions().len(),
        transactions: page.visible().into_iter().cloned().collect(),
    })
}

#[derive(Debug, Deserialize)]
struct RequestBody {
    transaction_ids: Vec<String>,
    #[serde(default)]
    note: Option<String>,
}

/// Empty selections answer with `"data": null`
async fn request_receipts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RequestBody>,
) -> ApiResult<Option<ReceiptRequest>> {
    let user = state.authorize(&Route::Matching {
        client_id: id.clone(),
    })?;

    let mut page = MatchingPage::open(&id, &user.name)?;
    for tx_id in &body.transaction_ids {
        if !page.transactions().iter().any(|t| &t.id == tx_id) {
            return Err(Error::TransactionNotFound(tx_id.clone()).into());
        }
        if !page.selection().contains(tx_id) {
            page.toggle_row(tx_id);
        }
    }

    ok(page.request_receipts(body.note.as_deref(), Utc::now()))
}

#[derive(Debug, Deserialize)]
struct InboxQuery {
    client: Option<String>,
    status: Option<String>,
    range: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct InboxView {
    kpis: InboxKpis,
    items: Vec<InboxItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_message: Option<&'static str>,
}

async fn inbox(
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> ApiResult<InboxView> {
    state.authorize(&Route::Inbox)?;

    let mut page = InboxPage::new(state.settings.reference_date);
    if let Some(client) = query.client.as_deref() {
        let client = match client {
            "" | "all" => None,
            id => Some(id.to_string()),
        };
        page.set_client(client);
    }
    if let Some(status) = query.status.as_deref() {
        page.set_status(parse_optional(status)?);
    }
    if let Some(range) = query.range.as_deref() {
        page.set_date_range(range.parse()?);
    }
    if let Some(search) = query.search.as_deref() {
        page.set_search(search);
    }

    ok(InboxView {
        kpis: page.kpis(),
        items: page.visible().into_iter().cloned().collect(),
        empty_message: page.empty_message(),
    })
}

// ============================================================================
// MANDANT
// ============================================================================

#[derive(Debug, Serialize)]
struct DashboardView {
    welcome: String,
    subtitle: &'static str,
    today: String,
    current_period: VatPeriodStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    due: Option<String>,
    periods_needing_attention: Vec<VatPeriodStatus>,
    messages: Vec<Message>,
}

async fn mandant_dashboard(State(state): State<AppState>) -> ApiResult<DashboardView> {
    let user = state.authorize(&Route::MandantDashboard)?;
    let page = MandantDashboardPage::new(&user.name, Local::now().date_naive());

    ok(DashboardView {
        welcome: page.welcome(),
        subtitle: page.subtitle(),
        today: page.today_label(),
        current_period: page.current_period().clone(),
        due: page.due_label(),
        periods_needing_attention: page.periods_needing_attention().to_vec(),
        messages: page.messages().to_vec(),
    })
}

#[derive(Debug, Deserialize)]
struct MandantTransactionQuery {
    month: Option<String>,
    year: Option<i32>,
    status: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct MandantTransactionsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<String>,
    transactions: Vec<MandantTransaction>,
}

async fn mandant_transactions(
    State(state): State<AppState>,
    Query(query): Query<MandantTransactionQuery>,
) -> ApiResult<MandantTransactionsView> {
    let period = match (query.month.as_deref(), query.year) {
        (Some(month), Some(year)) if !month.is_empty() => Some(MonthFilter::new(month, year)),
        _ => None,
    };
    let user = state.authorize(&Route::MandantTransactions {
        period: period.clone(),
    })?;

    let mut page = MandantTransactionsPage::new(&user.name, period);
    if let Some(status) = query.status.as_deref() {
        page.set_status(status.parse()?);
    }
    if let Some(search) = query.search.as_deref() {
        page.set_search(search);
    }

    ok(MandantTransactionsView {
        period: page.period_label(),
        transactions: page.visible().into_iter().cloned().collect(),
    })
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadView {
    transaction: MandantTransaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

/// "+ Beleg" on one open transaction
async fn upload_for_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UploadBody>,
) -> ApiResult<UploadView> {
    let user = state.authorize(&Route::MandantTransactions { period: None })?;
    let mut page = MandantTransactionsPage::new(&user.name, None);

    if !page.open_upload_dialog(&id)? {
        let status = page
            .find(&id)
            .map(|t| t.status.as_str())
            .unwrap_or_default();
        return Err(Error::invalid("status", status).into());
    }
    page.set_upload_filename(body.filename.as_deref().unwrap_or_default());
    page.set_upload_note(body.note.as_deref().unwrap_or_default());

    let transaction = page
        .confirm_upload()?
        .cloned()
        .ok_or_else(|| Error::TransactionNotFound(id.clone()))?;

    ok(UploadView {
        transaction,
        notice: page.activity().latest().cloned(),
    })
}

#[derive(Debug, Deserialize)]
struct ReceiptQuery {
    status: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReceiptRow {
    #[serde(flatten)]
    receipt: MandantReceipt,
    review_state: ReceiptReviewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_label: Option<String>,
}

async fn mandant_receipts(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> ApiResult<Vec<ReceiptRow>> {
    state.authorize(&Route::MandantReceipts)?;

    let mut page = MandantReceiptsPage::new();
    if let Some(status) = query.status.as_deref() {
        page.set_status(status.parse()?);
    }
    if let Some(search) = query.search.as_deref() {
        page.set_search(search);
    }

    let rows = page
        .visible()
        .into_iter()
        .map(|receipt| ReceiptRow {
            review_state: receipt.review_state(),
            link_label: receipt.link_label(),
            receipt: receipt.clone(),
        })
        .collect();
    ok(rows)
}

#[derive(Debug, Deserialize)]
struct FilesBody {
    filenames: Vec<String>,
}

/// Simulated multi-file upload; only the names are used
async fn upload_receipts(
    State(state): State<AppState>,
    Json(body): Json<FilesBody>,
) -> ApiResult<UploadOutcome> {
    let user = state.authorize(&Route::MandantUpload)?;
    let mut page = MandantUploadPage::new(&user.name);

    let outcome = page.upload_files(
        body.filenames.iter().map(String::as_str),
        Local::now().naive_local(),
    );
    tracing::info!(
        added = outcome.added.len(),
        skipped = outcome.skipped.len(),
        "Files uploaded"
    );
    ok(outcome)
}
