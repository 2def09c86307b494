//! Odds dashboard API
//!
//! HTTP endpoints backing the browser dashboard: quota panel, sport picker
//! and the odds search itself. Only one search runs at a time; a second
//! request while one is in flight gets 409.

use crate::error::HunterError;
use crate::hunter::{OddsHunter, SearchOutcome, SearchRequest};
use crate::market::{BetType, MarketSelection, Period};
use crate::types::{QuotaStatus, Region, Sport};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Dashboard state shared across handlers
pub struct DashboardState {
    hunter: OddsHunter,
    api_key: Option<String>,
    regions: Vec<Region>,
    search_lock: Mutex<()>,
    /// Last quota read, shown on the dashboard
    pub last_quota: RwLock<Option<QuotaStatus>>,
}

impl DashboardState {
    pub fn new(hunter: OddsHunter, api_key: Option<String>, regions: Vec<Region>) -> Self {
        Self {
            hunter,
            api_key,
            regions,
            search_lock: Mutex::new(()),
            last_quota: RwLock::new(None),
        }
    }

    fn api_key(&self) -> Result<&str, DashboardError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(DashboardError::Hunter(HunterError::MissingApiKey))
    }
}

/// Query string for `/odds`
#[derive(Debug, Clone, Deserialize)]
pub struct OddsQuery {
    pub sport: String,
    pub bet_type: BetType,
    #[serde(default)]
    pub period: Period,
    /// Comma separated override, e.g. `uk,eu`
    pub regions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum DashboardError {
    Hunter(HunterError),
    SearchInProgress,
}

impl From<HunterError> for DashboardError {
    fn from(e: HunterError) -> Self {
        DashboardError::Hunter(e)
    }
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::SearchInProgress => StatusCode::CONFLICT,
            DashboardError::Hunter(e) => match e {
                HunterError::MissingApiKey => StatusCode::UNAUTHORIZED,
                HunterError::QuotaExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
                HunterError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
                HunterError::Http(_)
                | HunterError::Api { .. }
                | HunterError::Json(_)
                | HunterError::QuotaUnavailable(_) => StatusCode::BAD_GATEWAY,
                HunterError::Io(_) | HunterError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            DashboardError::SearchInProgress => "A search is already running".to_string(),
            DashboardError::Hunter(e) => e.user_message(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        if let DashboardError::Hunter(HunterError::Http(e)) = &self {
            tracing::error!("Odds service unreachable: {}", e);
        }
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============ HTTP API Handlers ============

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

/// Current request quota
async fn get_quota(
    State(state): State<Arc<DashboardState>>,
) -> Result<Json<QuotaStatus>, DashboardError> {
    let quota = state.hunter.quota(state.api_key()?).await?;
    *state.last_quota.write().await = Some(quota);
    Ok(Json(quota))
}

/// Sports open for betting
async fn get_sports(
    State(state): State<Arc<DashboardState>>,
) -> Result<Json<Vec<Sport>>, DashboardError> {
    let sports = state.hunter.active_sports(state.api_key()?).await?;
    Ok(Json(sports))
}

/// Run an odds search
async fn get_odds(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<OddsQuery>,
) -> Result<Json<SearchOutcome>, DashboardError> {
    let api_key = state.api_key()?;
    let _guard = state
        .search_lock
        .try_lock()
        .map_err(|_| DashboardError::SearchInProgress)?;

    let regions = match &query.regions {
        Some(list) => list
            .split(',')
            .filter(|r| !r.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Region>, _>>()?,
        None => state.regions.clone(),
    };

    let request = SearchRequest::new(
        api_key,
        query.sport,
        MarketSelection::new(query.bet_type, query.period),
    )
    .with_regions(regions);

    let outcome = state.hunter.search(&request).await?;
    Ok(Json(outcome))
}

/// Create dashboard router
pub fn create_router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/quota", get(get_quota))
        .route("/sports", get(get_sports))
        .route("/odds", get(get_odds))
        .with_state(state)
}

/// Start dashboard server
pub async fn start_dashboard(state: Arc<DashboardState>, port: u16) -> crate::error::Result<()> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Dashboard server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
