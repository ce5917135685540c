//! Application state management for the WiseHire console.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, entity lists, the session, and background task coordination.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use wisehire_core::api::endpoints::{
    ACTIVITIES, CANDIDATES, CANDIDATE_FLOWS, CUSTOMER_COMPANIES, HR_COMPANIES, HR_USERS,
    JOB_POSTINGS, REPORTS,
};
use wisehire_core::api::{ApiClient, ApiError, WriteOutcome};
use wisehire_core::auth::{Credentials, SessionState, SessionStore};
use wisehire_core::models::{
    Activity, Candidate, CandidateFlow, CustomerCompany, Education, FlowFilters, FlowStatus,
    HrCompany, HrUser, JobPosting, ListQuery, Page, Report, ReportKind,
    WorkExperience,
};
use wisehire_core::{Config, Decision, EntityList, Route};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs, bound to the number keys 1-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Candidates,
    JobPostings,
    CandidateFlows,
    CustomerCompanies,
    HrCompanies,
    HrUsers,
    Reports,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Dashboard,
        Tab::Candidates,
        Tab::JobPostings,
        Tab::CandidateFlows,
        Tab::CustomerCompanies,
        Tab::HrCompanies,
        Tab::HrUsers,
        Tab::Reports,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Candidates => "Candidates",
            Tab::JobPostings => "Jobs",
            Tab::CandidateFlows => "Flows",
            Tab::CustomerCompanies => "Customers",
            Tab::HrCompanies => "HR Companies",
            Tab::HrUsers => "HR Users",
            Tab::Reports => "Reports",
        }
    }

    /// The list route this tab shows.
    pub fn route(&self) -> Route {
        match self {
            Tab::Dashboard => Route::Dashboard,
            Tab::Candidates => Route::Candidates,
            Tab::JobPostings => Route::JobPostings,
            Tab::CandidateFlows => Route::CandidateFlows,
            Tab::CustomerCompanies => Route::CustomerCompanies,
            Tab::HrCompanies => Route::HrCompanies,
            Tab::HrUsers => Route::HrUsers,
            Tab::Reports => Route::Reports,
        }
    }

    /// The tab highlighted while `route` is shown. Drill-down routes
    /// belong to the tab they were opened from.
    pub fn for_route(route: Route) -> Tab {
        match route {
            Route::Login | Route::Dashboard => Tab::Dashboard,
            Route::Candidates | Route::CandidateDetail(_) => Tab::Candidates,
            Route::JobPostings => Tab::JobPostings,
            Route::CandidateFlows | Route::Activities { .. } => Tab::CandidateFlows,
            Route::CustomerCompanies => Tab::CustomerCompanies,
            Route::HrCompanies => Tab::HrCompanies,
            Route::HrUsers => Tab::HrUsers,
            Route::Reports => Tab::Reports,
        }
    }

    pub fn from_key(c: char) -> Option<Tab> {
        let index = c.to_digit(10)? as usize;
        index.checked_sub(1).and_then(|i| Tab::ALL.get(i)).copied()
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ShowingErrors,
    LoggingIn,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// A candidate together with the detail lists shown on its page.
#[derive(Debug, Clone)]
pub struct CandidateDetail {
    pub candidate: Candidate,
    pub educations: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
}

/// An entity awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub route: Route,
    pub id: i64,
    pub label: String,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Write results, one variant per entity kind with an `is_active` toggle.
enum Written {
    CustomerCompany(WriteOutcome<CustomerCompany>),
    HrCompany(HrCompany),
    HrUser(WriteOutcome<HrUser>),
}

/// Results sent back from background tasks through the MPSC channel.
enum FetchResult {
    /// Outcome of restoring the persisted session at startup
    SessionResolved(Result<(), ApiError>),
    Candidates(u32, Page<Candidate>),
    CandidateDetail(CandidateDetail),
    JobPostings(u32, Page<JobPosting>),
    CandidateFlows(u32, Page<CandidateFlow>),
    Activities { flow_id: i64, page: Page<Activity> },
    CustomerCompanies(u32, Page<CustomerCompany>),
    HrCompanies(u32, Page<HrCompany>),
    HrUsers(u32, Page<HrUser>),
    Reports(u32, Page<Report>),
    Written(Written),
    Deleted(Route, i64),
    ReportQueued(ReportKind, Option<String>),
    Downloaded(PathBuf),
    SaveFailed(String),
    /// A request failed; `route` is set for list fetches
    Failed {
        route: Option<Route>,
        action: String,
        error: ApiError,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,
    session_rx: watch::Receiver<SessionState>,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub current_tab: Tab,
    pub selection: usize,
    pub flow_status_filter: Option<FlowStatus>,
    pub pending_delete: Option<PendingDelete>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Vec<String>,

    // Entity lists
    pub candidates: EntityList<Candidate>,
    pub job_postings: EntityList<JobPosting>,
    pub candidate_flows: EntityList<CandidateFlow>,
    pub activities: EntityList<Activity>,
    pub activities_flow: Option<i64>,
    pub customer_companies: EntityList<CustomerCompany>,
    pub hr_companies: EntityList<HrCompany>,
    pub hr_users: EntityList<HrUser>,
    pub reports: EntityList<Report>,
    pub candidate_detail: Option<CandidateDetail>,

    // Background task channel, results tagged with the session generation
    fetch_rx: mpsc::Receiver<(u64, FetchResult)>,
    fetch_tx: mpsc::Sender<(u64, FetchResult)>,
    loading: HashSet<Route>,
    generation: u64,

    // Status and error presentation
    pub status_message: Option<String>,
    pub last_errors: Vec<String>,

    pub download_dir: PathBuf,
}

impl App {
    /// Create the application for the backend at `base_url`, restoring the
    /// persisted credential from the configured store.
    pub fn new(config: Config, base_url: &str) -> Result<Self> {
        let credentials = Credentials::restore(config.credential_store()?);
        let api = ApiClient::new(base_url, credentials)?;
        debug!(base_url, "API client configured");
        Ok(Self::with_session(config, SessionStore::new(api)))
    }

    pub fn with_session(config: Config, session: SessionStore) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let session_rx = session.subscribe();

        // Get credentials from env vars or config
        let login_email = std::env::var("WISEHIRE_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("WISEHIRE_PASSWORD").unwrap_or_default();

        let download_dir = dirs::download_dir()
            .or_else(|| config.cache_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            config,
            session,
            session_rx,

            state: AppState::Normal,
            route: Route::Dashboard,
            current_tab: Tab::Dashboard,
            selection: 0,
            flow_status_filter: None,
            pending_delete: None,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: Vec::new(),

            candidates: EntityList::new(),
            job_postings: EntityList::new(),
            candidate_flows: EntityList::new(),
            activities: EntityList::new(),
            activities_flow: None,
            customer_companies: EntityList::new(),
            hr_companies: EntityList::new(),
            hr_users: EntityList::new(),
            reports: EntityList::new(),
            candidate_detail: None,

            fetch_rx: rx,
            fetch_tx: tx,
            loading: HashSet::new(),
            generation: 0,

            status_message: None,
            last_errors: Vec::new(),

            download_dir,
        }
    }

    fn api(&self) -> ApiClient {
        self.session.api().clone()
    }

    // =========================================================================
    // Session and authentication
    // =========================================================================

    /// Resolve the persisted session in the background. Screens show a
    /// placeholder until it settles.
    pub fn start(&mut self) {
        let session = self.session.clone();
        let tx = self.fetch_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = session.resolve().await.map(|_| ());
            Self::send_result(&tx, generation, FetchResult::SessionResolved(result)).await;
        });
        self.status_message = Some("Restoring session...".to_string());
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Guard decision for the current route.
    pub fn decision(&self) -> Decision {
        self.route
            .guard()
            .map(|guard| guard.check(&self.session.state()))
            .unwrap_or(Decision::Allow)
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error.clear();
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.trim().to_string();
        if email.is_empty() || self.login_password.is_empty() {
            self.login_error = vec!["Email and password are required".to_string()];
            return Err(anyhow::anyhow!("Email and password are required"));
        }

        self.login_error.clear();

        match self.session.login(&email, &self.login_password).await {
            Ok(principal) => {
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.login_password.clear();
                self.state = AppState::Normal;
                self.status_message = Some(format!("Logged in as {}", principal.display_name()));
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = e.alerts();
                Err(e.into())
            }
        }
    }

    /// Log out locally. The session change sends the user to the login form.
    pub fn logout(&mut self) {
        self.session.logout();
        self.status_message = Some("Logged out".to_string());
    }

    fn on_session_changed(&mut self, state: SessionState) {
        debug!(?state, "Session changed");
        if matches!(state, SessionState::Anonymous) {
            self.clear_data();
        }
        if !state.is_loading() {
            self.navigate(self.route);
        }
    }

    /// Drop everything fetched for the previous user. Requests still in
    /// flight belong to the old generation and are discarded on arrival.
    fn clear_data(&mut self) {
        self.generation += 1;
        self.loading.clear();
        self.candidates = EntityList::new();
        self.job_postings = EntityList::new();
        self.candidate_flows = EntityList::new();
        self.activities = EntityList::new();
        self.activities_flow = None;
        self.customer_companies = EntityList::new();
        self.hr_companies = EntityList::new();
        self.hr_users = EntityList::new();
        self.reports = EntityList::new();
        self.candidate_detail = None;
        self.selection = 0;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show `route`, applying its guard.
    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            self.selection = 0;
        }
        self.route = route;
        self.current_tab = Tab::for_route(route);

        match self.decision() {
            Decision::Allow => self.ensure_loaded(),
            Decision::RedirectToLogin => {
                if self.state != AppState::LoggingIn {
                    self.start_login();
                }
            }
            Decision::Pending | Decision::Deny(_) => {}
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.navigate(tab.route());
    }

    /// Drill into the selected row: a candidate's detail page or a flow's
    /// activities.
    pub fn open_selected(&mut self) {
        let target = match self.route {
            Route::Candidates => self.selected_id().map(Route::CandidateDetail),
            Route::CandidateFlows => self.selected_id().map(|flow_id| Route::Activities { flow_id }),
            _ => None,
        };
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    /// Leave a drill-down page. Returns false when already at a top level.
    pub fn go_back(&mut self) -> bool {
        match self.route {
            Route::CandidateDetail(_) => {
                self.navigate(Route::Candidates);
                true
            }
            Route::Activities { .. } => {
                self.navigate(Route::CandidateFlows);
                true
            }
            _ => false,
        }
    }

    fn ensure_loaded(&mut self) {
        let needed = match self.route {
            Route::Login | Route::Dashboard => false,
            Route::Candidates => self.candidates.needs_refetch(),
            Route::CandidateDetail(id) => self
                .candidate_detail
                .as_ref()
                .map(|d| d.candidate.id != id)
                .unwrap_or(true),
            Route::JobPostings => self.job_postings.needs_refetch(),
            Route::CandidateFlows => self.candidate_flows.needs_refetch(),
            Route::Activities { flow_id } => {
                self.activities_flow != Some(flow_id) || self.activities.needs_refetch()
            }
            Route::CustomerCompanies => self.customer_companies.needs_refetch(),
            Route::HrCompanies => self.hr_companies.needs_refetch(),
            Route::HrUsers => self.hr_users.needs_refetch(),
            Route::Reports => self.reports.needs_refetch(),
        };
        if needed {
            let page = self.current_page();
            self.fetch(self.route, page);
        }
    }

    /// Refetch the current screen.
    pub fn refresh(&mut self) {
        if self.decision() == Decision::Allow {
            let page = self.current_page();
            self.fetch(self.route, page);
        }
    }

    pub fn next_page(&mut self) {
        if self.current_has_next() {
            let page = self.current_page() + 1;
            self.fetch(self.route, page);
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_has_previous() {
            let page = self.current_page().saturating_sub(1).max(1);
            self.fetch(self.route, page);
        }
    }

    /// Step the candidate flow status filter and reload from page 1.
    pub fn cycle_flow_filter(&mut self) {
        self.flow_status_filter = next_flow_filter(self.flow_status_filter);
        self.candidate_flows.invalidate();
        self.selection = 0;
        if self.route == Route::CandidateFlows && self.decision() == Decision::Allow {
            self.fetch(Route::CandidateFlows, 1);
        }
    }

    pub fn flow_filters(&self) -> FlowFilters {
        FlowFilters {
            flow_status: self.flow_status_filter,
            ..Default::default()
        }
    }

    // =========================================================================
    // Selection helpers
    // =========================================================================

    /// Number of rows on the current screen.
    pub fn current_len(&self) -> usize {
        match self.route {
            Route::Candidates => self.candidates.len(),
            Route::JobPostings => self.job_postings.len(),
            Route::CandidateFlows => self.candidate_flows.len(),
            Route::Activities { .. } => self.activities.len(),
            Route::CustomerCompanies => self.customer_companies.len(),
            Route::HrCompanies => self.hr_companies.len(),
            Route::HrUsers => self.hr_users.len(),
            Route::Reports => self.reports.len(),
            Route::CandidateDetail(_) => self
                .candidate_detail
                .as_ref()
                .map(|d| d.educations.len() + d.work_experiences.len())
                .unwrap_or(0),
            Route::Login | Route::Dashboard => 0,
        }
    }

    fn current_page(&self) -> u32 {
        match self.route {
            Route::Candidates => self.candidates.page(),
            Route::JobPostings => self.job_postings.page(),
            Route::CandidateFlows => self.candidate_flows.page(),
            Route::CustomerCompanies => self.customer_companies.page(),
            Route::HrCompanies => self.hr_companies.page(),
            Route::HrUsers => self.hr_users.page(),
            Route::Reports => self.reports.page(),
            _ => 1,
        }
    }

    fn current_has_next(&self) -> bool {
        match self.route {
            Route::Candidates => self.candidates.has_next(),
            Route::JobPostings => self.job_postings.has_next(),
            Route::CandidateFlows => self.candidate_flows.has_next(),
            Route::CustomerCompanies => self.customer_companies.has_next(),
            Route::HrCompanies => self.hr_companies.has_next(),
            Route::HrUsers => self.hr_users.has_next(),
            Route::Reports => self.reports.has_next(),
            _ => false,
        }
    }

    fn current_has_previous(&self) -> bool {
        match self.route {
            Route::Candidates => self.candidates.has_previous(),
            Route::JobPostings => self.job_postings.has_previous(),
            Route::CandidateFlows => self.candidate_flows.has_previous(),
            Route::CustomerCompanies => self.customer_companies.has_previous(),
            Route::HrCompanies => self.hr_companies.has_previous(),
            Route::HrUsers => self.hr_users.has_previous(),
            Route::Reports => self.reports.has_previous(),
            _ => false,
        }
    }

    /// Id and display label of the selected row.
    pub fn selected_entry(&self) -> Option<(i64, String)> {
        let index = self.selection;
        match self.route {
            Route::Candidates => self.candidates.items().get(index).map(|c| (c.id, c.display_name())),
            Route::JobPostings => self
                .job_postings
                .items()
                .get(index)
                .map(|j| (j.id, format!("{} ({})", j.title, j.code))),
            Route::CandidateFlows => self
                .candidate_flows
                .items()
                .get(index)
                .map(|f| (f.id, format!("{} / {}", f.candidate_label(), f.job_label()))),
            Route::Activities { .. } => self
                .activities
                .items()
                .get(index)
                .map(|a| (a.id, format!("{} - {}", a.type_name(), a.status_name()))),
            Route::CustomerCompanies => self
                .customer_companies
                .items()
                .get(index)
                .map(|c| (c.id, c.name.clone())),
            Route::HrCompanies => self.hr_companies.items().get(index).map(|c| (c.id, c.name.clone())),
            Route::HrUsers => self.hr_users.items().get(index).map(|u| (u.id, u.username.clone())),
            Route::Reports => self
                .reports
                .items()
                .get(index)
                .map(|r| (r.id, format!("{} #{}", r.report_type.label(), r.id))),
            Route::Login | Route::Dashboard | Route::CandidateDetail(_) => None,
        }
    }

    fn selected_id(&self) -> Option<i64> {
        self.selected_entry().map(|(id, _)| id)
    }

    pub fn select_next(&mut self, step: usize) {
        let len = self.current_len();
        if len > 0 {
            self.selection = (self.selection + step).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    fn clamp_selection(&mut self) {
        let len = self.current_len();
        if self.selection >= len {
            self.selection = len.saturating_sub(1);
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Ask for confirmation before deleting the selected row.
    pub fn request_delete(&mut self) {
        if let Some((id, label)) = self.selected_entry() {
            self.pending_delete = Some(PendingDelete {
                route: self.route,
                id,
                label,
            });
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let api = self.api();
        let PendingDelete { route, id, .. } = pending;
        self.spawn_task(format!("Deleting {}", pending.label), None, async move {
            match route {
                Route::Candidates => api.destroy(&CANDIDATES, id).await?,
                Route::JobPostings => api.destroy(&JOB_POSTINGS, id).await?,
                Route::CandidateFlows => api.destroy(&CANDIDATE_FLOWS, id).await?,
                Route::Activities { .. } => api.destroy(&ACTIVITIES, id).await?,
                Route::CustomerCompanies => api.destroy(&CUSTOMER_COMPANIES, id).await?,
                Route::HrCompanies => api.destroy(&HR_COMPANIES, id).await?,
                Route::HrUsers => api.destroy(&HR_USERS, id).await?,
                Route::Reports => api.destroy(&REPORTS, id).await?,
                Route::Login | Route::Dashboard | Route::CandidateDetail(_) => {}
            }
            Ok(FetchResult::Deleted(route, id))
        });
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    /// Screens whose rows the backend lets us activate and deactivate.
    pub fn can_toggle(&self) -> bool {
        matches!(self.route, Route::CustomerCompanies | Route::HrCompanies | Route::HrUsers)
    }

    /// Flip `is_active` on the selected row.
    pub fn toggle_selected(&mut self) {
        if !self.can_toggle() {
            self.status_message = Some(format!("{} cannot be toggled", self.route.title()));
            return;
        }
        let api = self.api();
        let index = self.selection;
        match self.route {
            Route::CustomerCompanies => {
                if let Some(entity) = self.customer_companies.items().get(index).cloned() {
                    self.spawn_task("Updating customer company", None, async move {
                        let outcome = api.toggle_active(&CUSTOMER_COMPANIES, &entity).await?;
                        Ok(FetchResult::Written(Written::CustomerCompany(outcome)))
                    });
                }
            }
            Route::HrCompanies => {
                if let Some(entity) = self.hr_companies.items().get(index).cloned() {
                    self.spawn_task("Updating HR company", None, async move {
                        let company = api.toggle_hr_company_active(&entity).await?;
                        Ok(FetchResult::Written(Written::HrCompany(company)))
                    });
                }
            }
            Route::HrUsers => {
                if let Some(entity) = self.hr_users.items().get(index).cloned() {
                    self.spawn_task("Updating HR user", None, async move {
                        let outcome = api.toggle_active(&HR_USERS, &entity).await?;
                        Ok(FetchResult::Written(Written::HrUser(outcome)))
                    });
                }
            }
            _ => {}
        }
    }

    pub fn generate_report(&mut self, kind: ReportKind) {
        if self.route != Route::Reports || self.decision() != Decision::Allow {
            return;
        }
        let api = self.api();
        let today = Local::now().date_naive();
        self.spawn_task(format!("Generating {}", kind.label()), None, async move {
            let response = api.generate_report(kind, today).await?;
            Ok(FetchResult::ReportQueued(kind, response.message))
        });
        self.status_message = Some(format!("Requesting {}...", kind.label()));
    }

    pub fn download_selected_report(&mut self) {
        if self.route != Route::Reports {
            return;
        }
        let Some(report) = self.reports.items().get(self.selection).cloned() else {
            return;
        };
        if !report.is_downloadable() {
            self.status_message = Some("Report is not ready for download".to_string());
            return;
        }

        let api = self.api();
        let dir = self.download_dir.clone();
        self.spawn_task("Downloading report", None, async move {
            let download = api.download_report(&report).await?;
            Ok(match download.save_to(&dir, &report.fallback_filename()) {
                Ok(path) => FetchResult::Downloaded(path),
                Err(e) => FetchResult::SaveFailed(e.to_string()),
            })
        });
        self.status_message = Some("Downloading report...".to_string());
    }

    pub fn show_errors(&mut self) {
        if !self.last_errors.is_empty() {
            self.state = AppState::ShowingErrors;
        }
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<(u64, FetchResult)>, generation: u64, result: FetchResult) {
        if let Err(e) = tx.send((generation, result)).await {
            warn!(error = %e, "Failed to send background result");
        }
    }

    /// Run `task` off the event loop, reporting its result through the channel.
    fn spawn_task<F>(&self, action: impl Into<String>, route: Option<Route>, task: F)
    where
        F: Future<Output = Result<FetchResult, ApiError>> + Send + 'static,
    {
        let tx = self.fetch_tx.clone();
        let generation = self.generation;
        let action = action.into();
        tokio::spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(error) => FetchResult::Failed { route, action, error },
            };
            Self::send_result(&tx, generation, result).await;
        });
    }

    fn fetch(&mut self, route: Route, page: u32) {
        if !self.loading.insert(route) {
            debug!(?route, "Fetch already in flight");
            return;
        }

        let api = self.api();
        let query = ListQuery::new().page(page);
        let action = format!("Loading {}", route.title());
        self.status_message = Some(format!("{}...", action));

        match route {
            Route::Candidates => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::Candidates(page, api.list(&CANDIDATES, &query).await?))
            }),
            Route::CandidateDetail(id) => self.spawn_task(action, Some(route), async move {
                let (candidate, educations, work_experiences) = futures::try_join!(
                    api.retrieve(&CANDIDATES, id),
                    api.candidate_educations(id),
                    api.candidate_work_experiences(id),
                )?;
                Ok(FetchResult::CandidateDetail(CandidateDetail {
                    candidate,
                    educations: educations.results,
                    work_experiences: work_experiences.results,
                }))
            }),
            Route::JobPostings => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::JobPostings(page, api.list(&JOB_POSTINGS, &query).await?))
            }),
            Route::CandidateFlows => {
                let query = self.flow_filters().to_query(page);
                self.spawn_task(action, Some(route), async move {
                    Ok(FetchResult::CandidateFlows(page, api.list(&CANDIDATE_FLOWS, &query).await?))
                })
            }
            Route::Activities { flow_id } => self.spawn_task(action, Some(route), async move {
                let page = api.flow_activities(flow_id).await?;
                Ok(FetchResult::Activities { flow_id, page })
            }),
            Route::CustomerCompanies => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::CustomerCompanies(page, api.list(&CUSTOMER_COMPANIES, &query).await?))
            }),
            Route::HrCompanies => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::HrCompanies(page, api.list(&HR_COMPANIES, &query).await?))
            }),
            Route::HrUsers => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::HrUsers(page, api.list(&HR_USERS, &query).await?))
            }),
            Route::Reports => self.spawn_task(action, Some(route), async move {
                Ok(FetchResult::Reports(page, api.list(&REPORTS, &query).await?))
            }),
            Route::Login | Route::Dashboard => {
                self.loading.remove(&route);
                self.status_message = None;
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.contains(&self.route)
    }

    /// Check for completed background tasks and session changes.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for (generation, result) in results {
            if generation == self.generation {
                self.process_result(result);
            } else {
                self.process_stale_result(result);
            }
        }

        if self.session_rx.has_changed().unwrap_or(false) {
            let state = self.session_rx.borrow_and_update().clone();
            self.on_session_changed(state);
        }
    }

    fn finish_fetch(&mut self, route: Route) {
        self.loading.remove(&route);
        if route == self.route {
            self.status_message = None;
            self.clamp_selection();
        }
    }

    fn process_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::SessionResolved(Ok(())) => {
                self.status_message = self
                    .session
                    .principal()
                    .map(|p| format!("Welcome back, {}", p.display_name()));
            }
            FetchResult::SessionResolved(Err(error)) => {
                self.report_error("Restoring session", error);
            }
            FetchResult::Candidates(page, data) => {
                self.candidates.replace(page, data);
                self.finish_fetch(Route::Candidates);
            }
            FetchResult::CandidateDetail(detail) => {
                let route = Route::CandidateDetail(detail.candidate.id);
                self.candidate_detail = Some(detail);
                self.finish_fetch(route);
            }
            FetchResult::JobPostings(page, data) => {
                self.job_postings.replace(page, data);
                self.finish_fetch(Route::JobPostings);
            }
            FetchResult::CandidateFlows(page, data) => {
                self.candidate_flows.replace(page, data);
                self.finish_fetch(Route::CandidateFlows);
            }
            FetchResult::Activities { flow_id, page } => {
                self.activities.replace(1, page);
                self.activities_flow = Some(flow_id);
                self.finish_fetch(Route::Activities { flow_id });
            }
            FetchResult::CustomerCompanies(page, data) => {
                self.customer_companies.replace(page, data);
                self.finish_fetch(Route::CustomerCompanies);
            }
            FetchResult::HrCompanies(page, data) => {
                self.hr_companies.replace(page, data);
                self.finish_fetch(Route::HrCompanies);
            }
            FetchResult::HrUsers(page, data) => {
                self.hr_users.replace(page, data);
                self.finish_fetch(Route::HrUsers);
            }
            FetchResult::Reports(page, data) => {
                self.reports.replace(page, data);
                self.finish_fetch(Route::Reports);
            }
            FetchResult::Written(written) => {
                let patched = match written {
                    Written::CustomerCompany(outcome) => self.customer_companies.apply(outcome),
                    Written::HrCompany(company) => {
                        self.hr_companies.upsert(company);
                        true
                    }
                    Written::HrUser(outcome) => self.hr_users.apply(outcome),
                };
                self.status_message = Some("Saved".to_string());
                if !patched {
                    self.refresh();
                }
            }
            FetchResult::Deleted(route, id) => {
                let removed = match route {
                    Route::Candidates => self.candidates.remove(id),
                    Route::JobPostings => self.job_postings.remove(id),
                    Route::CandidateFlows => self.candidate_flows.remove(id),
                    Route::Activities { .. } => self.activities.remove(id),
                    Route::CustomerCompanies => self.customer_companies.remove(id),
                    Route::HrCompanies => self.hr_companies.remove(id),
                    Route::HrUsers => self.hr_users.remove(id),
                    Route::Reports => self.reports.remove(id),
                    Route::Login | Route::Dashboard | Route::CandidateDetail(_) => false,
                };
                debug!(?route, id, removed, "Entity deleted");
                self.clamp_selection();
                self.status_message = Some("Deleted".to_string());
            }
            FetchResult::ReportQueued(kind, message) => {
                info!(kind = kind.as_param(), "Report generation queued");
                self.status_message =
                    Some(message.unwrap_or_else(|| format!("{} requested", kind.label())));
                self.reports.invalidate();
                if self.route == Route::Reports {
                    self.refresh();
                }
            }
            FetchResult::Downloaded(path) => {
                info!(path = %path.display(), "Report saved");
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            FetchResult::SaveFailed(message) => {
                error!(error = %message, "Failed to save report");
                self.last_errors = vec![format!("Failed to save report: {}", message)];
                self.status_message = Some("Failed to save report".to_string());
            }
            FetchResult::Failed { route, action, error } => {
                if let Some(route) = route {
                    self.loading.remove(&route);
                }
                self.report_error(&action, error);
            }
        }
    }

    /// A result from before the last logout. Only session outcomes and
    /// failures still matter; data belongs to the previous user.
    fn process_stale_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::SessionResolved(_) => self.process_result(result),
            FetchResult::Failed { action, error, .. } => self.report_error(&action, error),
            _ => debug!("Dropping result from a previous session"),
        }
    }

    /// Surface a failed request in the status bar and the error overlay.
    fn report_error(&mut self, action: &str, error: ApiError) {
        error!(action, error = %error, "Request failed");
        if error.is_authentication_failure() {
            self.last_errors.clear();
            self.status_message = Some("Session expired. Please log in again.".to_string());
            return;
        }
        self.last_errors = error.alerts();
        let summary = self.last_errors.first().cloned().unwrap_or_default();
        let more = if self.last_errors.len() > 1 { " [e] more" } else { "" };
        self.status_message = Some(format!("{} failed: {}{}", action, summary, more));
    }
}

/// Next value of the flow status filter: all, then each status in turn.
pub fn next_flow_filter(current: Option<FlowStatus>) -> Option<FlowStatus> {
    match current {
        None => Some(FlowStatus::ALL[0]),
        Some(status) => {
            let index = FlowStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
            FlowStatus::ALL.get(index + 1).copied()
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
