//! API client for communicating with the WiseHire REST API.
//!
//! This module provides the `ApiClient` struct. Every outbound call goes
//! through [`ApiClient::send`] or [`ApiClient::download`], which attach the
//! bearer credential and classify failures uniformly.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::models::{
    Activatable, Activity, ActivityType, Education, GenerateReportResponse, HrCompany, ListQuery,
    LoginResponse, Page, Principal, Report, ReportKind, Status, ToggleActiveResponse,
    WorkExperience,
};

use super::endpoints::{
    self, Resource, ACTIVITIES, ACTIVITY_TYPES, EDUCATIONS, HR_COMPANIES, REPORTS, STATUSES,
    WORK_EXPERIENCES,
};
use super::{ApiError, ApiRequest, Download};

// ============================================================================
// Constants
// ============================================================================

/// Backend origin used when configuration does not name one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Result of a create or update call.
///
/// Most endpoints echo the affected entity, which lets a list patch itself
/// in place. Some (candidate flows, activities) answer with the submitted
/// fields only; those come back as `Accepted` and the list must refetch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T> {
    Entity(T),
    Accepted(Value),
}

impl<T> WriteOutcome<T> {
    pub fn entity(self) -> Option<T> {
        match self {
            WriteOutcome::Entity(entity) => Some(entity),
            WriteOutcome::Accepted(_) => None,
        }
    }
}

/// API client for the WiseHire backend.
/// Clone is cheap - reqwest::Client and the credential slot are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl ApiClient {
    /// Create a client for `base_url` holding `credentials`.
    ///
    /// No request timeout is configured; the transport defaults apply.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid base URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            credentials: Arc::new(credentials),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.is_present()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid path {}: {}", path, e)))
    }

    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.credentials.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidRequest("Credential is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn origin(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Send `request` and return the response if its status is 2xx.
    async fn dispatch(&self, request: ApiRequest, accept_json: bool) -> Result<Response, ApiError> {
        let url = self.url(&request.path)?;
        debug!(method = %request.method, path = %request.path, "Sending request");

        let mut builder = self.client.request(request.method.clone(), url);
        if accept_json {
            builder = builder.header(header::ACCEPT, JSON_CONTENT_TYPE);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        builder = builder.headers(request.headers).headers(self.auth_headers()?);

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        self.check_response(response).await
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_builder() {
            return ApiError::InvalidRequest(error.to_string());
        }
        warn!(error = %error, "Backend not reachable");
        ApiError::BackendUnavailable {
            base_url: self.origin(),
            source: error,
        }
    }

    /// Classify a non-2xx response. A 401 logs the user out before failing.
    async fn check_response(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            warn!(url = %response.url().path(), "Unauthorized, clearing credential");
            self.logout();
            return Err(ApiError::AuthenticationFailed);
        }

        let is_json = is_json(response.headers());
        let body = if is_json {
            match response.bytes().await {
                Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
                Err(e) => {
                    debug!(error = %e, "Failed to read error body");
                    None
                }
            }
        } else {
            None
        };
        debug!(status = status.as_u16(), structured = body.is_some(), "Request failed");
        Err(ApiError::from_status(status.as_u16(), body))
    }

    /// Send a request and return its JSON payload.
    ///
    /// A successful response without a JSON content type yields an empty
    /// object.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let path = request.path.clone();
        let response = self.dispatch(request, true).await?;
        if !is_json(response.headers()) {
            return Ok(Value::Object(Map::new()));
        }
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e)))
    }

    /// Send a request and decode its JSON payload into `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let value = self.send(request).await?;
        decode(&path, value)
    }

    /// Fetch a binary body. Credential handling and failure classification
    /// match [`ApiClient::send`]; the body is returned untouched.
    pub async fn download(&self, path: &str) -> Result<Download, ApiError> {
        let response = self.dispatch(ApiRequest::get(path), false).await?;
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(path, bytes = body.len(), "Download complete");
        Ok(Download {
            headers,
            body: body.to_vec(),
        })
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange email and password for an access token and hold it.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(endpoints::LOGIN_PATH)
            .json(&json!({ "email": email, "password": password }))?;
        let response: LoginResponse = self.send_json(request).await?;
        self.credentials.set(response.access.clone());
        debug!("Login succeeded, credential stored");
        Ok(response)
    }

    /// Forget the credential locally. No request is made.
    pub fn logout(&self) {
        self.credentials.clear();
    }

    pub async fn profile(&self) -> Result<Principal, ApiError> {
        self.send_json(ApiRequest::get(endpoints::PROFILE_PATH)).await
    }

    // ========================================================================
    // Generic resource operations
    // ========================================================================

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &Resource<T>,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        self.send_json(ApiRequest::get(resource.path()).query_pairs(query.to_pairs()))
            .await
    }

    pub async fn retrieve<T: DeserializeOwned>(&self, resource: &Resource<T>, id: i64) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(resource.detail_path(id))).await
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &Resource<T>,
        body: &B,
    ) -> Result<WriteOutcome<T>, ApiError> {
        let value = self.send(ApiRequest::post(resource.path()).json(body)?).await?;
        Ok(write_outcome(value))
    }

    /// Replace the full resource (PUT).
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &Resource<T>,
        id: i64,
        body: &B,
    ) -> Result<WriteOutcome<T>, ApiError> {
        let value = self.send(ApiRequest::put(resource.detail_path(id)).json(body)?).await?;
        Ok(write_outcome(value))
    }

    pub async fn destroy<T>(&self, resource: &Resource<T>, id: i64) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(resource.detail_path(id))).await?;
        Ok(())
    }

    /// Flip `is_active` through a full-resource PUT.
    pub async fn toggle_active<T>(&self, resource: &Resource<T>, entity: &T) -> Result<WriteOutcome<T>, ApiError>
    where
        T: Activatable + Serialize + DeserializeOwned,
    {
        self.update(resource, entity.id(), &entity.toggled()).await
    }

    // ===== Entity-specific operations =====

    pub async fn candidate_educations(&self, candidate_id: i64) -> Result<Page<Education>, ApiError> {
        self.list(&EDUCATIONS, &ListQuery::new().filter("candidate", candidate_id))
            .await
    }

    pub async fn candidate_work_experiences(&self, candidate_id: i64) -> Result<Page<WorkExperience>, ApiError> {
        self.list(&WORK_EXPERIENCES, &ListQuery::new().filter("candidate", candidate_id))
            .await
    }

    pub async fn flow_activities(&self, flow_id: i64) -> Result<Page<Activity>, ApiError> {
        self.list(&ACTIVITIES, &ListQuery::new().filter("candidate_flow", flow_id))
            .await
    }

    pub async fn activity_types(&self) -> Result<Page<ActivityType>, ApiError> {
        self.list(&ACTIVITY_TYPES, &ListQuery::new()).await
    }

    pub async fn statuses(&self, activity_type: Option<i64>) -> Result<Page<Status>, ApiError> {
        self.list(&STATUSES, &ListQuery::new().filter_opt("activity_type", activity_type))
            .await
    }

    /// Flip an HR company through its dedicated `toggle_active` action.
    pub async fn toggle_hr_company_active(&self, company: &HrCompany) -> Result<HrCompany, ApiError> {
        let request = ApiRequest::post(HR_COMPANIES.action_path(company.id, "toggle_active"))
            .json(&company.toggled())?;
        let response: ToggleActiveResponse<HrCompany> = self.send_json(request).await?;
        if let Some(ref message) = response.message {
            debug!(company = company.id, message = %message, "HR company toggled");
        }
        Ok(response.data)
    }

    /// Queue generation of a weekly or monthly activity report ending `today`.
    pub async fn generate_report(
        &self,
        kind: ReportKind,
        today: NaiveDate,
    ) -> Result<GenerateReportResponse, ApiError> {
        let path = match kind {
            ReportKind::Weekly => endpoints::GENERATE_WEEKLY_REPORT_PATH,
            ReportKind::Monthly => endpoints::GENERATE_MONTHLY_REPORT_PATH,
        };
        self.send_json(ApiRequest::post(path).json(&kind.request(today))?)
            .await
    }

    pub async fn download_report(&self, report: &Report) -> Result<Download, ApiError> {
        self.download(&REPORTS.action_path(report.id, "download")).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains(JSON_CONTENT_TYPE))
        .unwrap_or(false)
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response shape from {}: {}", path, e)))
}

fn write_outcome<T: DeserializeOwned>(value: Value) -> WriteOutcome<T> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(entity) => WriteOutcome::Entity(entity),
        Err(_) => WriteOutcome::Accepted(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use crate::models::HrCompany;

    fn client(base: &str) -> Result<ApiClient, ApiError> {
        ApiClient::new(base, Credentials::new(Box::new(MemoryStore::new())))
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(client("not a url"), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_url_joins_against_origin() {
        let api = client("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            api.url("/api/reports/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/reports/"
        );
        assert_eq!(api.origin(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_auth_headers_follow_credential() {
        let api = client(DEFAULT_BASE_URL).unwrap();
        assert!(api.auth_headers().unwrap().get(header::AUTHORIZATION).is_none());

        api.credentials().set("abc".to_string());
        assert_eq!(
            api.auth_headers().unwrap().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_write_outcome_falls_back_to_accepted() {
        let entity: WriteOutcome<HrCompany> =
            write_outcome(json!({"id": 1, "name": "Acme", "code": "AC", "is_active": false}));
        assert!(matches!(entity, WriteOutcome::Entity(ref c) if !c.is_active));

        let accepted: WriteOutcome<HrCompany> = write_outcome(json!({"name": "Acme"}));
        assert_eq!(accepted, WriteOutcome::Accepted(json!({"name": "Acme"})));
        assert!(accepted.entity().is_none());
    }

    #[test]
    fn test_is_json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(!is_json(&headers));
    }
}
