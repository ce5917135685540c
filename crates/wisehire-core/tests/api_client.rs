use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wisehire_core::api::endpoints::{CANDIDATE_FLOWS, CUSTOMER_COMPANIES, JOB_POSTINGS};
use wisehire_core::api::{ApiClient, ApiError, ApiRequest, WriteOutcome};
use wisehire_core::auth::{Credentials, MemoryStore};
use wisehire_core::models::{HrCompany, ListQuery, ReportKind};

fn anonymous_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Credentials::new(Box::new(MemoryStore::new()))).unwrap()
}

fn client_with_token(server: &MockServer, token: &str) -> ApiClient {
    ApiClient::new(
        &server.uri(),
        Credentials::restore(Box::new(MemoryStore::with_token(token))),
    )
    .unwrap()
}

#[tokio::test]
async fn bearer_header_attached_only_while_credential_held() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/candidates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .mount(&server)
        .await;

    let api = anonymous_client(&server);
    api.send(ApiRequest::get("/api/candidates/candidates/")).await.unwrap();

    api.credentials().set("tok-1".to_string());
    api.send(ApiRequest::get("/api/candidates/candidates/")).await.unwrap();

    api.logout();
    api.send(ApiRequest::get("/api/candidates/candidates/")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[1].headers.get("authorization").unwrap(), "Bearer tok-1");
    assert!(requests[2].headers.get("authorization").is_none());
    for request in &requests {
        assert_eq!(request.headers.get("accept").unwrap(), "application/json");
    }
}

#[tokio::test]
async fn unauthorized_clears_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/job-postings/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let api = client_with_token(&server, "stale");
    let error = api.list(&JOB_POSTINGS, &ListQuery::new()).await.unwrap_err();

    assert!(matches!(error, ApiError::AuthenticationFailed));
    assert!(!api.has_credential());
}

#[tokio::test]
async fn non_json_error_has_no_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let error = api.send(ApiRequest::get("/api/reports/")).await.unwrap_err();

    match error {
        ApiError::Status { status, ref details } => {
            assert_eq!(status, 502);
            assert!(details.is_none());
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(error.alerts(), vec!["An error occurred. Please try again."]);
    assert!(api.has_credential());
}

#[tokio::test]
async fn validation_error_keeps_structured_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/companies/customer-companies/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": ["customer company with this code already exists."],
            "non_field_errors": ["Check the highlighted fields."]
        })))
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let error = api
        .create(&CUSTOMER_COMPANIES, &json!({"name": "Acme", "code": "AC"}))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(400));
    assert_eq!(
        error.alerts(),
        vec![
            "Check the highlighted fields.",
            "Code: customer company with this code already exists.",
        ]
    );
}

#[tokio::test]
async fn unreachable_backend_is_distinct_from_http_errors() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let base = format!("http://127.0.0.1:{}", port);
    let api = ApiClient::new(&base, Credentials::new(Box::new(MemoryStore::new()))).unwrap();
    let error = api.profile().await.unwrap_err();

    assert!(error.is_backend_unavailable());
    assert_eq!(error.status(), None);
    assert_eq!(
        error.alerts(),
        vec![format!(
            "Backend server is not available. Please check if the server is running on {}",
            base
        )]
    );
}

#[tokio::test]
async fn login_holds_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/auth/login/"))
        .and(body_json(json!({"email": "ayse@x.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "acc-1",
            "refresh": "ref-1",
            "message": "Login successful"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = anonymous_client(&server);
    let response = api.login("ayse@x.com", "secret").await.unwrap();

    assert_eq!(response.refresh.as_deref(), Some("ref-1"));
    assert_eq!(api.credentials().token().as_deref(), Some("acc-1"));
}

#[tokio::test]
async fn login_without_access_token_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let api = anonymous_client(&server);
    let error = api.login("a@x.com", "pw").await.unwrap_err();

    assert!(matches!(error, ApiError::InvalidResponse(_)));
    assert!(!api.has_credential());
}

#[tokio::test]
async fn delete_without_body_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/companies/customer-companies/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    api.destroy(&CUSTOMER_COMPANIES, 4).await.unwrap();
}

#[tokio::test]
async fn list_sends_page_and_non_empty_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/flows/candidate-flows/"))
        .and(query_param("page", "2"))
        .and(query_param("flow_status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 21,
            "next": null,
            "previous": "http://x/api/flows/candidate-flows/?page=1",
            "results": [{"id": 3, "flow_status": "active", "candidate_name": "Elif Şahin"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let query = ListQuery::new()
        .page(2)
        .filter("flow_status", "active")
        .filter("job_code", "");
    let page = api.list(&CANDIDATE_FLOWS, &query).await.unwrap();

    assert_eq!(page.count, Some(21));
    assert!(page.has_previous());
    assert_eq!(page.results[0].candidate_label(), "Elif Şahin");

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or_default().contains("job_code"));
}

#[tokio::test]
async fn write_without_entity_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/flows/candidate-flows/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "job_posting": 2,
            "candidate": 5,
            "flow_status": "active",
            "notes": ""
        })))
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let outcome = api
        .create(&CANDIDATE_FLOWS, &json!({"job_posting": 2, "candidate": 5}))
        .await
        .unwrap();

    assert!(matches!(outcome, WriteOutcome::Accepted(ref v) if v["candidate"] == 5));
}

#[tokio::test]
async fn toggle_active_puts_full_resource_with_flag_flipped() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/companies/customer-companies/7/"))
        .and(body_partial_json(json!({"id": 7, "name": "Globex", "is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Globex", "code": "GX", "is_active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let company = serde_json::from_value(json!({"id": 7, "name": "Globex", "code": "GX", "is_active": true})).unwrap();
    let outcome = api.toggle_active(&CUSTOMER_COMPANIES, &company).await.unwrap();

    assert!(matches!(outcome, WriteOutcome::Entity(ref c) if !c.is_active));
}

#[tokio::test]
async fn hr_company_toggle_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/companies/hr-companies/3/toggle_active/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Company Acme HR deactivated successfully",
            "data": {"id": 3, "name": "Acme HR", "code": "ACH", "is_active": false, "hr_users_count": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let company: HrCompany =
        serde_json::from_value(json!({"id": 3, "name": "Acme HR", "code": "ACH", "is_active": true})).unwrap();
    let updated = api.toggle_hr_company_active(&company).await.unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.hr_users_count, Some(4));
}

#[tokio::test]
async fn generate_report_posts_window() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reports/generate_weekly_report/"))
        .and(body_json(json!({
            "report_type": "weekly_activity",
            "start_date": "2024-02-27",
            "end_date": "2024-03-05"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "message": "Weekly report generation started",
            "task_id": "abc-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let response = api.generate_report(ReportKind::Weekly, today).await.unwrap();

    assert_eq!(response.task_id.as_deref(), Some("abc-123"));
}

#[tokio::test]
async fn download_returns_body_and_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/9/download/"))
        .and(header("authorization", "Bearer t"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .insert_header("content-disposition", "attachment; filename=\"weekly_activity_9.pdf\"")
                .set_body_bytes(b"%PDF-1.4 body".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let report = serde_json::from_value(json!({
        "id": 9,
        "report_type": "weekly_activity",
        "status": "completed",
        "start_date": "2024-02-27",
        "end_date": "2024-03-05"
    }))
    .unwrap();
    let download = api.download_report(&report).await.unwrap();

    assert_eq!(download.filename().as_deref(), Some("weekly_activity_9.pdf"));
    assert_eq!(download.content_type(), Some("application/pdf"));
    assert_eq!(download.body, b"%PDF-1.4 body".to_vec());
}

#[tokio::test]
async fn download_failure_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/9/download/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Report is not ready for download"})))
        .mount(&server)
        .await;

    let api = client_with_token(&server, "t");
    let error = api.download("/api/reports/9/download/").await.unwrap_err();

    assert_eq!(error.alerts(), vec!["Report is not ready for download"]);
}

#[tokio::test]
async fn nested_collections_filter_by_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/educations/"))
        .and(query_param("candidate", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 1, "candidate": 5, "school_name": "METU", "department": "CS",
                "degree": "BSc", "start_date": "2016-09-01", "end_date": "2020-06-30",
                "is_current": false, "gpa": "3.40"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/flows/activities/"))
        .and(query_param("candidate_flow", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "candidate_flow": 8, "activity_type": 1, "status": 2,
             "activity_type_detail": {"id": 1, "name": "Interview"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/flows/statuses/"))
        .and(query_param("activity_type", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 2, "name": "Scheduled", "activity_type": 1}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/flows/activity-types/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1, "name": "Interview"}, {"id": 4, "name": "Offer", "is_active": false}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_with_token(&server, "acc");

    let educations = api.candidate_educations(5).await.unwrap();
    assert_eq!(educations.results[0].period(), "2016 - 2020");

    let activities = api.flow_activities(8).await.unwrap();
    assert_eq!(activities.count, Some(1));
    assert_eq!(activities.results[0].type_name(), "Interview");
    assert_eq!(activities.results[0].status_name(), "#2");

    let statuses = api.statuses(Some(1)).await.unwrap();
    assert_eq!(statuses.results[0].name, "Scheduled");

    let types = api.activity_types().await.unwrap();
    assert_eq!(types.results.len(), 2);
    assert!(!types.results[1].is_active);
}
