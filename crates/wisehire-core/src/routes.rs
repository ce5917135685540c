use crate::guard::Guard;

/// Every screen of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Candidates,
    CandidateDetail(i64),
    JobPostings,
    CandidateFlows,
    Activities { flow_id: i64 },
    CustomerCompanies,
    HrCompanies,
    HrUsers,
    Reports,
}

impl Route {
    /// The guard protecting this route. The login screen is open to all.
    pub fn guard(&self) -> Option<Guard> {
        match self {
            Route::Login => None,
            Route::Dashboard
            | Route::Candidates
            | Route::CandidateDetail(_)
            | Route::JobPostings
            | Route::CandidateFlows
            | Route::Activities { .. } => Some(Guard::AuthenticatedOnly),
            Route::CustomerCompanies | Route::HrCompanies | Route::HrUsers | Route::Reports => {
                Some(Guard::SuperuserOnly)
            }
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::Login => "Login".to_string(),
            Route::Dashboard => "Dashboard".to_string(),
            Route::Candidates => "Candidates".to_string(),
            Route::CandidateDetail(id) => format!("Candidate #{}", id),
            Route::JobPostings => "Job Postings".to_string(),
            Route::CandidateFlows => "Candidate Flows".to_string(),
            Route::Activities { flow_id } => format!("Activities (Flow #{})", flow_id),
            Route::CustomerCompanies => "Customer Companies".to_string(),
            Route::HrCompanies => "HR Companies".to_string(),
            Route::HrUsers => "HR Users".to_string(),
            Route::Reports => "Reports".to_string(),
        }
    }

    /// Location string, as shown in the status bar.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Candidates => "/candidates".to_string(),
            Route::CandidateDetail(id) => format!("/candidates/{}", id),
            Route::JobPostings => "/job-postings".to_string(),
            Route::CandidateFlows => "/candidate-flows".to_string(),
            Route::Activities { flow_id } => format!("/candidate-flows/{}/activities", flow_id),
            Route::CustomerCompanies => "/customer-companies".to_string(),
            Route::HrCompanies => "/hr-companies".to_string(),
            Route::HrUsers => "/hr-users".to_string(),
            Route::Reports => "/reports".to_string(),
        }
    }

    pub fn is_superuser_only(&self) -> bool {
        self.guard() == Some(Guard::SuperuserOnly)
    }
}
