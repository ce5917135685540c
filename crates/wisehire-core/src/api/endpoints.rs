//! Paths of every backend resource the console uses.

use std::marker::PhantomData;

use crate::models::{
    Activity, ActivityType, Candidate, CandidateFlow, CustomerCompany, Education, HrCompany,
    HrUser, JobPosting, Report, Status, WorkExperience,
};

pub const LOGIN_PATH: &str = "/api/auth/auth/login/";
pub const PROFILE_PATH: &str = "/api/auth/auth/profile/";
pub const GENERATE_WEEKLY_REPORT_PATH: &str = "/api/reports/generate_weekly_report/";
pub const GENERATE_MONTHLY_REPORT_PATH: &str = "/api/reports/generate_monthly_report/";

/// A REST collection whose items decode into `T`.
pub struct Resource<T> {
    path: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Resource<T> {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn detail_path(&self, id: i64) -> String {
        format!("{}{}/", self.path, id)
    }

    pub fn action_path(&self, id: i64, action: &str) -> String {
        format!("{}{}/{}/", self.path, id, action)
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resource<T> {}

impl<T> std::fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Resource").field(&self.path).finish()
    }
}

pub const CANDIDATES: Resource<Candidate> = Resource::new("/api/candidates/candidates/");
pub const EDUCATIONS: Resource<Education> = Resource::new("/api/candidates/educations/");
pub const WORK_EXPERIENCES: Resource<WorkExperience> =
    Resource::new("/api/candidates/work-experiences/");
pub const JOB_POSTINGS: Resource<JobPosting> = Resource::new("/api/jobs/job-postings/");
pub const CUSTOMER_COMPANIES: Resource<CustomerCompany> =
    Resource::new("/api/companies/customer-companies/");
pub const HR_COMPANIES: Resource<HrCompany> = Resource::new("/api/companies/hr-companies/");
pub const HR_USERS: Resource<HrUser> = Resource::new("/api/auth/users/");
pub const CANDIDATE_FLOWS: Resource<CandidateFlow> = Resource::new("/api/flows/candidate-flows/");
pub const ACTIVITIES: Resource<Activity> = Resource::new("/api/flows/activities/");
pub const ACTIVITY_TYPES: Resource<ActivityType> = Resource::new("/api/flows/activity-types/");
pub const STATUSES: Resource<Status> = Resource::new("/api/flows/statuses/");
pub const REPORTS: Resource<Report> = Resource::new("/api/reports/");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(CANDIDATES.detail_path(12), "/api/candidates/candidates/12/");
        assert_eq!(HR_COMPANIES.action_path(3, "toggle_active"), "/api/companies/hr-companies/3/toggle_active/");
        assert_eq!(REPORTS.action_path(7, "download"), "/api/reports/7/download/");
    }
}
