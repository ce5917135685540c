//! Data models for WiseHire entities.
//!
//! This module contains the wire representations returned by the backend:
//!
//! - `Principal`, `HrUser`: the logged-in identity and managed HR accounts
//! - `Candidate`, `Education`, `WorkExperience`: candidate profiles
//! - `JobPosting`: open positions for customer companies
//! - `HrCompany`, `CustomerCompany`: tenant and client organizations
//! - `CandidateFlow`, `Activity`, `ActivityType`, `Status`: hiring pipelines
//! - `Report`: generated activity reports
//! - `Page`: the `{results: [...]}` envelope of list endpoints

pub mod candidate;
pub mod company;
pub mod flow;
pub mod job;
pub mod page;
pub mod report;
pub mod user;

pub use candidate::{Candidate, Education, WorkExperience};
pub use company::{CustomerCompany, HrCompany, ToggleActiveResponse};
pub use flow::{Activity, ActivityType, CandidateFlow, FlowFilters, FlowStatus, Status};
pub use job::{JobPosting, JobStatus};
pub use page::{ListQuery, Page};
pub use report::{GenerateReportRequest, GenerateReportResponse, Report, ReportKind, ReportStatus};
pub use user::{HrUser, LoginResponse, Principal};

/// Entities addressable by a numeric primary key.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Entities carrying an `is_active` flag that screens can flip.
pub trait Activatable: Identified + Clone {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// A copy of the entity with the flag flipped, ready for a full PUT.
    fn toggled(&self) -> Self {
        let mut copy = self.clone();
        copy.set_active(!self.is_active());
        copy
    }
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> i64 {
                self.id
            }
        })+
    };
}

macro_rules! impl_activatable {
    ($($ty:ty),+ $(,)?) => {
        $(impl Activatable for $ty {
            fn is_active(&self) -> bool {
                self.is_active
            }

            fn set_active(&mut self, active: bool) {
                self.is_active = active;
            }
        })+
    };
}

impl_identified!(
    Candidate,
    Education,
    WorkExperience,
    JobPosting,
    HrCompany,
    CustomerCompany,
    HrUser,
    CandidateFlow,
    Activity,
    ActivityType,
    Status,
    Report,
);

impl_activatable!(HrCompany, CustomerCompany, HrUser);
