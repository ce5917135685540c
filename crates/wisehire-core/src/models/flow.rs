use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::job::JobPosting;
use super::page::ListQuery;
use super::user::default_true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    #[default]
    Active,
    Completed,
    Rejected,
    OnHold,
}

impl FlowStatus {
    pub const ALL: [FlowStatus; 4] = [
        FlowStatus::Active,
        FlowStatus::Completed,
        FlowStatus::Rejected,
        FlowStatus::OnHold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FlowStatus::Active => "Active",
            FlowStatus::Completed => "Completed",
            FlowStatus::Rejected => "Rejected",
            FlowStatus::OnHold => "On Hold",
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            FlowStatus::Active => "active",
            FlowStatus::Completed => "completed",
            FlowStatus::Rejected => "rejected",
            FlowStatus::OnHold => "on_hold",
        }
    }
}

/// A candidate's progress through a job posting.
///
/// List responses carry the flattened `*_name`/`*_title` projections while
/// detail responses carry the ids and nested `*_detail` objects; both
/// decode into this one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CandidateFlow {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_posting: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<i64>,
    #[serde(default)]
    pub flow_status: FlowStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Only detail responses carry the flag; list rows leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub job_posting_title: Option<String>,
    #[serde(default, skip_serializing)]
    pub job_posting_code: Option<String>,
    #[serde(default, skip_serializing)]
    pub candidate_name: Option<String>,
    #[serde(default, skip_serializing)]
    pub candidate_email: Option<String>,
    #[serde(default, skip_serializing)]
    pub candidate_phone: Option<String>,
    #[serde(default, skip_serializing)]
    pub hr_company_name: Option<String>,
    #[serde(default, skip_serializing)]
    pub candidate_detail: Option<Candidate>,
    #[serde(default, skip_serializing)]
    pub job_posting_detail: Option<JobPosting>,
}

impl CandidateFlow {
    pub fn candidate_label(&self) -> String {
        self.candidate_name
            .clone()
            .or_else(|| self.candidate_detail.as_ref().map(Candidate::display_name))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn job_label(&self) -> String {
        let title = self
            .job_posting_title
            .clone()
            .or_else(|| self.job_posting_detail.as_ref().map(|j| j.title.clone()));
        let code = self
            .job_posting_code
            .clone()
            .or_else(|| self.job_posting_detail.as_ref().map(|j| j.code.clone()));
        match (title, code) {
            (Some(title), Some(code)) => format!("{} ({})", title, code),
            (Some(title), None) => title,
            (None, Some(code)) => code,
            (None, None) => "-".to_string(),
        }
    }
}

/// Search filters accepted by the candidate flow list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowFilters {
    pub flow_status: Option<FlowStatus>,
    pub job_posting: Option<i64>,
    pub candidate: Option<i64>,
    pub job_code: Option<String>,
    pub job_title: Option<String>,
    pub candidate_search: Option<String>,
    pub candidate_phone: Option<String>,
    pub experience_company: Option<String>,
    pub education_school: Option<String>,
}

impl FlowFilters {
    pub fn to_query(&self, page: u32) -> ListQuery {
        ListQuery::new()
            .page(page)
            .filter_opt("flow_status", self.flow_status.map(|s| s.as_param()))
            .filter_opt("job_posting", self.job_posting)
            .filter_opt("candidate", self.candidate)
            .filter_opt("job_code", self.job_code.as_deref())
            .filter_opt("job_title", self.job_title.as_deref())
            .filter_opt("candidate_search", self.candidate_search.as_deref())
            .filter_opt("candidate_phone", self.candidate_phone.as_deref())
            .filter_opt("experience_company", self.experience_company.as_deref())
            .filter_opt("education_school", self.education_school.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActivityType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A status an activity of a given type can be in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub activity_type: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Activity {
    pub id: i64,
    pub candidate_flow: i64,
    pub activity_type: i64,
    pub status: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub activity_type_detail: Option<ActivityType>,
    #[serde(default, skip_serializing)]
    pub status_detail: Option<Status>,
}

impl Activity {
    pub fn type_name(&self) -> String {
        self.activity_type_detail
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", self.activity_type))
    }

    pub fn status_name(&self) -> String {
        self.status_detail
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{}", self.status))
    }
}
