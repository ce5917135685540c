use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::CustomerCompany;
use super::user::default_true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Inactive,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_company: Option<i64>,
    pub customer_company: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    pub closing_date: DateTime<Utc>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub customer_company_detail: Option<CustomerCompany>,
}

impl JobPosting {
    pub fn customer_name(&self) -> String {
        self.customer_company_detail
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{}", self.customer_company))
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.status == JobStatus::Active && self.closing_date > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_job_posting() {
        let json = r#"{"id": 5, "title": "Backend Developer", "code": "BE-01", "description": "Rust",
            "hr_company": 1, "customer_company": 3, "created_by": 2,
            "closing_date": "2024-06-30T12:00:00+03:00", "status": "active", "is_active": true,
            "customer_company_detail": {"id": 3, "name": "Globex", "code": "GLX", "is_active": true, "authorized_hr_users_count": 4}}"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(job.customer_name(), "Globex");
        assert_eq!(job.closing_date, Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap());
        assert!(job.is_open_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert!(!job.is_open_at(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()));
    }
}
