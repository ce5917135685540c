use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::default_true;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub educations: Vec<Education>,
    #[serde(default, skip_serializing)]
    pub work_experiences: Vec<WorkExperience>,
}

impl Candidate {
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name).trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Education {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<i64>,
    pub school_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub degree: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    /// Decimal rendered as a string by the backend, e.g. `"3.40"`.
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WorkExperience {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<i64>,
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
}

impl Education {
    /// "2018 - 2022" or "2021 - present".
    pub fn period(&self) -> String {
        period(self.start_date, self.end_date, self.is_current)
    }
}

impl WorkExperience {
    pub fn period(&self) -> String {
        period(self.start_date, self.end_date, self.is_current)
    }
}

fn period(start: NaiveDate, end: Option<NaiveDate>, is_current: bool) -> String {
    let start = start.format("%Y");
    match end {
        _ if is_current => format!("{} - present", start),
        Some(end) => format!("{} - {}", start, end.format("%Y")),
        None => format!("{} -", start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_with_nested_history() {
        let json = r#"{
            "id": 12, "first_name": "Can", "last_name": "Demir", "email": "can@x.com",
            "phone": "+90 555 000 00 00", "address": null, "is_active": true,
            "created_at": "2024-02-01T08:00:00.123456+03:00", "updated_at": "2024-02-01T08:00:00Z",
            "full_name": "Can Demir",
            "educations": [{"id": 1, "school_name": "ODTÜ", "department": "CENG", "degree": "BSc",
                            "start_date": "2015-09-01", "end_date": "2019-06-30", "is_current": false, "gpa": "3.40"}],
            "work_experiences": [{"id": 4, "company_name": "Globex", "position": "Engineer",
                                  "description": null, "start_date": "2019-08-01", "end_date": null, "is_current": true}]
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.display_name(), "Can Demir");
        assert_eq!(candidate.educations[0].period(), "2015 - 2019");
        assert_eq!(candidate.educations[0].gpa.as_deref(), Some("3.40"));
        assert_eq!(candidate.work_experiences[0].period(), "2019 - present");

        let body = serde_json::to_value(&candidate).unwrap();
        assert!(body.get("educations").is_none());
        assert!(body.get("full_name").is_none());
        assert_eq!(body["is_active"], true);
    }
}
