use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ReportKind {
    #[serde(rename = "weekly_activity")]
    Weekly,
    #[serde(rename = "monthly_activity")]
    Monthly,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "Weekly Activity Report",
            ReportKind::Monthly => "Monthly Activity Report",
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "weekly_activity",
            ReportKind::Monthly => "monthly_activity",
        }
    }

    /// Reporting window ending on `today`: the previous 7 days for weekly
    /// reports, the previous calendar month for monthly ones.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            ReportKind::Weekly => today.checked_sub_days(Days::new(7)),
            ReportKind::Monthly => today.checked_sub_months(Months::new(1)),
        };
        (start.unwrap_or(today), today)
    }

    pub fn request(&self, today: NaiveDate) -> GenerateReportRequest {
        let (start_date, end_date) = self.window(today);
        GenerateReportRequest {
            report_type: *self,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Generating,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Generating => "Generating",
            ReportStatus::Completed => "Completed",
            ReportStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Report {
    pub id: i64,
    pub report_type: ReportKind,
    #[serde(default)]
    pub status: ReportStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Report {
    pub fn is_downloadable(&self) -> bool {
        self.status == ReportStatus::Completed
    }

    /// Name used when the download carries no usable Content-Disposition.
    pub fn fallback_filename(&self) -> String {
        format!("report_{}_{}.pdf", self.id, self.report_type.as_param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReportRequest {
    pub report_type: ReportKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Acknowledgement of a queued generation task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateReportResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_windows() {
        assert_eq!(ReportKind::Weekly.window(date(2024, 3, 5)), (date(2024, 2, 27), date(2024, 3, 5)));
        assert_eq!(ReportKind::Monthly.window(date(2024, 3, 31)), (date(2024, 2, 29), date(2024, 3, 31)));
        assert_eq!(ReportKind::Monthly.window(date(2024, 1, 15)), (date(2023, 12, 15), date(2024, 1, 15)));
    }

    #[test]
    fn test_generate_request_body() {
        let body = serde_json::to_value(ReportKind::Weekly.request(date(2024, 3, 5))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "report_type": "weekly_activity",
                "start_date": "2024-02-27",
                "end_date": "2024-03-05"
            })
        );
    }

    #[test]
    fn test_parse_report() {
        let json = r#"{"id": 14, "report_type": "monthly_activity", "report_type_display": "Monthly Activity Report",
            "status": "completed", "status_display": "Completed", "file_path": "/tmp/r.pdf",
            "start_date": "2024-02-01", "end_date": "2024-03-01", "generated_at": "2024-03-01T00:00:00Z",
            "completed_at": "2024-03-01T00:02:00Z", "error_message": null}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert!(report.is_downloadable());
        assert_eq!(report.fallback_filename(), "report_14_monthly_activity.pdf");
    }
}
