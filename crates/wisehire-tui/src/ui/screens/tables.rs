use chrono::Utc;
use ratatui::layout::Constraint;

use wisehire_core::models::{
    Activity, Candidate, CandidateFlow, CustomerCompany, HrCompany, HrUser, JobPosting, Report,
};
use wisehire_core::utils::{format_date, format_datetime, truncate_string};

use super::{yes_no, TableRow};

const PLACEHOLDER: &str = "-";

fn count(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn datetime(value: Option<&chrono::DateTime<Utc>>) -> String {
    value.map(format_datetime).unwrap_or_else(|| PLACEHOLDER.to_string())
}

impl TableRow for Candidate {
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone", "Created", "Active"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Fill(3),
            Constraint::Fill(3),
            Constraint::Length(18),
            Constraint::Length(19),
            Constraint::Length(6),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.display_name(),
            self.email.clone(),
            self.phone.clone(),
            datetime(self.created_at.as_ref()),
            yes_no(self.is_active),
        ]
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TableRow for JobPosting {
    const COLUMNS: &'static [&'static str] = &["Code", "Title", "Customer", "Closes", "Status"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(12),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(19),
            Constraint::Length(10),
        ]
    }

    fn cells(&self) -> Vec<String> {
        let status = if self.is_open_at(Utc::now()) {
            self.status.label().to_string()
        } else if self.is_active {
            "Closed".to_string()
        } else {
            "Inactive".to_string()
        };
        vec![
            self.code.clone(),
            self.title.clone(),
            self.customer_name(),
            format_datetime(&self.closing_date),
            status,
        ]
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TableRow for CandidateFlow {
    const COLUMNS: &'static [&'static str] = &["Candidate", "Job Posting", "Status", "HR Company", "Started"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Fill(2),
            Constraint::Fill(3),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(19),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.candidate_label(),
            self.job_label(),
            self.flow_status.label().to_string(),
            self.hr_company_name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            datetime(self.created_at.as_ref()),
        ]
    }
}

impl TableRow for Activity {
    const COLUMNS: &'static [&'static str] = &["Type", "Status", "Notes", "Recorded"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(4),
            Constraint::Length(19),
        ]
    }

    fn cells(&self) -> Vec<String> {
        let notes = self.notes.as_deref().unwrap_or(PLACEHOLDER);
        vec![
            self.type_name(),
            self.status_name(),
            truncate_string(notes, 60),
            datetime(self.created_at.as_ref()),
        ]
    }
}

impl TableRow for CustomerCompany {
    const COLUMNS: &'static [&'static str] = &["Code", "Name", "HR Users", "Active"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(6),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            count(self.authorized_hr_users_count),
            yes_no(self.is_active),
        ]
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TableRow for HrCompany {
    const COLUMNS: &'static [&'static str] = &["Code", "Name", "Users", "Active"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(6),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            count(self.hr_users_count),
            yes_no(self.is_active),
        ]
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TableRow for HrUser {
    const COLUMNS: &'static [&'static str] = &["Username", "Name", "Email", "Role", "Companies", "Last Login", "Active"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(3),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(19),
            Constraint::Length(6),
        ]
    }

    fn cells(&self) -> Vec<String> {
        let role = if self.is_superuser {
            "Superuser"
        } else if self.is_staff {
            "Staff"
        } else {
            "HR User"
        };
        let companies = self
            .authorized_companies_count
            .unwrap_or(self.authorized_customer_companies.len() as u32);
        vec![
            self.username.clone(),
            self.full_name(),
            self.email.clone(),
            role.to_string(),
            companies.to_string(),
            datetime(self.last_login.as_ref()),
            yes_no(self.is_active),
        ]
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl TableRow for Report {
    const COLUMNS: &'static [&'static str] = &["#", "Type", "Period", "Status", "Generated"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(10),
            Constraint::Length(19),
        ]
    }

    fn cells(&self) -> Vec<String> {
        let status = match self.error_message.as_deref() {
            Some(message) if !message.is_empty() => {
                format!("{}: {}", self.status.label(), truncate_string(message, 40))
            }
            _ => self.status.label().to_string(),
        };
        vec![
            self.id.to_string(),
            self.report_type.label().to_string(),
            format!("{} - {}", format_date(&self.start_date), format_date(&self.end_date)),
            status,
            datetime(self.completed_at.as_ref().or(self.generated_at.as_ref())),
        ]
    }

    fn is_active(&self) -> bool {
        self.is_downloadable()
    }
}
