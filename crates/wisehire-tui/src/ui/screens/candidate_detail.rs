use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use wisehire_core::models::{Education, WorkExperience};

use crate::app::{App, CandidateDetail};
use crate::ui::styles;

/// Render a candidate's profile with education and work history side by side.
pub fn render(frame: &mut Frame, app: &App, id: i64, area: Rect) {
    let detail = app.candidate_detail.as_ref().filter(|d| d.candidate.id == id);
    let Some(detail) = detail else {
        let message = if app.is_loading() {
            " Loading..."
        } else {
            " Candidate not found"
        };
        let block = Block::default()
            .title(format!(" Candidate #{} - [Esc] back ", id))
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        frame.render_widget(Paragraph::new(Span::styled(message, styles::muted_style())).block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_info(frame, detail, chunks[0]);
    render_records(
        frame,
        " Education ",
        "No education records found.",
        detail.educations.iter().map(education_lines).collect(),
        columns[0],
    );
    render_records(
        frame,
        " Work Experience ",
        "No work experience records found.",
        detail.work_experiences.iter().map(experience_lines).collect(),
        columns[1],
    );
}

fn render_info(frame: &mut Frame, detail: &CandidateDetail, area: Rect) {
    let candidate = &detail.candidate;
    let status = if candidate.is_active {
        Span::styled("Active", styles::success_style())
    } else {
        Span::styled("Inactive", styles::muted_style())
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Email:    ", styles::muted_style()),
            Span::raw(candidate.email.clone()),
        ]),
        Line::from(vec![
            Span::styled("Phone:    ", styles::muted_style()),
            Span::raw(candidate.phone.clone()),
        ]),
        Line::from(vec![
            Span::styled("Address:  ", styles::muted_style()),
            Span::raw(
                candidate
                    .address
                    .clone()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| "Not provided".to_string()),
            ),
        ]),
        Line::from(vec![Span::styled("Status:   ", styles::muted_style()), status]),
    ];

    let block = Block::default()
        .title(format!(" {} - [Esc] back ", candidate.display_name()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_records(frame: &mut Frame, title: &str, empty: &str, records: Vec<Vec<Line<'static>>>, area: Rect) {
    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::highlight_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let lines: Vec<Line> = if records.is_empty() {
        vec![Line::styled(empty.to_string(), styles::muted_style())]
    } else {
        let mut lines = Vec::new();
        for (i, record) in records.into_iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.extend(record);
        }
        lines
    };

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn education_lines(education: &Education) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(education.school_name.clone(), styles::title_style()),
        Line::from(format!("{} in {}", education.degree, education.department)),
        Line::styled(education.period(), styles::muted_style()),
    ];
    if let Some(gpa) = education.gpa.as_deref().filter(|g| !g.is_empty()) {
        lines.push(Line::from(format!("GPA: {}", gpa)));
    }
    lines
}

fn experience_lines(experience: &WorkExperience) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(experience.position.clone(), styles::title_style()),
        Line::from(experience.company_name.clone()),
        Line::styled(experience.period(), styles::muted_style()),
    ];
    if let Some(description) = experience.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(description.to_string()));
    }
    lines
}
