use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use wisehire_core::Route;

use crate::app::{App, Tab};
use crate::ui::styles;

/// Landing screen: who is logged in and where they can go.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_profile(frame, app, chunks[0]);
    render_navigation(frame, app, chunks[1]);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    if let Some(principal) = app.session.principal() {
        lines.push(Line::from(Span::styled(principal.display_name(), styles::title_style())));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Username:   ", styles::muted_style()),
            Span::raw(principal.username.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Email:      ", styles::muted_style()),
            Span::raw(principal.email.clone()),
        ]));
        if let Some(phone) = principal.phone.as_deref().filter(|p| !p.is_empty()) {
            lines.push(Line::from(vec![
                Span::styled("Phone:      ", styles::muted_style()),
                Span::raw(phone.to_string()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Role:       ", styles::muted_style()),
            Span::styled(principal.role_label(), styles::highlight_style()),
        ]));
        if let Some(company) = principal.hr_company_name.as_deref() {
            lines.push(Line::from(vec![
                Span::styled("HR Company: ", styles::muted_style()),
                Span::raw(company.to_string()),
            ]));
        }

        if !principal.authorized_companies_list.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Authorized Companies", styles::highlight_style())));
            for company in &principal.authorized_companies_list {
                lines.push(Line::from(format!("  {}", company)));
            }
        }
    }

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_navigation(frame: &mut Frame, app: &App, area: Rect) {
    let superuser = app.session.is_superuser();

    let mut lines = vec![Line::from("")];
    for (i, tab) in Tab::ALL.iter().enumerate().skip(1) {
        let route = tab.route();
        if route.is_superuser_only() && !superuser {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), styles::help_key_style()),
            Span::styled(route.title(), styles::help_desc_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [L] ", styles::help_key_style()),
        Span::styled("Logout", styles::help_desc_style()),
    ]));

    let block = Block::default()
        .title(format!(" {} ", Route::Dashboard.title()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
