use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use wisehire_core::{Decision, Route};

use crate::app::{App, AppState, LoginFocus, Tab};

use super::screens::{self, candidate_detail, dashboard, TableView};
use super::styles;

const LIST_HINT: &str = "[t]oggle [d]elete [r]efresh";
const READ_ONLY_HINT: &str = "[d]elete [r]efresh";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ShowingErrors => render_errors_overlay(frame, app),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  WiseHire";
    let user = match app.session.principal() {
        Some(principal) => format!("{} ({})", principal.display_name(), principal.role_label()),
        None if app.session.is_loading() => String::new(),
        None => "Not logged in".to_string(),
    };
    let help_hint = "[?] Help";
    let right = format!("{}   {}", user, help_hint);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right.chars().count() + 2),
        )),
        Span::styled(user, styles::highlight_style()),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let superuser = app.session.is_superuser();

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let permitted = !tab.route().is_superuser_only() || superuser;
        let label = format!("[{}] {}", i + 1, tab.title());
        spans.push(Span::styled(label, styles::tab_style(app.current_tab == *tab, permitted)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.decision() {
        Decision::Pending => render_notice(frame, area, "Checking session...", styles::muted_style(), None),
        Decision::RedirectToLogin => render_notice(
            frame,
            area,
            "Please log in to continue.",
            styles::highlight_style(),
            Some("Press [L] to log in"),
        ),
        Decision::Deny(denial) => {
            let hint = if app.session_state().is_authenticated() {
                None
            } else {
                Some("Press [L] to log in")
            };
            render_notice(frame, area, denial.message(), styles::error_style(), hint);
        }
        Decision::Allow => render_route(frame, app, area),
    }
}

fn render_route(frame: &mut Frame, app: &App, area: Rect) {
    let view = |title: String, hint| TableView {
        title,
        hint,
        selection: app.selection,
        loading: app.is_loading(),
    };

    match app.route {
        Route::Login | Route::Dashboard => dashboard::render(frame, app, area),
        Route::Candidates => screens::render_table(
            frame,
            area,
            &app.candidates,
            view(app.route.title(), "[Enter] open [d]elete"),
        ),
        Route::CandidateDetail(id) => candidate_detail::render(frame, app, id, area),
        Route::JobPostings => {
            screens::render_table(frame, area, &app.job_postings, view(app.route.title(), READ_ONLY_HINT))
        }
        Route::CandidateFlows => {
            let filter = app.flow_status_filter.map(|s| s.label()).unwrap_or("All");
            screens::render_table(
                frame,
                area,
                &app.candidate_flows,
                view(
                    format!("{} [{}]", app.route.title(), filter),
                    "[Enter] activities [f]ilter [d]elete",
                ),
            )
        }
        Route::Activities { .. } => screens::render_table(
            frame,
            area,
            &app.activities,
            view(app.route.title(), "[d]elete [Esc] back"),
        ),
        Route::CustomerCompanies => {
            screens::render_table(frame, area, &app.customer_companies, view(app.route.title(), LIST_HINT))
        }
        Route::HrCompanies => screens::render_table(frame, area, &app.hr_companies, view(app.route.title(), LIST_HINT)),
        Route::HrUsers => screens::render_table(frame, area, &app.hr_users, view(app.route.title(), LIST_HINT)),
        Route::Reports => screens::render_table(
            frame,
            area,
            &app.reports,
            view(app.route.title(), "[w]eekly [m]onthly [s]ave [d]elete"),
        ),
    }
}

/// Placeholder shown instead of a screen the guard did not let through.
fn render_notice(frame: &mut Frame, area: Rect, message: &str, style: Style, hint: Option<&str>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), style)),
    ];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", hint), styles::muted_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Age of the data on the current screen.
fn data_age(app: &App) -> Option<String> {
    match app.route {
        Route::Candidates => Some(app.candidates.age_display()),
        Route::JobPostings => Some(app.job_postings.age_display()),
        Route::CandidateFlows => Some(app.candidate_flows.age_display()),
        Route::Activities { .. } => Some(app.activities.age_display()),
        Route::CustomerCompanies => Some(app.customer_companies.age_display()),
        Route::HrCompanies => Some(app.hr_companies.age_display()),
        Route::HrUsers => Some(app.hr_users.age_display()),
        Route::Reports => Some(app.reports.age_display()),
        Route::Login | Route::Dashboard | Route::CandidateDetail(_) => None,
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match (&app.status_message, data_age(app)) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(age)) => format!(" {}  Updated {} ", app.route.path(), age),
        (None, None) => format!(" {} ", app.route.path()),
    };
    let right_text = " [L]ogin/out | [q]uit ";

    let style = if app.last_errors.is_empty() {
        styles::muted_style()
    } else {
        styles::error_style()
    };

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(54, 28, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  WiseHire", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1-8       ", "Switch screens"),
        help_line("  ←/→       ", "Previous/next screen"),
        help_line("  ↑/↓ j/k   ", "Move selection"),
        help_line("  PgUp/PgDn ", "Move selection by a page"),
        help_line("  [ / ]     ", "Previous/next result page"),
        help_line("  Enter     ", "Open candidate or flow activities"),
        help_line("  Esc       ", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("  r         ", "Refresh"),
        help_line("  t         ", "Toggle active (companies, HR users)"),
        help_line("  d         ", "Delete"),
        help_line("  e         ", "Show last errors"),
        help_line("  L         ", "Log in / log out"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Flows / Reports", styles::highlight_style())),
        help_line("  f         ", "Cycle status filter"),
        help_line("  w/m       ", "Generate weekly/monthly report"),
        help_line("  s         ", "Save selected report"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let error_lines = app.login_error.len() as u16;
    let height = if error_lines > 0 { 11 + error_lines } else { 10 };
    let area = centered_rect_fixed(52, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("  Sign in to WiseHire", styles::title_style())),
        Line::from(""),
    ];

    let field = |label: &'static str, value: String, focused: bool| {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::raw("  "),
            Span::styled(label, styles::muted_style()),
            Span::styled(format!("{:<28}{}", value, cursor), style),
            Span::styled("]", styles::muted_style()),
        ])
    };

    let email: String = app.login_email.chars().rev().take(28).collect::<Vec<_>>().into_iter().rev().collect();
    lines.push(field("Email:    [", email, app.login_focus == LoginFocus::Email));
    let masked = "*".repeat(app.login_password.chars().count().min(28));
    lines.push(field("Password: [", masked, app.login_focus == LoginFocus::Password));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let (label, style) = if button_focused {
        (" ▶ Login ◀ ", styles::selected_style())
    } else {
        ("   Login   ", styles::list_item_style())
    };
    lines.push(Line::from(vec![
        Span::raw("                 ["),
        Span::styled(label, style),
        Span::raw("]"),
    ]));

    if !app.login_error.is_empty() {
        lines.push(Line::from(""));
        for error in &app.login_error {
            lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_errors_overlay(frame: &mut Frame, app: &App) {
    let height = (app.last_errors.len() as u16 + 5).min(frame.area().height);
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for error in &app.last_errors {
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Press Esc to close", styles::muted_style())));

    let block = Block::default()
        .title(" Errors ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 8, frame.area());
    frame.render_widget(Clear, area);

    let label = app
        .pending_delete
        .as_ref()
        .map(|p| p.label.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Delete this record?", styles::highlight_style())),
        Line::from(Span::styled(format!("   {}", label), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
