//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use wisehire_core::models::ReportKind;
use wisehire_core::{Decision, Route};

use crate::app::{can_add_email_char, can_add_password_char, App, AppState, LoginFocus, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ShowingErrors => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='8') => {
            if let Some(tab) = Tab::from_key(c) {
                app.select_tab(tab);
            }
        }
        KeyCode::Left => {
            let tab = app.current_tab.prev();
            app.select_tab(tab);
        }
        KeyCode::Right => {
            let tab = app.current_tab.next();
            app.select_tab(tab);
        }
        KeyCode::Char('L') => {
            if app.session_state().is_authenticated() {
                app.logout();
            } else {
                app.start_login();
            }
        }
        KeyCode::Char('e') => app.show_errors(),
        KeyCode::Esc | KeyCode::Backspace => {
            app.go_back();
        }
        _ => {
            // Screen actions only apply once the guard lets the screen through
            if app.decision() == Decision::Allow {
                handle_screen_input(app, key);
            }
        }
    }

    Ok(false)
}

fn handle_screen_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = app.current_len().saturating_sub(1),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('[') => app.prev_page(),
        KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('t') => app.toggle_selected(),
        _ => match app.route {
            Route::CandidateFlows => handle_flows_input(app, key),
            Route::Reports => handle_reports_input(app, key),
            _ => {}
        },
    }
}

fn handle_flows_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('f') {
        app.cycle_flow_filter();
    }
}

fn handle_reports_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('w') => app.generate_report(ReportKind::Weekly),
        KeyCode::Char('m') => app.generate_report(ReportKind::Monthly),
        KeyCode::Char('s') => app.download_selected_report(),
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Close the form; guarded screens keep prompting for login
            app.state = AppState::Normal;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                // On failure login_error is set and the form stays open
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use wisehire_core::auth::{Credentials, MemoryStore};
    use wisehire_core::{ApiClient, Config, SessionStore};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn anonymous_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9", Credentials::new(Box::new(MemoryStore::new()))).unwrap();
        let session = SessionStore::new(api);
        session.resolve().await.unwrap();
        let mut app = App::with_session(Config::default(), session);
        app.login_email.clear();
        app.login_password.clear();
        app
    }

    #[tokio::test]
    async fn test_quit_requires_confirmation() {
        let mut app = anonymous_app().await;

        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap());
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap());
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_help_overlay_toggles() {
        let mut app = anonymous_app().await;

        handle_input(&mut app, key(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);
        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_number_keys_switch_routes() {
        let mut app = anonymous_app().await;

        handle_input(&mut app, key(KeyCode::Char('8'))).await.unwrap();
        assert_eq!(app.route, Route::Reports);
        assert_eq!(app.current_tab, Tab::Reports);
        // Superuser screens deny in place instead of opening the login form
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.route, Route::Candidates);
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[tokio::test]
    async fn test_login_form_editing() {
        let mut app = anonymous_app().await;
        app.start_login();
        assert_eq!(app.login_focus, LoginFocus::Email);

        for c in "a b@x.com".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(app.login_email, "ab@x.com");

        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        for c in "p w".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.login_password, "p ");

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
    }
}
