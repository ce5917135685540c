//! Route guards consulted before any screen is shown.

use crate::auth::SessionState;

/// Access rule attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any logged-in user. Anonymous visitors are sent to the login screen.
    AuthenticatedOnly,
    /// Superusers only. Refusals are shown in place, without redirecting.
    SuperuserOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotLoggedIn,
    InsufficientPrivilege,
}

impl Denial {
    pub fn message(&self) -> &'static str {
        match self {
            Denial::NotLoggedIn => "You must be logged in to access this page.",
            Denial::InsufficientPrivilege => "You must be a superuser to access this page.",
        }
    }
}

/// What the screen should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The session is still resolving; show a placeholder.
    Pending,
    Allow,
    RedirectToLogin,
    Deny(Denial),
}

impl Guard {
    pub fn check(&self, state: &SessionState) -> Decision {
        match (self, state) {
            (_, SessionState::Resolving) => Decision::Pending,
            (Guard::AuthenticatedOnly, SessionState::Authenticated(_)) => Decision::Allow,
            (Guard::AuthenticatedOnly, SessionState::Anonymous) => Decision::RedirectToLogin,
            (Guard::SuperuserOnly, SessionState::Anonymous) => Decision::Deny(Denial::NotLoggedIn),
            (Guard::SuperuserOnly, SessionState::Authenticated(principal)) => {
                if principal.is_superuser {
                    Decision::Allow
                } else {
                    Decision::Deny(Denial::InsufficientPrivilege)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Principal;

    fn authenticated(superuser: bool) -> SessionState {
        SessionState::Authenticated(
            serde_json::from_value::<Principal>(serde_json::json!({"id": 5, "is_superuser": superuser}))
                .unwrap(),
        )
    }

    #[test]
    fn test_authenticated_only() {
        let guard = Guard::AuthenticatedOnly;
        assert_eq!(guard.check(&SessionState::Resolving), Decision::Pending);
        assert_eq!(guard.check(&SessionState::Anonymous), Decision::RedirectToLogin);
        assert_eq!(guard.check(&authenticated(false)), Decision::Allow);
    }

    #[test]
    fn test_superuser_only() {
        let guard = Guard::SuperuserOnly;
        assert_eq!(guard.check(&SessionState::Resolving), Decision::Pending);
        assert_eq!(guard.check(&SessionState::Anonymous), Decision::Deny(Denial::NotLoggedIn));
        assert_eq!(
            guard.check(&authenticated(false)),
            Decision::Deny(Denial::InsufficientPrivilege)
        );
        assert_eq!(guard.check(&authenticated(true)), Decision::Allow);
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(Denial::NotLoggedIn.message(), "You must be logged in to access this page.");
        assert_eq!(
            Denial::InsufficientPrivilege.message(),
            "You must be a superuser to access this page."
        );
    }
}
