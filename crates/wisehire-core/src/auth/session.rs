use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::Principal;

/// Where the console stands with respect to the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup, before the persisted credential has been checked.
    #[default]
    Resolving,
    Authenticated(Principal),
    Anonymous,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    pub fn is_superuser(&self) -> bool {
        self.principal().map(|p| p.is_superuser).unwrap_or(false)
    }

    pub fn is_staff(&self) -> bool {
        self.principal().map(|p| p.is_staff).unwrap_or(false)
    }
}

/// Owns the session of one API client.
///
/// Clones share the same state. Observers call [`SessionStore::subscribe`]
/// and see every transition, including the ones caused by a 401 on an
/// unrelated call.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        let (sender, _) = watch::channel(SessionState::Resolving);
        let state = Arc::new(sender);

        let observer = Arc::downgrade(&state);
        api.credentials().on_cleared(move || {
            if let Some(state) = observer.upgrade() {
                state.send_if_modified(|current| {
                    if *current == SessionState::Anonymous {
                        return false;
                    }
                    debug!("Credential cleared, session is now anonymous");
                    *current = SessionState::Anonymous;
                    true
                });
            }
        });

        Self { api, state }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal().cloned()
    }

    pub fn is_superuser(&self) -> bool {
        self.state.borrow().is_superuser()
    }

    pub fn is_staff(&self) -> bool {
        self.state.borrow().is_staff()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    fn set(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    /// Settle the startup state from the persisted credential.
    ///
    /// Without a credential no request is made and the session becomes
    /// `Anonymous` (`Ok(None)`). A failed profile fetch clears the
    /// credential and is returned so the caller can show why.
    pub async fn resolve(&self) -> Result<Option<Principal>, ApiError> {
        if !self.api.has_credential() {
            debug!("No persisted credential, session is anonymous");
            self.set(SessionState::Anonymous);
            return Ok(None);
        }

        self.set(SessionState::Resolving);
        match self.api.profile().await {
            Ok(principal) => {
                info!(user = %principal.display_name(), "Session restored");
                self.set(SessionState::Authenticated(principal.clone()));
                Ok(Some(principal))
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                self.api.logout();
                self.set(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    /// Log in and fetch the profile. Any failure leaves the session
    /// `Anonymous` with no credential held.
    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, ApiError> {
        let outcome = match self.api.login(email, password).await {
            Ok(_) => self.api.profile().await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(principal) => {
                info!(user = %principal.display_name(), superuser = principal.is_superuser, "Logged in");
                self.set(SessionState::Authenticated(principal.clone()));
                Ok(principal)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.api.logout();
                self.set(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    /// Forget the credential locally. Idempotent, never touches the network.
    pub fn logout(&self) {
        self.api.logout();
        self.state.send_if_modified(|current| {
            if *current == SessionState::Anonymous {
                false
            } else {
                *current = SessionState::Anonymous;
                true
            }
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
