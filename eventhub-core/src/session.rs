//! Authentication, role and mode state.
//!
//! [`SessionManager`] owns a [`SessionState`] behind a `watch` channel. Every
//! transition is applied in a single `send_modify`/`send_if_modified` call,
//! so readers and subscribers only ever see whole states.
//!
//! ```text
//! anonymous --login--> busy --ok--> signed in (mode = member)
//! signed in --logout--> busy --ok--> anonymous
//! signed in (admin) --toggle_mode--> signed in (admin, mode flipped)
//! ```
//!
//! A second `login`/`logout` while `busy` is rejected with [`HubError::Busy`];
//! see [`crate::busy`].

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::busy::{self, BusyState};
use crate::error::{HubError, HubResult, Operation};
use crate::provider::AuthProvider;
use crate::user::{Mode, Role, UserProfile};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub mode: Mode,
    /// True only while a login or logout is in flight.
    pub busy: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::is_admin)
    }

    /// Whether this session may add events: admin role and admin mode.
    pub fn can_manage_events(&self) -> bool {
        self.is_admin() && self.mode == Mode::Admin
    }

    /// Admin mode requires an admin user.
    pub fn is_consistent(&self) -> bool {
        self.mode == Mode::Member || self.is_admin()
    }
}

impl BusyState for SessionState {
    fn is_busy(&self) -> bool {
        self.busy
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct SessionManager {
    state: watch::Sender<SessionState>,
    auth: Arc<dyn AuthProvider>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        SessionManager { state, auth }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Sign in through the authentication provider. Requires an anonymous session.
    ///
    /// On success the mode starts at the role's default. On failure `error`
    /// is set and the session stays anonymous. `busy` is cleared either way.
    pub async fn login(&self) -> HubResult<UserProfile> {
        let guard = busy::claim(&self.state, Operation::Login, |s| {
            if s.is_signed_in() {
                Err(HubError::AlreadySignedIn)
            } else {
                Ok(())
            }
        })?;
        info!("login started");

        match self.auth.authenticate().await {
            Ok(user) => {
                info!(uid = %user.uid, role = %user.role, "login finished");
                let profile = user.clone();
                guard.finish(move |s| {
                    s.mode = Mode::default_for(user.role);
                    s.user = Some(user);
                });
                Ok(profile)
            }
            Err(e) => {
                let err = HubError::Auth(e);
                warn!(error = %err, "login failed");
                guard.fail(&err);
                Err(err)
            }
        }
    }

    /// Sign out. Requires a signed-in user.
    pub async fn logout(&self) -> HubResult<()> {
        let guard = busy::claim(&self.state, Operation::Logout, |s| {
            if s.is_signed_in() {
                Ok(())
            } else {
                Err(HubError::NotSignedIn)
            }
        })?;
        info!("logout started");

        match self.auth.sign_out().await {
            Ok(()) => {
                info!("logout finished");
                guard.finish(|s| {
                    s.user = None;
                    s.mode = Mode::Member;
                });
                Ok(())
            }
            Err(e) => {
                let err = HubError::Auth(e);
                warn!(error = %err, "logout failed");
                guard.fail(&err);
                Err(err)
            }
        }
    }

    /// Flip between member and admin mode. Synchronous, admin role only.
    ///
    /// Anything else is rejected and leaves the state unchanged.
    pub fn toggle_mode(&self) -> HubResult<Mode> {
        let mut outcome = Err(HubError::NotSignedIn);
        self.state.send_if_modified(|s| {
            outcome = if s.busy {
                Err(HubError::Busy(Operation::ToggleMode))
            } else if !s.is_signed_in() {
                Err(HubError::NotSignedIn)
            } else if !s.is_admin() {
                Err(HubError::Unauthorized)
            } else {
                s.mode = s.mode.flipped();
                Ok(s.mode)
            };
            outcome.is_ok()
        });

        match &outcome {
            Ok(mode) => info!(%mode, "mode switched"),
            Err(e) => warn!(error = %e, "mode switch rejected"),
        }
        outcome
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::mock::MockAuthProvider;
    use async_trait::async_trait;
    use std::time::Duration;

    struct RejectingAuth;

    #[async_trait]
    impl AuthProvider for RejectingAuth {
        async fn authenticate(&self) -> Result<UserProfile, AuthError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(AuthError("invalid credentials".into()))
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Err(AuthError("backend offline".into()))
        }
    }

    fn member_auth() -> MockAuthProvider {
        let mut auth = MockAuthProvider::default();
        auth.profile.role = Role::Member;
        auth
    }

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MockAuthProvider::default()))
    }

    #[test]
    fn starts_anonymous() {
        let state = manager().snapshot();
        assert_eq!(state, SessionState::default());
        assert_eq!(state.mode, Mode::Member);
        assert!(!state.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn login_sets_user_and_clears_busy() {
        let sut = manager();
        let user = sut.login().await.unwrap();

        let state = sut.snapshot();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(state.user, Some(user));
        assert_eq!(state.mode, Mode::Member);
        assert!(!state.busy);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn login_is_busy_while_in_flight() {
        let sut = manager();
        let mut rx = sut.subscribe();

        let login = sut.login();
        tokio::pin!(login);
        tokio::select! {
            biased;
            _ = &mut login => panic!("login finished before its latency elapsed"),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }

        let mid = rx.borrow_and_update().clone();
        assert!(mid.busy);
        assert!(mid.user.is_none());

        login.await.unwrap();
        let done = rx.borrow_and_update().clone();
        assert!(!done.busy);
        assert!(done.user.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn second_login_while_busy_is_rejected() {
        let sut = manager();

        let (first, second) = tokio::join!(sut.login(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            sut.login().await
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(HubError::Busy(Operation::Login)));
        assert!(!sut.snapshot().busy);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_while_logging_in_is_rejected() {
        let sut = manager();

        let (login, logout) = tokio::join!(sut.login(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            sut.logout().await
        });

        assert!(login.is_ok());
        assert_eq!(logout, Err(HubError::Busy(Operation::Logout)));
        assert!(sut.snapshot().is_signed_in());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_login_reports_error_and_clears_busy() {
        let sut = SessionManager::new(Arc::new(RejectingAuth));

        let err = sut.login().await.unwrap_err();
        assert_eq!(err, HubError::Auth(AuthError("invalid credentials".into())));

        let state = sut.snapshot();
        assert!(!state.busy);
        assert!(state.user.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Authentication failed: invalid credentials")
        );

        sut.dismiss_error();
        assert!(sut.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_resets_to_anonymous_member() {
        let sut = manager();
        sut.login().await.unwrap();
        sut.toggle_mode().unwrap();
        assert_eq!(sut.snapshot().mode, Mode::Admin);

        sut.logout().await.unwrap();

        let state = sut.snapshot();
        assert!(state.user.is_none());
        assert_eq!(state.mode, Mode::Member);
        assert!(!state.busy);
        assert!(state.is_consistent());
    }

    #[tokio::test(start_paused = true)]
    async fn login_while_signed_in_is_rejected() {
        let sut = manager();
        sut.login().await.unwrap();
        sut.toggle_mode().unwrap();
        let before = sut.snapshot();

        assert_eq!(sut.login().await, Err(HubError::AlreadySignedIn));
        assert_eq!(sut.snapshot(), before);
        assert_eq!(sut.snapshot().mode, Mode::Admin);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_requires_a_user() {
        let sut = manager();
        assert_eq!(sut.logout().await, Err(HubError::NotSignedIn));
        assert!(!sut.snapshot().busy);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_logout_keeps_user_and_clears_busy() {
        let auth = Arc::new(MockAuthProvider::default());
        let sut = SessionManager::new(auth);
        sut.login().await.unwrap();

        // Swap to a provider whose sign out fails
        let sut = SessionManager {
            state: sut.state,
            auth: Arc::new(RejectingAuth),
        };
        assert!(matches!(sut.logout().await, Err(HubError::Auth(_))));

        let state = sut.snapshot();
        assert!(state.is_signed_in());
        assert!(!state.busy);
        assert!(state.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_mode_is_its_own_inverse() {
        let sut = manager();
        sut.login().await.unwrap();

        assert_eq!(sut.toggle_mode(), Ok(Mode::Admin));
        assert!(sut.snapshot().can_manage_events());
        assert_eq!(sut.toggle_mode(), Ok(Mode::Member));
        assert!(!sut.snapshot().can_manage_events());
    }

    #[test]
    fn toggle_mode_rejected_when_anonymous() {
        let sut = manager();
        assert_eq!(sut.toggle_mode(), Err(HubError::NotSignedIn));
        assert_eq!(sut.snapshot().mode, Mode::Member);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_mode_has_no_effect_for_members() {
        let sut = SessionManager::new(Arc::new(member_auth()));
        sut.login().await.unwrap();
        let before = sut.snapshot();
        assert_eq!(before.role(), Some(Role::Member));

        assert_eq!(sut.toggle_mode(), Err(HubError::Unauthorized));
        assert_eq!(sut.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_login_does_not_leave_busy_stuck() {
        let sut = manager();

        let _ = tokio::time::timeout(Duration::from_millis(10), sut.login()).await;

        let state = sut.snapshot();
        assert!(!state.busy);
        assert!(state.user.is_none());
        assert!(sut.login().await.is_ok());
    }

    #[test]
    fn admin_mode_without_admin_is_inconsistent() {
        let state = SessionState {
            mode: Mode::Admin,
            ..Default::default()
        };
        assert!(!state.is_consistent());
    }
}
