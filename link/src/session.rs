//! Session lifecycle: login, two-factor completion, restore, logout.
//!
//! [`SessionStore`] owns the client and the current [`SessionState`], and is
//! the only place that swaps the bearer token in and out of the client. The
//! state transitions are plain functions over the login responses, so the
//! whole lifecycle unit-tests without a server.

use crate::{
    auth::AuthProvider,
    client::MonetaClient,
    credentials::{CredentialStore, Credentials},
    error::{LinkError, Result},
    models::{LoginResponse, UserInfo},
};
use log::{debug, warn};

/// Where the session currently stands.
///
/// `Anonymous → TwoFactorPending → Authenticated` for 2FA accounts,
/// `Anonymous → Authenticated` otherwise, back to `Anonymous` on logout.
/// No token means not authenticated; there is no in-between.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No token; only public screens are reachable.
    #[default]
    Anonymous,
    /// Password accepted, waiting on a one-time code.
    TwoFactorPending {
        challenge_token: String,
        username: String,
        remember_me: bool,
    },
    /// Holding a live token.
    Authenticated {
        username: String,
        /// Profile from the login response; absent when the session was
        /// restored from stored credentials.
        user: Option<UserInfo>,
        access_token: String,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn is_two_factor_pending(&self) -> bool {
        matches!(self, SessionState::TwoFactorPending { .. })
    }
}

/// What a successful login attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session is fully authenticated.
    Authenticated,
    /// Password accepted; a one-time code must follow before the session
    /// authenticates.
    TwoFactorRequired,
}

/// Owns the client and the session state, and persists the token for
/// "remember me" sessions through a [`CredentialStore`].
pub struct SessionStore<S: CredentialStore> {
    client: MonetaClient,
    state: SessionState,
    store: S,
    instance: String,
}

impl<S: CredentialStore> SessionStore<S> {
    /// Create a store for one server instance.
    ///
    /// `instance` keys the credential storage (e.g. "local", "production").
    pub fn new(client: MonetaClient, store: S, instance: impl Into<String>) -> Self {
        Self {
            client,
            state: SessionState::Anonymous,
            store,
            instance: instance.into(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the session holds a live token.
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Whether a login is waiting on a one-time code.
    pub fn is_two_factor_pending(&self) -> bool {
        self.state.is_two_factor_pending()
    }

    /// Profile of the logged-in user, when the login response carried one.
    pub fn current_user(&self) -> Option<&UserInfo> {
        match &self.state {
            SessionState::Authenticated { user, .. } => user.as_ref(),
            _ => None,
        }
    }

    /// Username of the logged-in user.
    pub fn current_username(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { username, .. } => Some(username),
            _ => None,
        }
    }

    /// The live access token, when authenticated.
    pub fn access_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { access_token, .. } => Some(access_token),
            _ => None,
        }
    }

    /// The client, carrying the bearer token while authenticated.
    pub fn client(&self) -> &MonetaClient {
        &self.client
    }

    /// The credential backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The credential backend, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The instance name keying credential storage.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Restore a previous "remember me" session from stored credentials.
    ///
    /// Returns `true` when an unexpired token was found and the session is
    /// now authenticated. An expired or missing entry leaves the session
    /// anonymous; expired tokens are treated exactly like absent ones.
    pub fn restore(&mut self) -> Result<bool> {
        match self.store.get_credentials(&self.instance)? {
            Some(creds) if !creds.is_expired() => {
                debug!("[SESSION] Restored session for '{}' from stored token", creds.username);
                self.client.set_auth(AuthProvider::bearer(creds.access_token.clone()));
                self.state = SessionState::Authenticated {
                    username: creds.username,
                    user: None,
                    access_token: creds.access_token,
                };
                Ok(true)
            }
            Some(creds) => {
                debug!("[SESSION] Stored token for '{}' is expired; ignoring", creds.username);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Authenticate with an externally supplied bearer token.
    ///
    /// Used when the caller already holds a token (a `--token` flag, a test
    /// harness). Nothing is persisted and no server call is made; the token
    /// is trusted until a request rejects it.
    pub fn adopt_token(&mut self, username: impl Into<String>, access_token: impl Into<String>) {
        let access_token = access_token.into();
        self.client.set_auth(AuthProvider::bearer(access_token.clone()));
        self.state = SessionState::Authenticated {
            username: username.into(),
            user: None,
            access_token,
        };
        debug!("[SESSION] Adopted externally supplied token");
    }

    /// Attempt a password login.
    ///
    /// On a rejected password the session state is untouched and the auth
    /// error is returned. On success the outcome says whether the session is
    /// authenticated or waiting on a one-time code.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome> {
        let result = self.client.login(username, password, remember_me).await;
        self.apply_login_result(username, remember_me, result)
    }

    /// Complete a pending two-factor challenge.
    ///
    /// Fails with an auth error when no challenge is pending or the code is
    /// rejected; a rejected code leaves the challenge pending so the user
    /// can retry.
    pub async fn complete_two_factor(&mut self, code: &str, use_backup_code: bool) -> Result<()> {
        let (challenge_token, username, remember_me) = match &self.state {
            SessionState::TwoFactorPending {
                challenge_token,
                username,
                remember_me,
            } => (challenge_token.clone(), username.clone(), *remember_me),
            _ => {
                return Err(LinkError::Authentication(
                    "no two-factor challenge is pending".to_string(),
                ));
            }
        };

        let result = self
            .client
            .verify_two_factor(&challenge_token, code, use_backup_code)
            .await;
        self.apply_two_factor_result(&username, remember_me, result)
    }

    /// End the session.
    ///
    /// Clears the local state and stored credentials unconditionally; a
    /// failed server-side revocation is logged and otherwise ignored, since
    /// the local token is gone either way.
    pub async fn logout(&mut self) {
        if self.is_authenticated() {
            if let Err(e) = self.client.logout().await {
                warn!("[SESSION] Server-side logout failed: {}", e);
            }
        }
        self.client.set_auth(AuthProvider::none());
        self.state = SessionState::Anonymous;
        if let Err(e) = self.store.delete_credentials(&self.instance) {
            warn!("[SESSION] Failed to delete stored credentials: {}", e);
        }
        debug!("[SESSION] Session cleared");
    }

    /// Drop a session whose token the server no longer accepts.
    ///
    /// Like [`logout`](Self::logout) but without the revocation call; the
    /// token is already dead, so only the local state and any stored
    /// credentials are cleared.
    pub fn invalidate(&mut self) {
        self.client.set_auth(AuthProvider::none());
        self.state = SessionState::Anonymous;
        if let Err(e) = self.store.delete_credentials(&self.instance) {
            warn!("[SESSION] Failed to delete stored credentials: {}", e);
        }
        debug!("[SESSION] Session invalidated");
    }

    /// Fold a login result into the state machine.
    fn apply_login_result(
        &mut self,
        username: &str,
        remember_me: bool,
        result: Result<LoginResponse>,
    ) -> Result<LoginOutcome> {
        let response = result?;

        if response.two_factor_required {
            let challenge_token = response.challenge_token.ok_or_else(|| {
                LinkError::Authentication("login response missing challenge token".to_string())
            })?;
            self.state = SessionState::TwoFactorPending {
                challenge_token,
                username: username.to_string(),
                remember_me,
            };
            return Ok(LoginOutcome::TwoFactorRequired);
        }

        self.finish_login(username, remember_me, response)?;
        Ok(LoginOutcome::Authenticated)
    }

    /// Fold a two-factor verification result into the state machine.
    fn apply_two_factor_result(
        &mut self,
        username: &str,
        remember_me: bool,
        result: Result<LoginResponse>,
    ) -> Result<()> {
        let response = result?;
        self.finish_login(username, remember_me, response)
    }

    /// Enter `Authenticated` from a token-bearing login response.
    fn finish_login(
        &mut self,
        username: &str,
        remember_me: bool,
        response: LoginResponse,
    ) -> Result<()> {
        let access_token = response.access_token.ok_or_else(|| {
            LinkError::Authentication("login response missing access token".to_string())
        })?;

        self.client.set_auth(AuthProvider::bearer(access_token.clone()));

        if remember_me {
            let mut creds = Credentials::new(
                self.instance.clone(),
                username.to_string(),
                access_token.clone(),
            )
            .with_server_url(self.client.base_url().to_string());
            if let Some(expires_at) = &response.expires_at {
                creds = creds.with_expires_at(expires_at.clone());
            }
            // A failed write is not worth failing the login over.
            if let Err(e) = self.store.set_credentials(&creds) {
                warn!("[SESSION] Failed to persist credentials: {}", e);
            }
        }

        self.state = SessionState::Authenticated {
            username: username.to_string(),
            user: response.user,
            access_token,
        };
        Ok(())
    }
}
