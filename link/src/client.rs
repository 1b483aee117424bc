//! Main Moneta client with builder pattern.
//!
//! Provides the primary interface for talking to a Moneta server: the
//! authentication flow lives here, the typed collection operations live in
//! [`crate::resources`].

use crate::{
    auth::AuthProvider,
    error::{LinkError, Result},
    models::{ApiError, LoginRequest, LoginResponse, TwoFactorRequest},
};
use log::debug;
use std::time::{Duration, Instant};

/// Main Moneta API client.
///
/// Use [`MonetaClientBuilder`] to construct instances with custom
/// configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use moneta_link::MonetaClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MonetaClient::builder()
///     .base_url("http://localhost:8080")
///     .timeout(std::time::Duration::from_secs(30))
///     .build()?;
///
/// let response = client.login("amina", "secret123", false).await?;
/// println!("2FA required: {}", response.two_factor_required);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MonetaClient {
    pub(crate) base_url: String,
    pub(crate) chat_url: Option<String>,
    pub(crate) http_client: reqwest::Client,
    pub(crate) auth: AuthProvider,
}

impl MonetaClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> MonetaClientBuilder {
        MonetaClientBuilder::new()
    }

    /// The configured API origin
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured chat origin, when one was set
    pub fn chat_url(&self) -> Option<&str> {
        self.chat_url.as_deref()
    }

    /// Current authentication provider
    pub fn auth(&self) -> &AuthProvider {
        &self.auth
    }

    /// Replace the authentication provider.
    ///
    /// Called after login to start attaching the bearer token, and after
    /// logout (with [`AuthProvider::none`]) to stop attaching it.
    pub fn set_auth(&mut self, auth: AuthProvider) {
        self.auth = auth;
    }

    /// Whether requests currently carry a bearer token
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a non-2xx response into a [`LinkError`].
    ///
    /// Decodes the body as [`ApiError`] when the server sent one, otherwise
    /// carries the raw text.
    pub(crate) async fn error_from_response(response: reqwest::Response) -> LinkError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => api_error.message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body,
        };
        LinkError::from_status(status, message)
    }

    /// Decode a successful response body, or map a failure status into the
    /// error taxonomy.
    pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Check a response for success, discarding any body.
    pub(crate) async fn check(response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    // ==================== Authentication flow ====================

    /// Login with username and password.
    ///
    /// Accounts without a second factor get an access token directly; 2FA
    /// accounts get `two_factor_required = true` plus a challenge token to
    /// pass to [`verify_two_factor`](Self::verify_two_factor). Rejected
    /// credentials surface as [`LinkError::Authentication`].
    ///
    /// # Arguments
    /// * `username` - The username for authentication
    /// * `password` - The password for authentication
    /// * `remember_me` - Ask the server for a long-lived token
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse> {
        let url = self.url("/api/auth/login");
        debug!("[AUTH] Authenticating user '{}' at url={}", username, url);

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me,
        };

        let start = Instant::now();
        let response = self.http_client.post(&url).json(&request).send().await?;
        let status = response.status();
        debug!("[AUTH] Login response received in {:?}, status={}", start.elapsed(), status);

        let login_response: LoginResponse = Self::decode(response).await?;

        if login_response.two_factor_required {
            debug!("[AUTH] User '{}' requires a second factor", username);
        } else {
            debug!("[AUTH] User '{}' authenticated in {:?}", username, start.elapsed());
        }

        Ok(login_response)
    }

    /// Exchange a 2FA challenge plus a one-time code for an access token.
    ///
    /// `use_backup_code` switches verification to the account's single-use
    /// backup codes. An invalid or expired code surfaces as
    /// [`LinkError::Authentication`].
    pub async fn verify_two_factor(
        &self,
        challenge_token: &str,
        code: &str,
        use_backup_code: bool,
    ) -> Result<LoginResponse> {
        let url = self.url("/api/auth/2fa/verify");
        debug!("[AUTH] Verifying second factor at url={} backup={}", url, use_backup_code);

        let request = TwoFactorRequest {
            challenge_token: challenge_token.to_string(),
            code: code.to_string(),
            use_backup_code,
        };

        let start = Instant::now();
        let response = self.http_client.post(&url).json(&request).send().await?;
        debug!(
            "[AUTH] 2FA response received in {:?}, status={}",
            start.elapsed(),
            response.status()
        );

        Self::decode(response).await
    }

    /// Invalidate the current token server-side.
    ///
    /// Local session state is the caller's to clear; this only tells the
    /// server to revoke the token.
    pub async fn logout(&self) -> Result<()> {
        let url = self.url("/api/auth/logout");
        debug!("[AUTH] Logging out at url={}", url);

        let request = self.auth.apply_to_request(self.http_client.post(&url))?;
        let response = request.send().await?;
        Self::check(response).await
    }

    /// Ask the server to email a password reset token.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let url = self.url("/api/auth/password-reset/request");
        debug!("[AUTH] Requesting password reset at url={}", url);

        let request = crate::models::PasswordResetRequest {
            email: email.to_string(),
        };
        let response = self.http_client.post(&url).json(&request).send().await?;
        Self::check(response).await
    }

    /// Redeem a password reset token for a new password.
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> Result<()> {
        let url = self.url("/api/auth/password-reset/confirm");
        debug!("[AUTH] Confirming password reset at url={}", url);

        let request = crate::models::PasswordResetConfirm {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let response = self.http_client.post(&url).json(&request).send().await?;
        Self::check(response).await
    }
}

/// Builder for configuring [`MonetaClient`] instances.
pub struct MonetaClientBuilder {
    base_url: Option<String>,
    chat_url: Option<String>,
    timeout: Duration,
    auth: AuthProvider,
}

impl MonetaClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            chat_url: None,
            timeout: Duration::from_secs(30),
            auth: AuthProvider::none(),
        }
    }

    /// Set the base URL for the Moneta API server
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(trim_trailing_slash(url.into()));
        self
    }

    /// Set the origin of the support chat service.
    ///
    /// The chat service runs on a distinct origin from the main API; leave
    /// unset when the deployment has no chat backend.
    pub fn chat_url(mut self, url: impl Into<String>) -> Self {
        self.chat_url = Some(trim_trailing_slash(url.into()));
        self
    }

    /// Set request timeout (for HTTP requests)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthProvider::bearer(token.into());
        self
    }

    /// Set authentication provider directly
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MonetaClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| LinkError::Configuration("base_url is required".into()))?;

        // Build HTTP client with connection pooling for better throughput
        // Keep-alive connections reduce TCP handshake overhead significantly
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| LinkError::Configuration(e.to_string()))?;

        Ok(MonetaClient {
            base_url,
            chat_url: self.chat_url,
            http_client,
            auth: self.auth,
        })
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
