//! Authentication session management with local storage persistence.

use chrono::Utc;
use dioxus::prelude::*;
use keikichi_shared::auth::{Session, SESSION_STORAGE_KEY};
use keikichi_shared::{ApiError, LoginRequest, QueryScope, TokenResponse, User, UserRole};

use crate::api_client::{ApiClient, TokenStore};
use crate::config::ClientConfig;
use crate::hooks::use_query;
use crate::storage;
use crate::stores::clear_pending_hold;

/// Authentication context provided to the app
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: Signal<Session>,
    config: Signal<ClientConfig>,
}

/// Token store backed by the session signal, so a refresh performed by the
/// API client is visible to every component.
#[derive(Clone, Copy)]
struct SessionTokens(Signal<Session>);

impl TokenStore for SessionTokens {
    fn access_token(&self) -> Option<String> {
        self.0.peek().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.0.peek().refresh_token.clone()
    }

    fn store_tokens(&self, access: String, refresh: Option<String>) {
        let mut session = self.0;
        session.write().set_tokens(access, refresh);
    }

    fn clear(&self) {
        let mut session = self.0;
        session.write().clear();
    }
}

/// Provider component that sets up auth context
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let config = use_context::<ClientConfig>();
    let session = use_signal(|| {
        storage::load::<Session>(SESSION_STORAGE_KEY).unwrap_or_default()
    });
    let config = use_signal(move || config);

    // Sync session to storage
    use_effect(move || {
        let current = session.read().clone();
        if current.access_token.is_some() {
            if let Err(e) = storage::save(SESSION_STORAGE_KEY, &current) {
                crate::log_warn!("Failed to persist session: {}", e);
            }
        } else {
            storage::remove(SESSION_STORAGE_KEY);
        }
    });

    let auth = use_context_provider(|| AuthContext { session, config });

    // Re-read the user on start and whenever the account changes server side
    // (e.g. verification approved); a stale role would route wrongly.
    let _current_user = use_query(
        || QueryScope::CurrentUser,
        move || async move { auth.sync_current_user().await },
    );

    children
}

impl AuthContext {
    /// Store the tokens from a login response. The user comes from the
    /// response when present, otherwise from `/auth/me`.
    pub async fn complete_login(&self, token: TokenResponse) -> Result<User, ApiError> {
        let mut session = self.session;
        session.set(Session::from_token_response(token));
        let existing = self.session.peek().user.clone();
        let user = match existing {
            Some(user) => user,
            None => {
                let user = self.client().me().await?;
                self.set_user(user.clone());
                user
            }
        };
        crate::log_info!("Logged in as {} ({:?})", user.email, user.role);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = self.client().login(&req).await?;
        self.complete_login(token).await
    }

    /// Logout and clear session. The server call is best effort.
    pub async fn logout(&self) {
        if let Err(e) = self.client().logout().await {
            crate::log_debug!("Logout request failed: {}", e);
        }
        self.clear();
    }

    pub fn clear(&self) {
        let mut session = self.session;
        session.write().clear();
        clear_pending_hold();
    }

    /// Fetch `/auth/me` into the session. An access token already past its
    /// expiry is refreshed first instead of spending a request on a 401.
    async fn sync_current_user(&self) {
        let (expired, can_refresh) = {
            let session = self.session.peek();
            if session.access_token.is_none() {
                return;
            }
            (session.access_expired(Utc::now()), session.refresh_token.is_some())
        };
        let client = self.client();
        if expired && can_refresh {
            crate::log_debug!("Stored access token expired, refreshing");
            if client.refresh_session().await.is_err() {
                crate::log_info!("Stored session expired");
                return;
            }
        }
        match client.me().await {
            Ok(user) => self.set_user(user),
            Err(ApiError::Unauthorized) => crate::log_info!("Stored session expired"),
            Err(e) => crate::log_warn!("Could not refresh current user: {}", e),
        }
    }

    fn set_user(&self, user: User) {
        let mut session = self.session;
        session.write().user = Some(user);
    }

    /// Create an API client configured for the current session
    pub fn client(&self) -> ApiClient {
        ApiClient::new()
            .with_base_url(self.config.peek().api_base.clone())
            .with_tokens(SessionTokens(self.session))
    }

    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.session.read().user.clone()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.session.read().role()
    }

    pub fn is_staff(&self) -> bool {
        self.session.read().is_staff()
    }

    pub fn config(&self) -> ClientConfig {
        self.config.peek().clone()
    }
}
