// ── User service ──
//
// Tracks the current logged-in user in response to bus events and
// resolves users by id or username. 401 challenges from the API are
// re-published on the bus as `authenticationError`.

use std::future::Future;
use std::sync::{Arc, Weak};

use serde_json::json;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use login_api::transport::{TlsMode, TransportConfig};
use login_api::{User, UsersClient};

use crate::bus::{AppEvent, EventBus, EventSubscription};
use crate::config::{ServiceConfig, TlsVerification};
use crate::error::CoreError;
use crate::stream::UserStream;

// ── UserService ──────────────────────────────────────────────────

/// Current-user tracking and user lookups.
///
/// Cheaply cloneable via `Arc<UserServiceInner>`. The current-user slot
/// is written only by the login/logout handlers (and [`reset_user`]);
/// everyone else observes it through [`logged_in_user()`].
///
/// [`reset_user`]: Self::reset_user
/// [`logged_in_user()`]: Self::logged_in_user
#[derive(Clone)]
pub struct UserService {
    inner: Arc<UserServiceInner>,
}

struct UserServiceInner {
    client: UsersClient,
    bus: Arc<dyn EventBus>,
    current: watch::Sender<Option<Arc<User>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for UserServiceInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl UserService {
    /// Create a service with an empty current-user slot. Does NOT listen
    /// for bus events -- use [`start()`](Self::start) for that.
    pub fn new(client: UsersClient, bus: Arc<dyn EventBus>) -> Self {
        let (current, _) = watch::channel(None);

        Self {
            inner: Arc::new(UserServiceInner {
                client,
                bus,
                current,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Build the API client from a [`ServiceConfig`] and create the service.
    pub fn from_config(config: &ServiceConfig, bus: Arc<dyn EventBus>) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = UsersClient::new(config.api_url.as_str(), &transport)?;
        Ok(Self::new(client, bus))
    }

    /// Create a service and start reacting to `loggedin` / `logout`.
    ///
    /// The bus subscription exists before this returns, so events
    /// published afterwards are never missed.
    pub async fn start(client: UsersClient, bus: Arc<dyn EventBus>) -> Self {
        let service = Self::new(client, bus);
        service.listen().await;
        service
    }

    /// Spawn the session listener task. No-op if one is already running.
    pub async fn listen(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return;
        }

        let events = self
            .inner
            .bus
            .subscribe_all(&[AppEvent::LoggedIn.as_ref(), AppEvent::Logout.as_ref()]);
        handles.push(tokio::spawn(session_listener_task(
            Arc::downgrade(&self.inner),
            events,
            self.inner.cancel.clone(),
        )));
        info!("user service listening for session events");
    }

    /// Stop the listener task and wait for it to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("user service stopped");
    }

    /// The underlying API client.
    pub fn client(&self) -> &UsersClient {
        &self.inner.client
    }

    // ── Session handling ─────────────────────────────────────────

    /// Fetch the current user and publish it to subscribers.
    ///
    /// Runs on every `loggedin` event. On failure the previous value is
    /// left in place.
    pub async fn handle_logged_in(&self) -> Result<Arc<User>, CoreError> {
        let user = Arc::new(self.guarded(self.inner.client.current_user()).await?);
        debug!(user_id = %user.id, "logged-in user loaded");
        self.inner.current.send_replace(Some(Arc::clone(&user)));
        Ok(user)
    }

    /// Clear the current user. Runs on every `logout` event.
    pub fn handle_logout(&self) {
        debug!("clearing logged-in user");
        self.inner.current.send_replace(None);
    }

    /// Forget the current user without a `logout` event.
    pub fn reset_user(&self) {
        self.inner.current.send_replace(None);
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to current-user changes.
    pub fn logged_in_user(&self) -> UserStream {
        UserStream::new(self.inner.current.subscribe())
    }

    /// The current user, if someone is logged in.
    pub fn current_logged_in_user(&self) -> Option<Arc<User>> {
        self.inner.current.borrow().clone()
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// Resolve a user by id.
    pub async fn get_user_by_user_id(&self, id: &str) -> Result<User, CoreError> {
        self.guarded(self.inner.client.user_by_id(id))
            .await
            .map_err(|e| match e {
                CoreError::UserNotFound { .. } => CoreError::UserNotFound {
                    identifier: id.to_owned(),
                },
                other => other,
            })
    }

    /// Resolve a user by exact username. `Ok(None)` when nobody matches.
    ///
    /// Usernames may be email addresses; the client percent-encodes them.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let users = self
            .guarded(self.inner.client.users_by_username(username))
            .await?;
        Ok(find_by_username(users, username))
    }

    /// List every user visible to the caller.
    pub async fn get_all_users(&self) -> Result<Vec<User>, CoreError> {
        self.guarded(self.inner.client.list_users()).await
    }

    /// Free-text user search.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, CoreError> {
        self.guarded(self.inner.client.search_users(query)).await
    }

    /// Ask the API to send the current user a new verification email.
    pub async fn send_email_verification_link(&self) -> Result<(), CoreError> {
        self.guarded(self.inner.client.send_email_verification_link())
            .await
    }

    // ── Error translation ────────────────────────────────────────

    /// Await an API call, broadcasting `authenticationError` when it
    /// fails with a 401 challenge.
    async fn guarded<T>(
        &self,
        request: impl Future<Output = Result<T, login_api::Error>>,
    ) -> Result<T, CoreError> {
        request.await.map_err(|e| self.translate(e))
    }

    fn translate(&self, err: login_api::Error) -> CoreError {
        if let login_api::Error::AuthenticationChallenge { ref challenge } = err {
            warn!(%challenge, "authentication challenge from identity API");
            self.inner.bus.publish(
                AppEvent::AuthenticationError.as_ref(),
                json!({ "challenge": challenge }),
            );
        } else {
            debug!(
                status = ?err.status(),
                not_found = err.is_not_found(),
                error = %err,
                "identity API call failed"
            );
        }
        CoreError::from(err)
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// React to `loggedin` / `logout` in publish order.
///
/// Holds only a weak reference; the task exits once the last
/// `UserService` clone is dropped.
async fn session_listener_task(
    owner: Weak<UserServiceInner>,
    mut events: EventSubscription,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                let Some(inner) = owner.upgrade() else { break };
                let service = UserService { inner };
                match event.kind() {
                    Some(AppEvent::LoggedIn) => {
                        if let Err(e) = service.handle_logged_in().await {
                            warn!(error = %e, "failed to load logged-in user");
                        }
                    }
                    Some(AppEvent::Logout) => service.handle_logout(),
                    _ => {}
                }
            }
        }
    }
    debug!("session listener stopped");
}

// ── Helpers ──────────────────────────────────────────────────────

/// Exact, case-sensitive username match.
fn find_by_username(users: Vec<User>, username: &str) -> Option<User> {
    users.into_iter().find(|u| u.username() == username)
}

/// Build a [`TransportConfig`] from the service configuration.
fn build_transport(config: &ServiceConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        token: config.token.clone(),
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::find_by_username;
    use login_api::{User, UserAttributes};

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.into(),
            kind: "userType".into(),
            attributes: UserAttributes {
                username: username.into(),
                ..UserAttributes::default()
            },
        }
    }

    #[test]
    fn username_match_is_exact() {
        let users = vec![user("1", "secondUser"), user("2", "secondUserX")];
        let found = find_by_username(users.clone(), "secondUser").map(|u| u.id);
        assert_eq!(found.as_deref(), Some("1"));

        assert!(find_by_username(users.clone(), "seconduser").is_none());
        assert!(find_by_username(users, "second").is_none());
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(find_by_username(Vec::new(), "anyone").is_none());
    }
}
