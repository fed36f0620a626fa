use crate::backend::BackendError;
use crate::model::AuthUser;
use async_trait::async_trait;
use tokio::sync::watch;

/// Email and password accounts.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates the account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    fn current_user(&self) -> Option<AuthUser>;

    /// Auth state as a watch channel. The current value is the signed-in user,
    /// `None` while signed out; every sign-in and sign-out publishes a change.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;
}
