use crate::backend::{decode, encode, AuthProvider, DocumentStore};
use crate::clients::AccountError;
use crate::model::{AuthUser, Registration, UserId, UserProfile};
use std::sync::Arc;
use tracing::{info, instrument};

/// Collection holding one profile per account, keyed by uid.
pub const USERS: &str = "users";

/// Sign-up, sign-in and profiles.
///
/// Signing in or out here is all a session needs: the auth follower started
/// by [`StoreSystem::open_session`](crate::lifecycle::StoreSystem::open_session)
/// sees the change and loads or clears the cart.
#[derive(Clone)]
pub struct AccountClient {
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
}

impl AccountClient {
    pub fn new(auth: Arc<dyn AuthProvider>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { auth, documents }
    }

    /// Creates the account, then stores its profile at `users/<uid>`.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<AuthUser, AccountError> {
        let missing: Vec<&str> = [
            ("full name", &registration.full_name),
            ("email", &registration.email),
            ("password", &registration.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(AccountError::InvalidRegistration(missing.join(", ")));
        }

        let user = self
            .auth
            .sign_up(&registration.email, &registration.password)
            .await?;
        self.documents
            .set(USERS, user.uid.as_str(), encode(&registration.profile())?)
            .await?;
        info!(user = %user.uid, "Registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AccountError> {
        let user = self.auth.sign_in(email, password).await?;
        info!(user = %user.uid, "Signed in");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AccountError> {
        self.auth.sign_out().await?;
        info!("Signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.auth.current_user()
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, uid: &UserId) -> Result<Option<UserProfile>, AccountError> {
        match self.documents.get(USERS, uid.as_str()).await? {
            Some(doc) => Ok(Some(decode(&doc)?)),
            None => Ok(None),
        }
    }

    /// Profile of whoever is signed in.
    pub async fn my_profile(&self) -> Result<UserProfile, AccountError> {
        let user = self.current_user().ok_or(AccountError::NotSignedIn)?;
        self.profile(&user.uid)
            .await?
            .ok_or(AccountError::NotSignedIn)
    }
}
