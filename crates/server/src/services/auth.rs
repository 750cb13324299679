//! Mock authentication store.
//!
//! Holds the single logged-in session for this device and mirrors it to the
//! `auth_data` blob. Nothing is verified server-side.

use perkpass_core::{LoginRequest, Session, UserId};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::services::profile::validate_picture;
use crate::storage::{AUTH_KEY, Storage};

/// Session store backed by blob storage.
#[derive(Debug)]
pub struct AuthService {
    storage: Storage,
    session: RwLock<Session>,
}

impl AuthService {
    /// Restore the persisted session, or start logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub async fn load(storage: Storage) -> Result<Self> {
        let session = storage.load_json(AUTH_KEY).await?.unwrap_or_default();
        Ok(Self {
            storage,
            session: RwLock::new(session),
        })
    }

    /// Current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Log in as whoever the request says. Replaces any existing session.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the session cannot be saved.
    #[instrument(skip(self, request), fields(email = %request.email, user_type = %request.user_type))]
    pub async fn login(&self, request: LoginRequest) -> Result<Session> {
        if request.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }

        let user = request.into_user();
        let next = Session::logged_in(user.clone());

        let mut session = self.session.write().await;
        self.storage.set_json(AUTH_KEY, &next).await?;
        *session = next;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(session.clone())
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Session> {
        let mut session = self.session.write().await;
        let next = Session::default();
        self.storage.set_json(AUTH_KEY, &next).await?;
        *session = next;
        clear_sentry_user();
        tracing::info!("User logged out");
        Ok(session.clone())
    }

    /// Set the logged-in business user's subscription flag. Does nothing for
    /// consumers or when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be saved.
    #[instrument(skip(self))]
    pub async fn update_subscription(&self, active: bool) -> Result<Session> {
        let mut session = self.session.write().await;
        let mut next = session.clone();
        if next.set_subscription(active) {
            self.storage.set_json(AUTH_KEY, &next).await?;
            *session = next;
        } else {
            tracing::debug!("No business user logged in; subscription unchanged");
        }
        Ok(session.clone())
    }

    /// Replace the profile picture of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for an unacceptable picture and
    /// [`AppError::Unauthorized`] unless `user_id` is the logged-in user.
    #[instrument(skip(self, picture), fields(picture_len = picture.len()))]
    pub async fn update_profile_picture(&self, user_id: &UserId, picture: &str) -> Result<String> {
        let picture = validate_picture(picture).map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut session = self.session.write().await;
        let mut next = session.clone();
        let is_current = next.user.as_ref().is_some_and(|u| &u.id == user_id);
        if !is_current || !next.set_profile_picture(picture.clone()) {
            return Err(AppError::Unauthorized(format!("{user_id} is not logged in")));
        }
        self.storage.set_json(AUTH_KEY, &next).await?;
        *session = next;
        tracing::info!(%user_id, "Profile picture updated");
        Ok(picture)
    }
}
