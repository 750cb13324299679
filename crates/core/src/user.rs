//! Mock-authenticated users.
//!
//! There is no password or server-side verification: logging in simply
//! records who the device says it is.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserType};

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Email,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub business_name: Option<String>,
}

impl LoginRequest {
    /// Build the user this login describes.
    ///
    /// Business accounts start without an active subscription; consumer
    /// accounts never carry one and never carry a business name.
    #[must_use]
    pub fn into_user(self) -> AuthUser {
        let is_business = self.user_type == UserType::Business;
        let business_name = self
            .business_name
            .map(|n| n.trim().to_owned())
            .filter(|n| is_business && !n.is_empty());

        AuthUser {
            id: UserId::generate(),
            email: self.email,
            name: self.name.trim().to_owned(),
            user_type: self.user_type,
            business_name,
            subscription_active: is_business.then_some(false),
            profile_picture: None,
        }
    }
}

/// Persisted auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<AuthUser>,
    pub is_authenticated: bool,
}

impl Session {
    /// A session for a freshly logged-in user.
    #[must_use]
    pub const fn logged_in(user: AuthUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    /// Set the subscription flag.
    ///
    /// Returns `false` (and changes nothing) unless a business user is
    /// logged in.
    pub fn set_subscription(&mut self, active: bool) -> bool {
        match self.user.as_mut() {
            Some(user) if user.user_type == UserType::Business => {
                user.subscription_active = Some(active);
                true
            }
            _ => false,
        }
    }

    /// Replace the profile picture. Returns `false` when nobody is logged in.
    pub fn set_profile_picture(&mut self, picture: String) -> bool {
        match self.user.as_mut() {
            Some(user) => {
                user.profile_picture = Some(picture);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login(user_type: UserType, business_name: Option<&str>) -> LoginRequest {
        LoginRequest {
            email: Email::parse("owner@example.com").unwrap(),
            name: " Sarah Martinez ".to_owned(),
            user_type,
            business_name: business_name.map(str::to_owned),
        }
    }

    #[test]
    fn test_business_login_starts_unsubscribed() {
        let user = login(UserType::Business, Some("Fort Worth Eats")).into_user();
        assert_eq!(user.name, "Sarah Martinez");
        assert_eq!(user.business_name.as_deref(), Some("Fort Worth Eats"));
        assert_eq!(user.subscription_active, Some(false));
    }

    #[test]
    fn test_consumer_login_ignores_business_name() {
        let user = login(UserType::Consumer, Some("Fort Worth Eats")).into_user();
        assert!(user.business_name.is_none());
        assert!(user.subscription_active.is_none());
    }

    #[test]
    fn test_set_subscription_only_for_business() {
        let mut consumer = Session::logged_in(login(UserType::Consumer, None).into_user());
        assert!(!consumer.set_subscription(true));

        let mut business =
            Session::logged_in(login(UserType::Business, Some("Spa Luxe")).into_user());
        assert!(business.set_subscription(true));
        assert_eq!(business.user.unwrap().subscription_active, Some(true));

        assert!(!Session::default().set_subscription(true));
    }

    #[test]
    fn test_set_profile_picture_requires_login() {
        assert!(!Session::default().set_profile_picture("x".to_owned()));
    }

    #[test]
    fn test_user_type_field_name() {
        let user = login(UserType::Business, Some("Spa Luxe")).into_user();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["type"], "business");
        assert_eq!(json["businessName"], "Spa Luxe");
    }
}
