//! Demo-mode authentication.
//!
//! Every sign-in path is accepted for display only: the caller always gets
//! a [`AuthNotice`] and stays on the guest account.

use serde::{Deserialize, Serialize};
use shop_commerce::UserId;

use crate::error::AssistantError;

/// Title of every demo notice.
pub const DEMO_NOTICE_TITLE: &str = "Demo Mode";

/// Third-party sign-in providers shown on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    X,
    Facebook,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 3] =
        [SocialProvider::Google, SocialProvider::X, SocialProvider::Facebook];

    pub fn display_name(&self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::X => "X",
            SocialProvider::Facebook => "Facebook",
        }
    }

    /// Parse a provider name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Some(SocialProvider::Google),
            "x" | "twitter" => Some(SocialProvider::X),
            "facebook" => Some(SocialProvider::Facebook),
            _ => None,
        }
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Email/password login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AssistantError> {
        validate_email(&self.email)?;
        require("password", &self.password)
    }
}

/// Account creation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AssistantError> {
        require("name", &self.name)?;
        validate_email(&self.email)?;
        require("password", &self.password)
    }
}

fn require(field: &str, value: &str) -> Result<(), AssistantError> {
    if value.trim().is_empty() {
        return Err(AssistantError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AssistantError> {
    require("email", email)?;
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AssistantError::Validation(format!(
            "invalid email address: {}",
            email
        ))),
    }
}

/// Toast-style message returned by every auth action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthNotice {
    pub title: String,
    pub description: String,
}

impl AuthNotice {
    fn demo(description: impl Into<String>) -> Self {
        Self {
            title: DEMO_NOTICE_TITLE.to_string(),
            description: description.into(),
        }
    }
}

/// Profile shown in the account menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// The fixed guest account.
    pub fn guest() -> Self {
        Self {
            id: UserId::new("u-guest"),
            name: "Guest User".to_string(),
            email: "guest@shopsmart.com".to_string(),
            avatar: None,
        }
    }

    /// Initials for an avatar placeholder.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// The signed-in user with activity counts for the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub favorites: usize,
    pub viewed: usize,
    pub chats: usize,
}

/// Authentication surface that never signs anyone in.
#[derive(Debug, Clone)]
pub struct DemoAuth {
    guest: User,
}

impl Default for DemoAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoAuth {
    pub fn new() -> Self {
        Self { guest: User::guest() }
    }

    /// The signed-in user, always the guest.
    pub fn current_user(&self) -> &User {
        &self.guest
    }

    pub fn login(&self, request: &LoginRequest) -> Result<AuthNotice, AssistantError> {
        request.validate()?;
        tracing::info!(event = "auth_attempt", method = "login", "demo login");
        Ok(AuthNotice::demo(
            "Login is not available in demo mode. You are using a guest account.",
        ))
    }

    pub fn signup(&self, request: &SignupRequest) -> Result<AuthNotice, AssistantError> {
        request.validate()?;
        tracing::info!(event = "auth_attempt", method = "signup", "demo signup");
        Ok(AuthNotice::demo(
            "Signup is not available in demo mode. You are using a guest account.",
        ))
    }

    pub fn social_login(&self, provider: SocialProvider) -> AuthNotice {
        tracing::info!(
            event = "auth_attempt",
            method = "social",
            provider = provider.display_name(),
            "demo social login"
        );
        AuthNotice::demo(format!(
            "{} login is not available in demo mode. You are using a guest account.",
            provider.display_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_returns_demo_notice() {
        let auth = DemoAuth::new();
        let notice = auth
            .login(&LoginRequest::new("me@example.com", "hunter2"))
            .unwrap();
        assert_eq!(notice.title, "Demo Mode");
        assert!(notice.description.contains("guest account"));
        assert_eq!(auth.current_user(), &User::guest());
    }

    #[test]
    fn test_forms_are_validated() {
        let auth = DemoAuth::new();
        assert!(matches!(
            auth.login(&LoginRequest::new("not-an-email", "pw")),
            Err(AssistantError::Validation(_))
        ));
        assert!(matches!(
            auth.signup(&SignupRequest::new(" ", "me@example.com", "pw")),
            Err(AssistantError::Validation(msg)) if msg.contains("name")
        ));
        assert!(auth
            .signup(&SignupRequest::new("Ada", "ada@example.com", "pw"))
            .is_ok());
    }

    #[test]
    fn test_social_notice_names_provider() {
        let notice = DemoAuth::new().social_login(SocialProvider::Facebook);
        assert_eq!(
            notice.description,
            "Facebook login is not available in demo mode. You are using a guest account."
        );
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(SocialProvider::parse("Google"), Some(SocialProvider::Google));
        assert_eq!(SocialProvider::parse("twitter"), Some(SocialProvider::X));
        assert_eq!(SocialProvider::parse("myspace"), None);
    }

    #[test]
    fn test_guest_initials() {
        assert_eq!(User::guest().initials(), "GU");
    }

    #[test]
    fn test_guest_email() {
        assert_eq!(DemoAuth::new().current_user().email, "guest@shopsmart.com");
    }
}
