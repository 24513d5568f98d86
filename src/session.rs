//! Session data handed over by the external identity provider.

/// What the identity provider supplies for a signed-in account.
///
/// The token is opaque: only its presence or absence is ever consulted,
/// its contents are never inspected here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthSession {
    account_id: String,
    raw_role: Option<String>,
    token: Option<String>,
}

impl AuthSession {
    /// Create a session for the given account.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            raw_role: None,
            token: None,
        }
    }

    /// Attach the provider's raw role string.
    pub fn with_raw_role(mut self, raw_role: impl Into<String>) -> Self {
        self.raw_role = Some(raw_role.into());
        self
    }

    /// Attach the provider's session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the account identifier.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Get the provider's raw role string, if any.
    pub fn raw_role(&self) -> Option<&str> {
        self.raw_role.as_deref()
    }

    /// Whether a session token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
