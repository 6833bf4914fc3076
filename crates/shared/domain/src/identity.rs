use serde::{Deserialize, Serialize};

/// The signed-in user as the shell sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserIdentity {
    pub username: String,
    pub first_name: Option<String>,
    pub is_admin: bool,
    /// Module to open right after sign-in.
    pub default_module: Option<String>,
}

impl UserIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub const fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    #[must_use]
    pub fn with_default_module(mut self, name: impl Into<String>) -> Self {
        self.default_module = Some(name.into());
        self
    }

    /// First name when present and non-blank, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.username.as_str())
    }
}
