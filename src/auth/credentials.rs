/// Effective credentials used for one authentication round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub user_id: String,
    pub password: String,
}

/// Per-call credential overrides.
///
/// A field wins over the manager default only when it is `Some` and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialOverrides {
    pub account: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
}

impl CredentialOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl Credentials {
    pub fn new(
        account: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Apply overrides on top of these defaults.
    pub fn resolve(&self, overrides: Option<&CredentialOverrides>) -> Credentials {
        let Some(overrides) = overrides else {
            return self.clone();
        };
        Credentials {
            account: pick(overrides.account.as_deref(), &self.account),
            user_id: pick(overrides.user_id.as_deref(), &self.user_id),
            password: pick(overrides.password.as_deref(), &self.password),
        }
    }
}

fn pick(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_used_without_overrides() {
        let defaults = Credentials::new("acc", "user", "pwd");
        assert_eq!(defaults.resolve(None), defaults);
    }

    #[test]
    fn each_field_overrides_independently() {
        let defaults = Credentials::new("acc", "user", "pwd");
        let overrides = CredentialOverrides::new().account("other");

        let resolved = defaults.resolve(Some(&overrides));
        assert_eq!(resolved, Credentials::new("other", "user", "pwd"));
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let defaults = Credentials::new("acc", "user", "pwd");
        let overrides = CredentialOverrides {
            account: Some(String::new()),
            user_id: Some("u2".into()),
            password: None,
        };

        let resolved = defaults.resolve(Some(&overrides));
        assert_eq!(resolved, Credentials::new("acc", "u2", "pwd"));
    }
}
