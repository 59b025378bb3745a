//! Registration naming convention
//!
//! A config repo ID is derived from an optional prefix and the repository
//! name: `"{prefix}-{name}"`, or just `name` when no prefix is configured.
//! The mapping must be reversible so that registrations can be traced back to
//! the repository that produced them.

use std::fmt;

/// Optional prefix applied to every registration ID managed by this seeder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationPrefix(Option<String>);

impl RegistrationPrefix {
    /// Creates a prefix; an empty string means "no prefix"
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            Self(None)
        } else {
            Self(Some(prefix))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// Computes the registration ID for a repository name
    pub fn registration_id(&self, repository_name: &str) -> String {
        match &self.0 {
            Some(prefix) => format!("{prefix}-{repository_name}"),
            None => repository_name.to_string(),
        }
    }

    /// Recovers the repository name from a registration ID
    ///
    /// Returns `None` when the ID was not produced under this prefix, in which
    /// case the registration belongs to someone else.
    pub fn repository_name<'a>(&self, registration_id: &'a str) -> Option<&'a str> {
        let name = match &self.0 {
            Some(prefix) => registration_id
                .strip_prefix(prefix.as_str())?
                .strip_prefix('-')?,
            None => registration_id,
        };

        (!name.is_empty()).then_some(name)
    }
}

impl fmt::Display for RegistrationPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(""))
    }
}

impl From<Option<String>> for RegistrationPrefix {
    fn from(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_id_with_prefix() {
        let prefix = RegistrationPrefix::new("team");
        assert_eq!(prefix.registration_id("svcA"), "team-svcA");
    }

    #[test]
    fn test_registration_id_without_prefix() {
        assert_eq!(RegistrationPrefix::none().registration_id("svcA"), "svcA");
        assert_eq!(RegistrationPrefix::new("").registration_id("svcA"), "svcA");
    }

    #[test]
    fn test_repository_name_inverts_registration_id() {
        let prefix = RegistrationPrefix::new("team");
        for name in ["svcA", "with-dashes", "team"] {
            let id = prefix.registration_id(name);
            assert_eq!(prefix.repository_name(&id), Some(name));
        }
    }

    #[test]
    fn test_foreign_ids_do_not_parse() {
        let prefix = RegistrationPrefix::new("team");
        assert_eq!(prefix.repository_name("other-svcA"), None);
        assert_eq!(prefix.repository_name("teamsvcA"), None);
        assert_eq!(prefix.repository_name("team-"), None);
        assert_eq!(prefix.repository_name("svcA"), None);
    }

    #[test]
    fn test_without_prefix_every_id_is_managed() {
        let prefix = RegistrationPrefix::none();
        assert_eq!(prefix.repository_name("team-svcA"), Some("team-svcA"));
        assert_eq!(prefix.repository_name(""), None);
    }
}
