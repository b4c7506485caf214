//! Usernames

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

/// A validated username.
///
/// Usernames are the public part of a profile link (`/u/<username>`), so
/// they're restricted to 2 to 20 ASCII letters, digits and underscores.
/// Comparison is case-sensitive.
#[derive(Clone, Serialize, Deserialize, Validate, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username {
    #[validate(length(min = 2, max = 20))]
    #[validate(custom = "allowed_characters")]
    inner: String,
}

impl std::fmt::Debug for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Username").field(&self.inner).finish()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for Username {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, ValidationErrors> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationErrors;

    fn try_from(inner: String) -> Result<Self, ValidationErrors> {
        let username = Self { inner };
        username.validate()?;
        Ok(username)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.inner
    }
}

impl Username {
    /// Get a string reference of this username.
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Consume the username, returning the inner string.
    pub fn into_inner(self) -> String {
        self.inner
    }
}

fn allowed_characters(s: &str) -> Result<(), ValidationError> {
    if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new(
            "only letters, digits and underscores are allowed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_username_too_long() {
        assert_matches!("x2x4x6x810121416182022".parse::<Username>(), Err(_));
    }

    #[test]
    fn test_username_length_limits() {
        assert_matches!("x".parse::<Username>(), Err(_));
        assert_matches!("xx".parse::<Username>(), Ok(_));
        assert_matches!("x2x4x6x8101214161820".parse::<Username>(), Ok(_));
    }

    #[test]
    fn test_username_invalid_characters() {
        assert_matches!("this has spaces".parse::<Username>(), Err(_));
        assert_matches!("Ümlaute".parse::<Username>(), Err(_));
        assert_matches!("dash-ed".parse::<Username>(), Err(_));
        assert_matches!("".parse::<Username>(), Err(_));
    }

    #[test]
    fn test_valid_usernames() {
        assert_matches!("oedipa".parse::<Username>(), Ok(_));
        assert_matches!("Oedipa_Maas".parse::<Username>(), Ok(_));
        assert_matches!("bob22".parse::<Username>(), Ok(_));
        assert_matches!("_underscore".parse::<Username>(), Ok(_));
    }

    #[test]
    fn test_deserialize_validates() {
        let username: Username = serde_json::from_str("\"pierce\"").unwrap();
        assert_eq!(username.as_str(), "pierce");
        assert_eq!(serde_json::to_string(&username).unwrap(), "\"pierce\"");

        assert_matches!(serde_json::from_str::<Username>("\"no spaces\""), Err(_));
    }
}
