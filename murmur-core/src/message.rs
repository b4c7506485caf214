//! Anonymous message content

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

/// Minimum length of a message in characters (after trimming).
pub const MESSAGE_MIN_LEN: usize = 10;
/// Maximum length of a message in characters (after trimming).
pub const MESSAGE_MAX_LEN: usize = 300;

/// The validated text of an anonymous message.
///
/// Surrounding whitespace is trimmed before the length bounds are checked,
/// so a message made of whitespace only is empty.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Eq, PartialEq)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent {
    #[validate(length(min = 10, max = 300))]
    inner: String,
}

impl TryFrom<String> for MessageContent {
    type Error = ValidationErrors;

    fn try_from(content: String) -> Result<Self, ValidationErrors> {
        let content = Self {
            inner: content.trim().to_string(),
        };
        content.validate()?;
        Ok(content)
    }
}

impl FromStr for MessageContent {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, ValidationErrors> {
        Self::try_from(s.to_string())
    }
}

impl From<MessageContent> for String {
    fn from(content: MessageContent) -> Self {
        content.inner
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl MessageContent {
    /// The trimmed message text.
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_content_rejected() {
        assert_matches!("".parse::<MessageContent>(), Err(_));
        assert_matches!("           ".parse::<MessageContent>(), Err(_));
    }

    #[test]
    fn test_length_bounds() {
        let shortest = "x".repeat(MESSAGE_MIN_LEN);
        let longest = "x".repeat(MESSAGE_MAX_LEN);

        assert_matches!(shortest[1..].parse::<MessageContent>(), Err(_));
        assert_matches!(shortest.parse::<MessageContent>(), Ok(_));
        assert_matches!(longest.parse::<MessageContent>(), Ok(_));
        assert_matches!(format!("{longest}x").parse::<MessageContent>(), Err(_));
    }

    #[test]
    fn test_content_is_trimmed() {
        let content: MessageContent = "   what's your favourite book?  \n".parse().unwrap();
        assert_eq!(content.as_str(), "what's your favourite book?");
    }
}
