use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Shape of an idea slug
    /// Lowercase alphanumeric words joined by single hyphens
    /// - Valid: "my-first-idea", "idea", "dark-mode-2"
    /// - Invalid: "-idea", "idea-", "my--idea", "My-Idea", "my_idea"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Reject strings that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("my-first-idea"));
        assert!(SLUG_REGEX.is_match("idea"));
        assert!(SLUG_REGEX.is_match("dark-mode-2"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-idea")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("idea-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("my--idea")); // double hyphen
        assert!(!SLUG_REGEX.is_match("My-Idea")); // uppercase
        assert!(!SLUG_REGEX.is_match("my_idea")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   \t").is_err());
    }
}
