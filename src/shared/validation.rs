use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for object identifiers: exactly 24 hex characters
    /// - Valid: "65f1c2a9e4b0a1b2c3d4e5f6", "65F1C2A9E4B0A1B2C3D4E5F6"
    /// - Invalid: "65f1c2a9", "zzf1c2a9e4b0a1b2c3d4e5f6", " 65f1c2a9e4b0a1b2c3d4e5f6"
    pub static ref OBJECT_ID_REGEX: Regex = Regex::new(r"^[0-9a-fA-F]{24}$").unwrap();

    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_regex() {
        assert!(OBJECT_ID_REGEX.is_match("65f1c2a9e4b0a1b2c3d4e5f6"));
        assert!(OBJECT_ID_REGEX.is_match("65F1C2A9E4B0A1B2C3D4E5F6"));
        assert!(!OBJECT_ID_REGEX.is_match("65f1c2a9")); // too short
        assert!(!OBJECT_ID_REGEX.is_match("65f1c2a9e4b0a1b2c3d4e5f6a")); // too long
        assert!(!OBJECT_ID_REGEX.is_match("zzf1c2a9e4b0a1b2c3d4e5f6")); // not hex
        assert!(!OBJECT_ID_REGEX.is_match(""));
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(!USERNAME_REGEX.is_match("123user"));
        assert!(!USERNAME_REGEX.is_match("user name"));
        assert!(!USERNAME_REGEX.is_match(""));
    }
}
