use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "***REDACTED***";
const BEARER: &str = "Bearer";

/// API key holder. Debug, Display and Serialize all print a redacted marker
/// so the key never reaches logs or echoed settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw key, only for building the Authorization header.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("{} {}", BEARER, self.0)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_redacted_everywhere() {
        let key = SecretString::new("opencti-api-key");
        assert_eq!(format!("{:?}", key), REDACTED);
        assert_eq!(format!("{}", key), REDACTED);
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""***REDACTED***""#);
    }

    #[test]
    fn test_api_key_bearer_header() {
        let key = SecretString::from("abc-123");
        assert_eq!(key.bearer(), "Bearer abc-123");
        assert_eq!(key.expose_secret(), "abc-123");
    }

    #[test]
    fn test_api_key_deserialization() {
        let key: SecretString = serde_json::from_str(r#""from-config""#).unwrap();
        assert_eq!(key.expose_secret(), "from-config");
    }
}
