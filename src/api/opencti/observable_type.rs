//! STIX cyber-observable types accepted by `stixCyberObservableAdd`.
//!
//! Each entry maps the STIX type name to the GraphQL argument carrying the
//! type specific input, and to the shape of that input. Supporting a new type
//! means adding a row to [`OBSERVABLE_TYPES`].

use serde_json::{Value, json};

/// Shape of the type specific input built from the single observable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueShape {
    /// `{value}`
    Value,
    /// `{number: int}`
    Number,
    /// `{name}`
    Name,
    /// `{path}`
    Path,
    /// `{pid: int}`
    Pid,
    /// `{account_login}`
    AccountLogin,
    /// `{key}`
    Key,
    /// `{subject, is_multipart: false}`
    EmailMessage,
    /// `{dst_port: int, is_active: false}`
    NetworkTraffic,
    /// `{subject}`
    Subject,
}

#[derive(Clone, Copy, Debug)]
pub struct ObservableType {
    pub stix_type: &'static str,
    pub input_field: &'static str,
    pub shape: ValueShape,
}

const fn entry(stix_type: &'static str, input_field: &'static str, shape: ValueShape) -> ObservableType {
    ObservableType {
        stix_type,
        input_field,
        shape,
    }
}

pub const OBSERVABLE_TYPES: [ObservableType; 27] = [
    entry("Autonomous-System", "AutonomousSystem", ValueShape::Number),
    entry("Bank-Account", "BankAccount", ValueShape::Value),
    entry("Credential", "Credential", ValueShape::Value),
    entry("Cryptocurrency-Wallet", "CryptocurrencyWallet", ValueShape::Value),
    entry("Cryptographic-Key", "CryptographicKey", ValueShape::Value),
    entry("Directory", "Directory", ValueShape::Path),
    entry("Domain-Name", "DomainName", ValueShape::Value),
    entry("Email-Addr", "EmailAddr", ValueShape::Value),
    entry("Email-Message", "EmailMessage", ValueShape::EmailMessage),
    entry("StixFile", "StixFile", ValueShape::Name),
    entry("Hostname", "Hostname", ValueShape::Value),
    entry("IPv4-Addr", "IPv4Addr", ValueShape::Value),
    entry("IPv6-Addr", "IPv6Addr", ValueShape::Value),
    entry("Mac-Addr", "MacAddr", ValueShape::Value),
    entry("Media-Content", "MediaContent", ValueShape::Value),
    entry("Mutex", "Mutex", ValueShape::Value),
    entry("Network-Traffic", "NetworkTraffic", ValueShape::NetworkTraffic),
    entry("Phone-Number", "PhoneNumber", ValueShape::Value),
    entry("Process", "Process", ValueShape::Pid),
    entry("Software", "Software", ValueShape::Name),
    entry("Text", "Text", ValueShape::Value),
    entry("Tracking-Number", "TrackingNumber", ValueShape::Value),
    entry("Url", "Url", ValueShape::Value),
    entry("User-Account", "UserAccount", ValueShape::AccountLogin),
    entry("User-Agent", "UserAgent", ValueShape::Value),
    entry("Windows-Registry-Key", "WindowsRegistryKey", ValueShape::Key),
    entry("X509-Certificate", "X509Certificate", ValueShape::Subject),
];

/// Resolved argument name and shape. Unknown types keep their own name as
/// argument and take a plain `{value}` input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservableInput {
    pub input_field: String,
    pub shape: ValueShape,
}

pub fn resolve(stix_type: &str) -> ObservableInput {
    match OBSERVABLE_TYPES.iter().find(|t| t.stix_type == stix_type) {
        Some(known) => ObservableInput {
            input_field: known.input_field.to_string(),
            shape: known.shape,
        },
        None => ObservableInput {
            input_field: stix_type.to_string(),
            shape: ValueShape::Value,
        },
    }
}

/// Leading integer of `value`, skipping leading whitespace and accepting a
/// sign, so `"443/tcp"` reads as 443. No digits at all gives null.
fn leading_int(value: &str) -> Value {
    let s = value.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    match rest[..digits].parse::<i64>() {
        Ok(n) => Value::from(sign * n),
        // Too many digits for i64 still reads as a number.
        Err(_) if digits > 0 => rest[..digits]
            .parse::<f64>()
            .map(|f| Value::from(sign as f64 * f))
            .unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

impl ValueShape {
    pub fn build(&self, value: &str) -> Value {
        match self {
            ValueShape::Value => json!({ "value": value }),
            ValueShape::Number => json!({ "number": leading_int(value) }),
            ValueShape::Name => json!({ "name": value }),
            ValueShape::Path => json!({ "path": value }),
            ValueShape::Pid => json!({ "pid": leading_int(value) }),
            ValueShape::AccountLogin => json!({ "account_login": value }),
            ValueShape::Key => json!({ "key": value }),
            ValueShape::EmailMessage => json!({ "subject": value, "is_multipart": false }),
            ValueShape::NetworkTraffic => json!({ "dst_port": leading_int(value), "is_active": false }),
            ValueShape::Subject => json!({ "subject": value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Autonomous-System", "64512", "AutonomousSystem", json!({"number": 64512}))]
    #[case("Domain-Name", "example.com", "DomainName", json!({"value": "example.com"}))]
    #[case("IPv4-Addr", "1.2.3.4", "IPv4Addr", json!({"value": "1.2.3.4"}))]
    #[case("StixFile", "evil.exe", "StixFile", json!({"name": "evil.exe"}))]
    #[case("Software", "nginx", "Software", json!({"name": "nginx"}))]
    #[case("Directory", "/tmp", "Directory", json!({"path": "/tmp"}))]
    #[case("Process", "4242", "Process", json!({"pid": 4242}))]
    #[case("User-Account", "root", "UserAccount", json!({"account_login": "root"}))]
    #[case("Windows-Registry-Key", "HKLM\\Run", "WindowsRegistryKey", json!({"key": "HKLM\\Run"}))]
    #[case("Email-Message", "Invoice", "EmailMessage", json!({"subject": "Invoice", "is_multipart": false}))]
    #[case("Network-Traffic", "443", "NetworkTraffic", json!({"dst_port": 443, "is_active": false}))]
    #[case("X509-Certificate", "CN=evil", "X509Certificate", json!({"subject": "CN=evil"}))]
    #[case("Custom-Thing", "v", "Custom-Thing", json!({"value": "v"}))]
    fn test_observable_input_shapes(
        #[case] stix_type: &str,
        #[case] value: &str,
        #[case] expected_field: &str,
        #[case] expected_input: Value,
    ) {
        let input = resolve(stix_type);
        assert_eq!(input.input_field, expected_field);
        assert_eq!(input.shape.build(value), expected_input);
    }

    #[rstest]
    #[case(ValueShape::NetworkTraffic, "443/tcp", json!({"dst_port": 443, "is_active": false}))]
    #[case(ValueShape::Number, " 64512", json!({"number": 64512}))]
    #[case(ValueShape::Number, "64512 AS-EXAMPLE", json!({"number": 64512}))]
    #[case(ValueShape::Pid, "-12abc", json!({"pid": -12}))]
    #[case(ValueShape::Pid, "+7", json!({"pid": 7}))]
    #[case(ValueShape::Number, "AS64512", json!({"number": null}))]
    #[case(ValueShape::Pid, "", json!({"pid": null}))]
    #[case(ValueShape::NetworkTraffic, "-", json!({"dst_port": null, "is_active": false}))]
    fn test_integer_shapes_read_leading_digits(
        #[case] shape: ValueShape,
        #[case] value: &str,
        #[case] expected: Value,
    ) {
        assert_eq!(shape.build(value), expected);
    }

    #[test]
    fn test_table_has_unique_types() {
        for (i, a) in OBSERVABLE_TYPES.iter().enumerate() {
            for b in OBSERVABLE_TYPES.iter().skip(i + 1) {
                assert_ne!(a.stix_type, b.stix_type);
                assert_ne!(a.input_field, b.input_field);
            }
        }
    }
}
