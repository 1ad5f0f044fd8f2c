//! Most of the structs in `web` module and their implementations live here.
//! Includes structs that need to be validated, their parsing implementations and tests for those

use serde::Serialize;
use serde_json::Value;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is empty or is missing an '@'")]
    EmailInvalid,
}

// ###################################
// ->   STRUCTS
// ###################################
/// The subscription as it arrives from the form.
/// Built from any JSON document, fields are coerced and can still be invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserSubscription {
    pub email: String,
    pub weekend: bool,
}

/// Validated Subscription
#[derive(Debug, Clone)]
pub struct ValidSubscription {
    pub email: ValidEmail,
    pub weekend: bool,
}

/// Validated Subscriber Email
/// Only non-emptiness and the presence of an '@' are checked, the provider does the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

/// The body of every JSON response this service sends.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: String,
}

// ###################################
// ->   IMPLS
// ###################################
impl DeserSubscription {
    /// Extracts `email` and `weekend` from an untrusted JSON document.
    /// Never fails: anything that isn't an object simply has no fields.
    pub fn from_json(value: &Value) -> Self {
        let email = value
            .get("email")
            .map(coerce_to_string)
            .unwrap_or_default()
            .trim_matches(is_js_whitespace)
            .to_string();
        let weekend = value.get("weekend").is_some_and(is_truthy);

        Self { email, weekend }
    }
}

impl TryFrom<DeserSubscription> for ValidSubscription {
    type Error = DataParsingError;

    fn try_from(deser_sub: DeserSubscription) -> Result<Self, Self::Error> {
        Ok(ValidSubscription {
            email: ValidEmail::parse(deser_sub.email)?,
            weekend: deser_sub.weekend,
        })
    }
}

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() || !value.contains('@') {
            return Err(DataParsingError::EmailInvalid);
        }

        Ok(ValidEmail(value.to_owned()))
    }
}

impl ApiResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ###################################
// ->   COERCION
// ###################################
/// `null`, `false`, `0` and `""` are falsy, everything else is truthy.
/// Note that the string `"false"` is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turns a form value into text the way a browser script would.
/// Falsy values become an empty string.
pub fn coerce_to_string(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    to_js_string(value)
}

fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_js_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Unicode whitespace plus the byte order mark, which browsers also trim.
fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}
