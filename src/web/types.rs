//! Most of the structs in `web` module and their implementations live here.
//! Includes structs that need to be validated, their parsing implementations and tests for those

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Subscriber
/// The raw signup form, `email` may be missing or invalid.
#[derive(Debug, Deserialize)]
pub struct DeserSubscriber {
    pub email: Option<String>,
}

impl TryFrom<DeserSubscriber> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(deser_sub: DeserSubscriber) -> Result<Self, Self::Error> {
        match deser_sub.email {
            Some(email) => ValidEmail::parse(email),
            None => Err(DataParsingError::EmailMissing),
        }
    }
}

/// Validated Subscriber Email
/// Kept exactly as submitted, comparisons go through `normalized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    /// A sanity check, not RFC validation: `local@domain.tld` without whitespace.
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }

    /// The key used for the duplicate check.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

/// Body of a successful subscription.
#[derive(Debug, Serialize)]
pub struct SubscribeSuccess {
    pub success: bool,
    pub message: &'static str,
    pub email: String,
}

impl SubscribeSuccess {
    pub fn new(email: String) -> Self {
        Self {
            success: true,
            message: "Successfully subscribed!",
            email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriberCount {
    pub count: usize,
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum DataParsingError {
    #[error("email missing")]
    EmailMissing,
    #[error("email invalid")]
    EmailInvalid,
}
