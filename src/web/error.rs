use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::model;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] super::types::DataParsingError),
    #[error("request body rejected: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("model error: {0}")]
    Model(#[from] model::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use super::types::DataParsingError;
        use ClientError::*;

        match self {
            Error::DataParsing(DataParsingError::EmailMissing) => {
                (StatusCode::BAD_REQUEST, EmailRequired)
            }
            Error::DataParsing(DataParsingError::EmailInvalid) => {
                (StatusCode::BAD_REQUEST, EmailInvalid)
            }
            Error::JsonBody(_) => (StatusCode::BAD_REQUEST, InvalidBody),
            Error::Model(model::Error::DuplicateEmail(email)) => {
                (StatusCode::CONFLICT, AlreadySubscribed(email.clone()))
            }
            Error::Model(model::Error::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, SaveFailed)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The error as the page sees it. `Display` is the user facing message.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Email is required")]
    EmailRequired,
    #[display("Invalid email format")]
    EmailInvalid,
    #[display("Invalid request body")]
    InvalidBody,
    #[display("Email already subscribed")]
    AlreadySubscribed(String),
    #[display("Failed to save subscription")]
    SaveFailed,
}

impl ClientError {
    /// The submitted email, echoed back on conflicts so the page can show it.
    pub fn email(&self) -> Option<&str> {
        match self {
            ClientError::AlreadySubscribed(email) => Some(email),
            _ => None,
        }
    }
}
