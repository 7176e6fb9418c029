use std::fmt::{Display, Formatter};

use crossterm::style::{Color, Stylize};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error body returned by both the auth provider and the outline backend.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn new(message: String, status_code: StatusCode) -> Self {
        Self {
            message,
            status_code: status_code.as_u16(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\nMessage: {}",
            self.status().to_string().bold(),
            self.message.to_string().with(Color::Red)
        )
    }
}

impl std::error::Error for ApiError {}

// Used as a fallback when an API response did not contain a serialized ApiError
impl From<StatusCode> for ApiError {
    fn from(code: StatusCode) -> Self {
        let message = match code {
            StatusCode::UNAUTHORIZED => "you are not signed in, or your session has expired",
            StatusCode::FORBIDDEN => {
                "this action is not allowed for your role in the active organization"
            }
            StatusCode::NOT_FOUND => "the organization, invitation or record no longer exists",
            StatusCode::BAD_REQUEST => {
                warn!("got a BAD_REQUEST response without an error body");
                "this request is invalid"
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                "the server was unable to handle your request, please try again"
            }
            StatusCode::SERVICE_UNAVAILABLE => "the server is unavailable right now",
            _ => {
                error!(%code, "got an unexpected status code");
                "an unexpected error occurred"
            }
        };

        Self {
            message: message.to_string(),
            status_code: code.as_u16(),
        }
    }
}
