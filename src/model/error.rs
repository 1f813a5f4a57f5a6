//! Error type for remote Web API calls

use rspotify::ClientError;
use rspotify::model::IdError;
use thiserror::Error;

/// Result alias used by every [`RemoteApi`](super::spotify_client::RemoteApi) call
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Ways a remote call can fail.
///
/// None of these reach the user. The controller funnels them through a single
/// boundary logger and carries on with whatever state it already had.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No bearer credential yet, or it expired. The call was never sent.
    #[error("no usable bearer credential")]
    NotReady,

    /// The service refused the command (403), e.g. skip on a free account
    #[error("request refused by the service: {0}")]
    Forbidden(String),

    /// The credential was rejected (401)
    #[error("credential rejected: {0}")]
    Unauthorized(String),

    /// Too many requests (429)
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// A track or playlist identifier could not be parsed
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Any other transport, decoding or server failure
    #[error("remote call failed: {0}")]
    Remote(String),
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        let message = error.to_string();

        // rspotify folds the HTTP status into the message text
        if message.contains("403") {
            ApiError::Forbidden(message)
        } else if message.contains("401") {
            ApiError::Unauthorized(message)
        } else if message.contains("429") {
            ApiError::RateLimited(message)
        } else {
            ApiError::Remote(message)
        }
    }
}
