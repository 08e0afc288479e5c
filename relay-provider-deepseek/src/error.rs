//! Internal helpers for mapping HTTP/reqwest failures to [`RelayError`].

use relay_types::RelayError;

/// Map a non-2xx HTTP status (and its body text) to [`RelayError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> RelayError {
    RelayError::UpstreamHttp {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Map a [`reqwest::Error`] (connect, DNS, TLS, body read) to [`RelayError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RelayError {
    RelayError::Connection(Box::new(err))
}
