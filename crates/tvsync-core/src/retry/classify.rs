//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        500 | 502 | 503 | 504 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
///
/// Any transfer failure is worth another attempt. Only errors in building the
/// request itself (bad URL, unsupported scheme, bad option) are final.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_url_malformed()
        || e.is_unsupported_protocol()
        || e.is_failed_init()
        || e.code() == 4 // CURLE_NOT_BUILT_IN; curl::Error has no is_not_built_in()
        || e.is_bad_function_argument()
        || e.is_unknown_option()
    {
        return ErrorKind::Other;
    }
    ErrorKind::Connection
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
    }
}
