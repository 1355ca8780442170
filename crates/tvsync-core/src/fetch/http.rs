//! Single HTTP GET attempt using the curl crate (libcurl).

use std::time::Duration;

use crate::retry::FetchError;

const MAX_REDIRECTS: u32 = 10;

/// Performs one GET and returns the body. Any status other than 200 is an
/// error so the retry loop can classify it.
///
/// `timeout` bounds the connect and any stall in the transfer, not the whole
/// download; a slow but steady body is allowed to finish.
pub fn get(url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(timeout)?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(timeout)?;
    easy.accept_encoding("")?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code != 200 {
        return Err(FetchError::Http(code));
    }
    Ok(body)
}
