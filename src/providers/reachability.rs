//! Generic HTTP reachability probe.

use crate::fetch::BoundedFetcher;
use crate::status::Severity;

use super::CheckResult;

/// Maps an HTTP status code to a human-readable state.
///
/// `0` stands for "no response at all" and is reported as down.
pub fn describe_code(code: u16) -> String {
    match code {
        200 => Severity::Ok.state(code),
        301 | 302 | 307 | 308 => Severity::Ok.state(format!("Redirect {}", code)),
        401 | 403 | 404 => Severity::Warn.state(code),
        _ => Severity::Down.state(code),
    }
}

/// Issues a GET against `address` with the fetcher's default timeout.
///
/// Any transport failure, including the timeout, is reported as code `0`.
pub async fn check_reachability(fetcher: &BoundedFetcher, address: &str) -> CheckResult {
    let code = match fetcher.get_status(address, None).await {
        Ok(code) => code,
        Err(e) => {
            log::debug!("Reachability probe of {} failed: {}", address, e);
            0
        }
    };
    CheckResult::new(Some(code), describe_code(code))
}
