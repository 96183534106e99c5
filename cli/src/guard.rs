//! Early-failure helpers shared by the command handlers.

use clap::parser::ValueSource;
use clap::ArgMatches;

use crate::error::CliError;
use crate::http_client::ApiError;

/// Unwrap an API result, turning a failure into [`CliError::Api`]. With
/// `detail` the API's own error text is kept; `msg` is appended after it.
pub fn guard_api<T>(result: Result<T, ApiError>, detail: bool, msg: Option<String>) -> Result<T, CliError> {
    result.map_err(|e| CliError::Api {
        detail: detail.then(|| e.to_string()),
        message: msg,
    })
}

pub fn check(condition: bool, message: impl Into<String>) -> Result<(), CliError> {
    if condition {
        Ok(())
    } else {
        Err(CliError::Check(message.into()))
    }
}

pub fn is_valid_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(u) => !u.scheme().is_empty() && u.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Warn when a renamed flag was still spelled the old way on the command line.
pub fn warn_deprecated_flag(matches: &ArgMatches, id: &str, old_flag: &str, new_flag: &str) -> bool {
    let used = matches.value_source(id) == Some(ValueSource::CommandLine);
    if used {
        eprintln!("Warning: Flag --{old_flag} is deprecated. Use --{new_flag} instead.");
    }
    used
}
