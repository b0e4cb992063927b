use crate::commands::{load_config, CommandResult};
use shopcart_core::identity::issue_token;

/// Mints a bearer token for `email`, valid for `ttl_secs` or the configured default.
pub fn run(email: &str, ttl_secs: Option<u64>) -> CommandResult {
    let config = match load_config("token") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let ttl_secs = ttl_secs.unwrap_or(config.auth.token_ttl_secs);
    match issue_token(&config.auth, email, ttl_secs) {
        Ok(token) => CommandResult::success("token", token),
        Err(error) => CommandResult::failure("token", "token_issue", error.to_string(), 6),
    }
}
