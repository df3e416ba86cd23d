//! Identity resolution for farmgate commands.
//!
//! Every command acts as some marketplace user, and the user's role on an
//! offer (buyer or seller) is read off the offer itself. Rather than
//! requiring `--as` on every invocation, identity is resolved through a chain:
//!
//! 1. `--as <user>` — explicit per-command override
//! 2. `FARMGATE_USER` env var — process/session level
//! 3. `user` in `~/.farmgate/config.toml` — global default

use std::env;

use crate::config::Config;

/// Error message shown when identity cannot be resolved.
pub const IDENTITY_REQUIRED: &str = "identity required: pass --as <user>, \
    set FARMGATE_USER, or add `user = \"...\"` to ~/.farmgate/config.toml";

/// Resolve the acting user from the tiered resolution chain.
pub fn resolve_identity(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    resolve_from(explicit, env::var("FARMGATE_USER").ok(), config)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
) -> Result<String, String> {
    // 1. Explicit --as flag.
    if let Some(id) = explicit.filter(|s| !s.is_empty()) {
        return Ok(id.to_string());
    }

    // 2. FARMGATE_USER environment variable.
    if let Some(id) = from_env.filter(|s| !s.is_empty()) {
        return Ok(id);
    }

    // 3. Config file.
    config
        .user
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IDENTITY_REQUIRED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(user: Option<&str>) -> Config {
        Config {
            user: user.map(String::from),
            database: None,
        }
    }

    #[test]
    fn explicit_wins() {
        let result = resolve_from(Some("sam"), Some("bea".into()), &config_with(Some("carl")));
        assert_eq!(result.unwrap(), "sam");
    }

    #[test]
    fn env_beats_config() {
        let result = resolve_from(None, Some("bea".into()), &config_with(Some("carl")));
        assert_eq!(result.unwrap(), "bea");
    }

    #[test]
    fn config_is_the_fallback() {
        let result = resolve_from(None, Some(String::new()), &config_with(Some("carl")));
        assert_eq!(result.unwrap(), "carl");
    }

    #[test]
    fn nothing_resolves_to_an_error() {
        let err = resolve_from(None, None, &config_with(None)).unwrap_err();
        assert_eq!(err, IDENTITY_REQUIRED);
    }
}
