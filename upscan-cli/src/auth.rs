use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;

use upscan_ingest::BearerToken;

use crate::state::upscan_home;

pub const TOKEN_ENV: &str = "UP_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub up_api_token: Option<String>,
}

fn auth_path() -> Result<std::path::PathBuf> {
    Ok(upscan_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

/// `UP_API_TOKEN` first, then `~/.upscan/auth.json`
pub fn load_token() -> Result<BearerToken> {
    let from_env = std::env::var(TOKEN_ENV).ok();
    match pick_token(from_env, || Ok(load_auth()?.up_api_token))? {
        Some(token) => Ok(BearerToken::new(token)),
        None => bail!(
            "no Up API token found.\nSet {TOKEN_ENV} in your environment, or write {{\"up_api_token\": \"...\"}} to ~/.upscan/auth.json"
        ),
    }
}

fn pick_token(
    from_env: Option<String>,
    from_file: impl FnOnce() -> Result<Option<String>>,
) -> Result<Option<String>> {
    let usable = |t: Option<String>| t.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    if let Some(token) = usable(from_env) {
        return Ok(Some(token));
    }
    Ok(usable(from_file()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins() {
        let t = pick_token(Some("up:yeah:env".into()), || panic!("file not read")).unwrap();
        assert_eq!(t.as_deref(), Some("up:yeah:env"));
    }

    #[test]
    fn test_blank_env_falls_back_to_file() {
        let t = pick_token(Some("  ".into()), || Ok(Some("up:yeah:file\n".into()))).unwrap();
        assert_eq!(t.as_deref(), Some("up:yeah:file"));
    }

    #[test]
    fn test_nothing_configured() {
        assert!(pick_token(None, || Ok(None)).unwrap().is_none());
    }
}
