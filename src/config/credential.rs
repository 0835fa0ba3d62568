use crate::{Error, Result};
use std::env;

/// Source of the provider credential.
///
/// Looked up once at startup and again on every chat request, since the
/// credential may be revoked while the process is running.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;

    fn is_present(&self) -> bool {
        self.api_key().is_some()
    }

    fn require(&self) -> Result<String> {
        self.api_key()
            .ok_or_else(|| Error::config(format!("{} not found in environment", self.name())))
    }

    /// Human-readable name used in diagnostics. Never the secret itself.
    fn name(&self) -> &str;
}

/// Reads the credential from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn name(&self) -> &str {
        &self.var
    }
}

/// Shortens a secret to `abcd...wxyz` for log output.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
