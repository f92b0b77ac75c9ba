//! Credential gate for the hosted inference API.
//!
//! The pipeline refuses to start without an API token. The gate checks an
//! ordered list of sources and hands the resolved token to the stage
//! constructors as an explicit value; nothing here mutates process-wide
//! environment state.

use crate::config::AuthConfig;
use crate::defaults;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// An inference API token.
///
/// Debug output is redacted so the secret cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Where a token was found, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    File(PathBuf),
    Environment(String),
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::File(path) => write!(f, "token file {}", path.display()),
            TokenSource::Environment(var) => write!(f, "environment variable {}", var),
        }
    }
}

/// Ordered credential lookup: token file first, then environment variable.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    token_file: PathBuf,
    env_var: String,
}

impl CredentialGate {
    /// Build the gate from configuration, falling back to the default token
    /// file location (~/.config/tartil/token) and `HF_TOKEN`.
    pub fn from_config(auth: &AuthConfig) -> Self {
        let token_file = auth
            .token_file
            .clone()
            .unwrap_or_else(Self::default_token_file);
        Self {
            token_file,
            env_var: defaults::TOKEN_ENV_VAR.to_string(),
        }
    }

    /// Override the token file location.
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }

    /// Override the environment variable name (used by tests to avoid
    /// touching the real one).
    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    /// Default token file path: ~/.config/tartil/token
    pub fn default_token_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("tartil")
            .join("token")
    }

    /// Resolve a token from the first source that has one.
    ///
    /// Returns the token together with the source it came from, or `None`
    /// when no source holds a non-empty token.
    pub fn resolve(&self) -> Option<(ApiToken, TokenSource)> {
        if let Ok(contents) = fs::read_to_string(&self.token_file) {
            let token = contents.trim();
            if !token.is_empty() {
                return Some((
                    ApiToken::new(token),
                    TokenSource::File(self.token_file.clone()),
                ));
            }
        }

        if let Ok(token) = std::env::var(&self.env_var)
            && !token.trim().is_empty()
        {
            return Some((
                ApiToken::new(token.trim()),
                TokenSource::Environment(self.env_var.clone()),
            ));
        }

        None
    }

    /// Whether any source holds a token.
    pub fn available(&self) -> bool {
        self.resolve().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: only used with ENV_LOCK held.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn gate_without_sources() -> CredentialGate {
        CredentialGate::from_config(&AuthConfig::default())
            .with_token_file("/nonexistent/tartil-test/token")
            .with_env_var("TARTIL_TEST_NO_SUCH_TOKEN")
    }

    #[test]
    fn resolves_from_token_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hf_filetoken123").unwrap();

        let gate = gate_without_sources().with_token_file(file.path());
        let (token, source) = gate.resolve().unwrap();

        assert_eq!(token.as_str(), "hf_filetoken123");
        assert_eq!(source, TokenSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn file_takes_priority_over_environment() {
        let _lock = ENV_LOCK.lock().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hf_fromfile").unwrap();

        set_env("TARTIL_TEST_TOKEN_PRIO", "hf_fromenv");
        let gate = gate_without_sources()
            .with_token_file(file.path())
            .with_env_var("TARTIL_TEST_TOKEN_PRIO");

        let (token, source) = gate.resolve().unwrap();
        assert_eq!(token.as_str(), "hf_fromfile");
        assert!(matches!(source, TokenSource::File(_)));

        remove_env("TARTIL_TEST_TOKEN_PRIO");
    }

    #[test]
    fn falls_back_to_environment() {
        let _lock = ENV_LOCK.lock().unwrap();

        set_env("TARTIL_TEST_TOKEN_FALLBACK", "hf_fromenv");
        let gate = gate_without_sources().with_env_var("TARTIL_TEST_TOKEN_FALLBACK");

        let (token, source) = gate.resolve().unwrap();
        assert_eq!(token.as_str(), "hf_fromenv");
        assert_eq!(
            source,
            TokenSource::Environment("TARTIL_TEST_TOKEN_FALLBACK".to_string())
        );

        remove_env("TARTIL_TEST_TOKEN_FALLBACK");
    }

    #[test]
    fn empty_file_is_not_a_token() {
        let _lock = ENV_LOCK.lock().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let gate = gate_without_sources().with_token_file(file.path());
        assert!(gate.resolve().is_none());
        assert!(!gate.available());
    }

    #[test]
    fn empty_environment_value_is_not_a_token() {
        let _lock = ENV_LOCK.lock().unwrap();

        set_env("TARTIL_TEST_TOKEN_EMPTY", "");
        let gate = gate_without_sources().with_env_var("TARTIL_TEST_TOKEN_EMPTY");
        assert!(gate.resolve().is_none());

        remove_env("TARTIL_TEST_TOKEN_EMPTY");
    }

    #[test]
    fn no_source_yields_none() {
        let _lock = ENV_LOCK.lock().unwrap();

        let gate = gate_without_sources();
        assert!(gate.resolve().is_none());
        assert!(!gate.available());
    }

    #[test]
    fn token_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  hf_padded  ").unwrap();

        let gate = gate_without_sources().with_token_file(file.path());
        let (token, _) = gate.resolve().unwrap();
        assert_eq!(token.as_str(), "hf_padded");
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = ApiToken::new("hf_supersecret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn default_token_file_lives_under_tartil() {
        let path = CredentialGate::default_token_file();
        assert!(path.to_string_lossy().contains("tartil"));
        assert!(path.ends_with("token"));
    }
}
