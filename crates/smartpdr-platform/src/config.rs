use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use smartpdr_advisor::GenerativeTextConfig;
use smartpdr_core::PdrPolicy;
use tracing::info;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    /// File-backed session store root; in-memory when unset.
    pub session_dir: Option<PathBuf>,
    pub policy: PdrPolicy,
    pub summarizer: GenerativeTextConfig,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_vars(default_http_addr, |name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_vars<F>(default_http_addr: &str, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        let http_addr = var("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        let session_dir = var("SESSION_DIR").map(PathBuf::from);

        let policy = match var("PDR_POLICY_FILE") {
            Some(path) => load_policy(Path::new(&path))?,
            None => PdrPolicy::default(),
        };

        let mut summarizer = GenerativeTextConfig {
            api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            ..GenerativeTextConfig::default()
        };
        if let Some(model) = var("SUMMARY_MODEL") {
            summarizer.model = model;
        }
        if let Some(endpoint) = var("SUMMARY_ENDPOINT") {
            summarizer.endpoint = endpoint;
        }
        if let Some(secs) = var("SUMMARY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().with_context(|| {
                format!("SUMMARY_TIMEOUT_SECS must be whole seconds, got {secs:?}")
            })?;
            summarizer.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            http_addr,
            session_dir,
            policy,
            summarizer,
        })
    }
}

/// Read a JSON policy override file; omitted fields keep their defaults.
pub fn load_policy(path: &Path) -> Result<PdrPolicy> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file {}", path.display()))?;
    let policy: PdrPolicy = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse policy file {}", path.display()))?;
    policy
        .validate()
        .with_context(|| format!("invalid policy in {}", path.display()))?;
    info!(path = %path.display(), "loaded classification policy");
    Ok(policy)
}
