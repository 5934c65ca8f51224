//! Configuration for the claims CLI.
//!
//! Settings live in a TOML file (`claims.toml` by default). Every section is
//! optional and falls back to the defaults below; a missing default file
//! means "all defaults", a missing file named with `--config` is an error.
//! Secrets are never stored here: the inference token comes from `HF_TOKEN`
//! (a `.env` file is honoured).
//!
//! ```toml
//! [data]
//! path = "data/claims"
//!
//! [models]
//! extractive_qa = "deepset/roberta-base-squad2"
//! llm = "mistralai/Mixtral-8x7B-Instruct-v0.1"
//! summarization = "facebook/bart-large-cnn"
//!
//! [prompts]
//! abstractive_qa_system = "..."
//!
//! [inference]
//! base_url = "https://router.huggingface.co"
//! timeout_secs = 60
//! max_tokens = 512
//! temperature = 0.1
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when no path is given; it may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "claims.toml";

/// Environment variable overriding `[data] path`.
pub const DATA_PATH_ENV: &str = "CLAIMS_DATA_PATH";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub models: ModelsConfig,
    pub prompts: PromptsConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the claim store
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/claims"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Extractive question answering model
    pub extractive_qa: String,
    /// Chat model for abstractive question answering
    pub llm: String,
    /// Summarization model
    pub summarization: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            extractive_qa: "deepset/roberta-base-squad2".to_string(),
            llm: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            summarization: "facebook/bart-large-cnn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// System instruction for abstractive question answering
    pub abstractive_qa_system: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            abstractive_qa_system: default_abstractive_qa_system(),
        }
    }
}

fn default_abstractive_qa_system() -> String {
    "You are a careful medical claims assistant. Answer only from the claim details and \
     clinical note you are given. If the answer is not present, say so. Respond with a JSON \
     object with two string fields: \"answer\" (a short direct answer) and \"reasoning\" \
     (where in the claim the answer comes from)."
        .to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: inference_client::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_tokens: 512,
            temperature: 0.1,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl Config {
    /// Load configuration, then apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::load_optional(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_file(path);
        }
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        Self::default().finish()
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
            .finish()
    }

    /// Apply environment overrides and validate.
    fn finish(mut self) -> Result<Self> {
        if let Ok(data_path) = env::var(DATA_PATH_ENV) {
            if !data_path.trim().is_empty() {
                self.data.path = PathBuf::from(data_path);
            }
        }

        self.validate()?;
        Ok(self)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings no operation can run with.
    pub fn validate(&self) -> Result<()> {
        if self.prompts.abstractive_qa_system.trim().is_empty() {
            bail!("prompts.abstractive_qa_system must not be empty");
        }
        for (key, model) in [
            ("models.extractive_qa", &self.models.extractive_qa),
            ("models.llm", &self.models.llm),
            ("models.summarization", &self.models.summarization),
        ] {
            if model.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        if self.inference.timeout_secs == 0 {
            bail!("inference.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
