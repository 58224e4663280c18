//! Loader for Precis configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML files and inline snippets as they were
//! added, then `PRECIS_`-prefixed environment variables (`__` separates
//! nested keys, e.g. `PRECIS_SERVER__BIND=0.0.0.0:9000`). String values are
//! then expanded for `${VAR}` references. Every section has defaults, so an
//! empty configuration is valid.
//!
//! ```yaml
//! summarizer:
//!   abstract_size: 10
//!   keyword_count: 15
//! fetch:
//!   timeout_secs: 15
//! llm:
//!   provider: openai
//!   api_key: "${OP_KEY}"
//! server:
//!   bind: "127.0.0.1:8000"
//!   output_dir: var
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File};
use precis_common::LlmConfig;
use precis_common::observability::{LogConfig, LogFormat};
use precis_core::{ExtractorConfig, SummarizeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisConfig {
    pub summarizer: SummarizerSection,
    pub fetch: FetchSection,
    pub llm: LlmSection,
    pub server: ServerSection,
    pub logging: LoggingSection,
}

/// Raw extractor knobs; signed so that bad values reach validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSection {
    pub abstract_size: i64,
    pub keyword_count: i64,
    pub paragraph_weight: f64,
}

impl Default for SummarizerSection {
    fn default() -> Self {
        Self {
            abstract_size: precis_core::DEFAULT_ABSTRACT_SIZE as i64,
            keyword_count: precis_core::DEFAULT_KEYWORD_COUNT as i64,
            paragraph_weight: precis_core::DEFAULT_PARAGRAPH_WEIGHT,
        }
    }
}

impl SummarizerSection {
    pub fn extractor_config(&self) -> Result<ExtractorConfig, SummarizeError> {
        ExtractorConfig::from_raw(self.abstract_size, self.keyword_count, self.paragraph_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub timeout_secs: u64,
    pub retries: usize,
    pub user_agent: Option<String>,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            retries: 2,
            user_agent: None,
        }
    }
}

impl FetchSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The tag is `provider`; `none` disables the neural abstract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmSection {
    Openai {
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        base_url: String,
    },
    #[default]
    None,
}

fn default_openai_model() -> String {
    "nvidia/nemotron-nano-9b-v2:free".into()
}
fn default_ollama_model() -> String {
    "llama3.2:3b".into()
}
fn default_ollama_endpoint() -> String {
    DEFAULT_OLLAMA_ENDPOINT.into()
}

impl LlmSection {
    pub fn to_llm_config(&self) -> LlmConfig {
        match self {
            LlmSection::Openai {
                api_key,
                model,
                base_url,
            } => LlmConfig::OpenAi {
                api_key: api_key.clone(),
                model: model.clone(),
                base_url: base_url.clone(),
            },
            LlmSection::Ollama { model, base_url } => LlmConfig::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            },
            LlmSection::None => LlmConfig::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    /// Directory that `POST /api/save` writes into.
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.into(),
            output_dir: PathBuf::from("var"),
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: String,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: "text".into(),
            emit_stderr: true,
            filter: "info".into(),
            dir: None,
        }
    }
}

impl LoggingSection {
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: LogFormat::parse(&self.format),
            default_filter: self.filter.clone(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PrecisConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for PrecisConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecisConfigLoader {
    /// Defaults only; environment overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use precis_config::PrecisConfigLoader;
    ///
    /// let config = PrecisConfigLoader::new()
    ///     .with_yaml_str("summarizer:\n  abstract_size: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.summarizer.abstract_size, 3);
    /// assert_eq!(config.summarizer.keyword_count, 15);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "PRECIS".into(),
        }
    }

    /// Use a different environment prefix (tests).
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments configured purely by env.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use precis_config::{LlmSection, PrecisConfigLoader};
    ///
    /// let cfg = PrecisConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: ollama
    ///   model: "qwen2.5:7b"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(matches!(
    ///     cfg.llm,
    ///     LlmSection::Ollama { ref base_url, .. } if base_url == "http://localhost:11434"
    /// ));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use precis_config::{LlmSection, PrecisConfigLoader};
    ///
    /// unsafe { std::env::set_var("DOC_OP_KEY", "injected-from-env"); }
    ///
    /// let config = PrecisConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// llm:
    ///   provider: openai
    ///   api_key: "${DOC_OP_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// match &config.llm {
    ///     LlmSection::Openai { api_key, model, base_url } => {
    ///         assert_eq!(api_key, "injected-from-env");
    ///         assert_eq!(model, "nvidia/nemotron-nano-9b-v2:free");
    ///         assert!(base_url.is_none());
    ///     }
    ///     _ => panic!("expected OpenAI configuration"),
    /// }
    ///
    /// unsafe { std::env::remove_var("DOC_OP_KEY"); }
    /// ```
    pub fn load(self) -> Result<PrecisConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        // Recursively expand environment variables
        expand_env_in_value(&mut v);

        let typed: PrecisConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
