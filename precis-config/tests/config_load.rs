use precis_config::{LlmSection, PrecisConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
summarizer:
  abstract_size: 5
  keyword_count: 8
fetch:
  timeout_secs: 30
  user_agent: "precis-bot/0.1"
llm:
  provider: openai
  api_key: "${SURVEY_OP_KEY}"
  base_url: "https://gateway.example/v1/"
server:
  bind: "0.0.0.0:8080"
  output_dir: "${SURVEY_OUT}/results"
logging:
  format: json
  emit_stderr: false
"#;

#[test]
#[serial]
fn file_values_with_env_expansion() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "precis.yaml", FILE_YAML);

    temp_env::with_vars(
        [
            ("SURVEY_OP_KEY", Some("sk-from-env")),
            ("SURVEY_OUT", Some("/srv/precis")),
        ],
        || {
            let config = PrecisConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.summarizer.abstract_size, 5);
            assert_eq!(config.summarizer.keyword_count, 8);
            assert_eq!(config.summarizer.paragraph_weight, 1.0);
            assert_eq!(config.fetch.timeout_secs, 30);
            assert_eq!(config.fetch.retries, 2);
            assert_eq!(config.fetch.user_agent.as_deref(), Some("precis-bot/0.1"));
            assert_eq!(config.server.bind, "0.0.0.0:8080");
            assert_eq!(
                config.server.output_dir,
                PathBuf::from("/srv/precis/results")
            );
            assert_eq!(config.logging.format, "json");
            assert!(!config.logging.emit_stderr);
            match config.llm {
                LlmSection::Openai {
                    api_key, base_url, ..
                } => {
                    assert_eq!(api_key, "sk-from-env");
                    assert_eq!(base_url.as_deref(), Some("https://gateway.example/v1/"));
                }
                other => panic!("expected openai, got {other:?}"),
            }
        },
    );
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "precis.yaml", FILE_YAML);

    temp_env::with_vars(
        [
            ("PRECIS_SERVER__BIND", Some("127.0.0.1:9999")),
            ("PRECIS_SUMMARIZER__ABSTRACT_SIZE", Some("2")),
            ("SURVEY_OP_KEY", Some("k")),
            ("SURVEY_OUT", Some("out")),
        ],
        || {
            let config = PrecisConfigLoader::new().with_file(&p).load().unwrap();
            assert_eq!(config.server.bind, "127.0.0.1:9999");
            assert_eq!(config.summarizer.abstract_size, 2);
            assert_eq!(config.summarizer.keyword_count, 8);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = PrecisConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .unwrap();
    assert_eq!(config, Default::default());
    assert_eq!(config.llm, LlmSection::None);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(PrecisConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load()
        .is_err());
}

#[test]
#[serial]
fn unknown_provider_is_rejected() {
    let err = PrecisConfigLoader::new()
        .with_yaml_str("llm:\n  provider: gemini\n")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("gemini"));
}

#[test]
#[serial]
fn negative_abstract_size_loads_but_fails_validation() {
    let config = PrecisConfigLoader::new()
        .with_yaml_str("summarizer:\n  abstract_size: -1\n")
        .load()
        .unwrap();
    assert!(config.summarizer.extractor_config().is_err());
}
