//! Configuration management for the conformance runner

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub suite: SuiteConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// FHIR base URL of the server under test.
    /// Environment variable: `FHIR__SERVER__BASE_URL`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Sent as `Authorization: Bearer <token>` when set.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuiteConfig {
    /// Logical id of the patient the cases read and search for.
    /// Environment variable: `FHIR__SUITE__PATIENT_ID` (or plain `PATIENT_ID`)
    #[serde(default)]
    pub patient_id: String,
    /// Gate cases on the server's CapabilityStatement.
    #[serde(default)]
    pub check_capabilities: bool,
    /// Case ids to run; empty runs all.
    /// Example: FHIR__SUITE__CASES=AS002,AS006
    #[serde(default)]
    pub cases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// text | json
    #[serde(default = "default_report_format")]
    pub format: String,
    /// Write the report to this file instead of stdout.
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting for logs
    #[serde(default)]
    pub json: bool,

    /// Enable file logging in addition to stderr
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for log files (default: ./logs)
    #[serde(default = "default_log_directory")]
    pub file_directory: String,

    /// Log file prefix (default: fhir-conformance)
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,

    /// Log rotation: daily, hourly, minutely, never (default: daily)
    #[serde(default = "default_log_rotation")]
    pub file_rotation: String,
}

impl Config {
    /// Load configuration from defaults, a config file and the environment.
    ///
    /// Without `path`, an optional `conformance.{toml,yaml,json}` in the
    /// working directory is used.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("conformance").required(false),
        };

        let env: config::Map<String, String> = std::env::vars().collect();
        Self::from_sources(Self::defaults()?.add_source(file), &env)
    }

    fn from_sources(
        builder: ConfigBuilder<DefaultState>,
        env: &config::Map<String, String>,
    ) -> anyhow::Result<Self> {
        let config = builder
            // Example: FHIR__SERVER__BASE_URL -> config.server.base_url
            // Lists use comma separator: FHIR__SUITE__CASES=AS002,AS006
            .add_source(
                config::Environment::with_prefix("FHIR")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("suite.cases")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;

        // Opaque strings are taken verbatim: `try_parsing` would turn an id
        // such as "007" into the number 7.
        if let Some(id) = env.get("FHIR__SUITE__PATIENT_ID") {
            config.suite.patient_id = id.clone();
        } else if let Some(id) = env.get("PATIENT_ID").or_else(|| env.get("patient_id")) {
            // Convenience escape hatch when no FHIR__SUITE__PATIENT_ID is set.
            config.suite.patient_id = id.clone();
        }
        if let Some(token) = env.get("FHIR__SERVER__BEARER_TOKEN") {
            config.server.bearer_token = Some(token.clone());
        }

        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.base_url", default_base_url())?
            .set_default("server.timeout_seconds", default_timeout_seconds())?
            .set_default("suite.patient_id", "")?
            .set_default("suite.check_capabilities", false)?
            .set_default("suite.cases", Vec::<String>::new())?
            .set_default("report.format", default_report_format())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)?
            .set_default("logging.file_enabled", false)?
            .set_default("logging.file_directory", default_log_directory())?
            .set_default("logging.file_prefix", default_log_file_prefix())?
            .set_default("logging.file_rotation", default_log_rotation())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.suite.patient_id.trim().is_empty() {
            return Err(
                "suite.patient_id is required (--patient-id, FHIR__SUITE__PATIENT_ID or PATIENT_ID)"
                    .to_string(),
            );
        }
        url::Url::parse(&self.server.base_url)
            .map_err(|e| format!("server.base_url '{}' is invalid: {e}", self.server.base_url))?;
        if self.server.timeout_seconds == 0 {
            return Err("server.timeout_seconds must be > 0".to_string());
        }
        self.report_format()?;
        if !matches!(
            self.logging.file_rotation.as_str(),
            "daily" | "hourly" | "minutely" | "never"
        ) {
            return Err(format!(
                "logging.file_rotation must be daily, hourly, minutely or never, got '{}'",
                self.logging.file_rotation
            ));
        }
        Ok(())
    }

    pub fn report_format(&self) -> Result<ReportFormat, String> {
        match self.report.format.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("report.format must be text or json, got '{other}'")),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_seconds)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/fhir".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_report_format() -> String {
    "text".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_directory() -> String {
    "./logs".to_string()
}

fn default_log_file_prefix() -> String {
    "fhir-conformance".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Config {
        Config::defaults()
            .unwrap()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn from_env(pairs: &[(&str, &str)]) -> Config {
        let env = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_sources(Config::defaults().unwrap(), &env).unwrap()
    }

    #[test]
    fn numeric_looking_patient_ids_are_kept_verbatim() {
        for id in ["007", "1.10", "TRUE", "42"] {
            let config = from_env(&[("FHIR__SUITE__PATIENT_ID", id)]);
            assert_eq!(config.suite.patient_id, id);
        }

        let config = from_env(&[("FHIR__SERVER__BEARER_TOKEN", "000123")]);
        assert_eq!(config.server.bearer_token.as_deref(), Some("000123"));
    }

    #[test]
    fn plain_patient_id_fills_in_unless_prefixed_is_set() {
        let config = from_env(&[("PATIENT_ID", "0042")]);
        assert_eq!(config.suite.patient_id, "0042");

        let config = from_env(&[("patient_id", "lower")]);
        assert_eq!(config.suite.patient_id, "lower");

        let config = from_env(&[
            ("PATIENT_ID", "plain"),
            ("FHIR__SUITE__PATIENT_ID", "prefixed"),
        ]);
        assert_eq!(config.suite.patient_id, "prefixed");
    }

    #[test]
    fn env_overrides_nested_keys_and_lists() {
        let config = from_env(&[
            ("FHIR__SERVER__BASE_URL", "https://fhir.example.org/r4"),
            ("FHIR__SERVER__TIMEOUT_SECONDS", "5"),
            ("FHIR__SUITE__CHECK_CAPABILITIES", "true"),
            ("FHIR__SUITE__CASES", "AS002,AS006"),
        ]);
        assert_eq!(config.server.base_url, "https://fhir.example.org/r4");
        assert_eq!(config.server.timeout_seconds, 5);
        assert!(config.suite.check_capabilities);
        assert_eq!(config.suite.cases, vec!["AS002", "AS006"]);
    }

    #[test]
    fn defaults_fill_every_section() {
        let config = from_toml("");
        assert_eq!(config.server.base_url, "http://localhost:8080/fhir");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.server.bearer_token.is_none());
        assert!(config.suite.cases.is_empty());
        assert_eq!(config.report_format(), Ok(ReportFormat::Text));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file_rotation, "daily");
    }

    #[test]
    fn missing_patient_id_fails_validation() {
        let config = from_toml("");
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("suite.patient_id is required"), "{err}");
    }

    #[test]
    fn file_values_are_validated() {
        let config = from_toml(
            r#"
            [server]
            base_url = "https://fhir.example.org/r4"
            timeout_seconds = 5

            [suite]
            patient_id = "example"
            cases = ["AS006", "AS007"]

            [report]
            format = "JSON"
            "#,
        );
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.suite.cases, vec!["AS006", "AS007"]);
        assert_eq!(config.report_format(), Ok(ReportFormat::Json));

        let bad_url = from_toml("[server]\nbase_url = \"not a url\"\n[suite]\npatient_id = \"x\"");
        assert!(bad_url.validate().unwrap_err().contains("server.base_url"));

        let zero = from_toml("[server]\ntimeout_seconds = 0\n[suite]\npatient_id = \"x\"");
        assert_eq!(
            zero.validate(),
            Err("server.timeout_seconds must be > 0".to_string())
        );

        let format = from_toml("[suite]\npatient_id = \"x\"\n[report]\nformat = \"xml\"");
        assert!(format.validate().unwrap_err().contains("report.format"));
    }
}
