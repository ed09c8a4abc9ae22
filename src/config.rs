use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub metadata: MetadataConfig,
    pub lms: LmsConfig,
    pub server: ServerConfig,
    /// Known environment ids. Discovery beyond this roster is not supported.
    #[serde(default)]
    pub environments: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
    /// Base URL of the metadata manager, e.g. `http://host:8080/erwinDISuite`.
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header.
    pub auth_token: String,
    /// Payload completeness flag forwarded as the `fillOptions` query parameter.
    #[serde(default = "default_fill_options")]
    pub fill_options: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LmsConfig {
    /// Base URL of the vector-store service.
    pub base_url: String,
    #[serde(default = "default_store_name")]
    pub store_name: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

fn default_fill_options() -> u32 {
    256
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_store_name() -> String {
    "lms_store".to_string()
}

fn default_index_name() -> String {
    "QuestSoftware".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Normalize base URLs so path joining stays predictable
    config.metadata.base_url = config.metadata.base_url.trim_end_matches('/').to_string();
    config.lms.base_url = config.lms.base_url.trim_end_matches('/').to_string();

    if config.metadata.base_url.is_empty() {
        anyhow::bail!("metadata.base_url must not be empty");
    }
    if config.metadata.auth_token.is_empty() {
        anyhow::bail!("metadata.auth_token must not be empty");
    }
    if config.lms.base_url.is_empty() {
        anyhow::bail!("lms.base_url must not be empty");
    }
    if config.metadata.timeout_secs == 0 || config.lms.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }
    if config.lms.store_name.is_empty() || config.lms.index_name.is_empty() {
        anyhow::bail!("lms.store_name and lms.index_name must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("lmsb.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (tmp, path)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let (_tmp, path) = write_config(
            r#"
[metadata]
base_url = "http://metadata.local:8080/erwinDISuite/"
auth_token = "secret"

[lms]
base_url = "http://lms.local:8000"

[server]
bind = "127.0.0.1:8088"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.metadata.fill_options, 256);
        assert_eq!(config.metadata.timeout_secs, 30);
        assert_eq!(config.lms.store_name, "lms_store");
        assert_eq!(config.lms.index_name, "QuestSoftware");
        assert!(config.environments.is_empty());
        // trailing slash is stripped
        assert_eq!(
            config.metadata.base_url,
            "http://metadata.local:8080/erwinDISuite"
        );
    }

    #[test]
    fn roster_and_overrides_parse() {
        let (_tmp, path) = write_config(
            r#"
[metadata]
base_url = "http://metadata.local:8080/erwinDISuite"
auth_token = "secret"
fill_options = 512
timeout_secs = 10

[lms]
base_url = "http://lms.local:8000"
store_name = "alt_store"
index_name = "AltIndex"

[server]
bind = "0.0.0.0:9000"

environments = ["23", "445"]
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.metadata.fill_options, 512);
        assert_eq!(config.metadata.timeout_secs, 10);
        assert_eq!(config.lms.store_name, "alt_store");
        assert_eq!(config.lms.index_name, "AltIndex");
        assert_eq!(config.environments, vec!["23", "445"]);
    }

    #[test]
    fn empty_auth_token_rejected() {
        let (_tmp, path) = write_config(
            r#"
[metadata]
base_url = "http://metadata.local:8080"
auth_token = ""

[lms]
base_url = "http://lms.local:8000"

[server]
bind = "127.0.0.1:8088"
"#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("auth_token"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let (_tmp, path) = write_config(
            r#"
[metadata]
base_url = "http://metadata.local:8080"
auth_token = "secret"
timeout_secs = 0

[lms]
base_url = "http://lms.local:8000"

[server]
bind = "127.0.0.1:8088"
"#,
        );

        assert!(load_config(&path).is_err());
    }
}
