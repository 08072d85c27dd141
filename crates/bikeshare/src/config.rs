use bikeshare_core::import::ImportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration, read from a JSON file at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_address: String,
    /// Stations imported before the server starts accepting requests
    pub station_file: Option<PathBuf>,
    pub station_format: ImportFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            station_file: None,
            station_format: ImportFormat::Csv,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_deserialization() {
        let json = r#"
        {
          "port": 8080,
          "stationFile": "data/stations.json",
          "stationFormat": "json"
        }
        "#;

        let config: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.station_file, Some(PathBuf::from("data/stations.json")));
        assert_eq!(config.station_format, ImportFormat::Json);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }
}
