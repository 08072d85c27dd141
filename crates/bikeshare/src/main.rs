mod config;

use anyhow::Context;
use bikeshare_api::create_app;
use bikeshare_core::StationRepository;
use bikeshare_core::import::{self, ImportFormat};
use clap::Parser;
use config::ServerConfig;
use std::path::{Path, PathBuf};

/// Command line arguments for the bikeshare server
#[derive(Parser, Debug)]
#[command(name = "bikeshare")]
#[command(about = "City bike stations REST service")]
struct Args {
    /// Path to the server configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Station file to import at startup, overriding the configuration
    #[arg(short, long)]
    stations: Option<PathBuf>,
}

async fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let config_content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    serde_json::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn load_repository(station_file: Option<&Path>, format: ImportFormat) -> anyhow::Result<StationRepository> {
    let Some(path) = station_file else {
        tracing::info!("No station file configured, starting empty");
        return Ok(StationRepository::new());
    };

    let stations = import::load_file(path, format)?;
    let repository = StationRepository::with_stations(stations)
        .with_context(|| format!("Failed to import stations from '{}'", path.display()))?;
    tracing::info!("Loaded {} stations from {}", repository.len(), path.display());
    Ok(repository)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt().pretty().init();

    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(stations) = args.stations {
        config.station_file = Some(stations);
    }

    // Import happens before any request can observe the repository
    let repository = load_repository(config.station_file.as_deref(), config.station_format)?;

    // Build our application with routes
    let app = create_app(repository);

    // Run our app with hyper
    let bind_addr = config.bind_addr();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_repository_without_file() {
        let repository = load_repository(None, ImportFormat::Csv).unwrap();
        assert!(repository.is_empty());
    }

    #[test]
    fn test_load_repository_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id": 2, "name": "Kamppi", "lang": "fi"}, {"name": "Kaivopuisto", "lang": "fi"}]"#)
            .unwrap();

        let repository = load_repository(Some(file.path()), ImportFormat::Json).unwrap();
        assert_eq!(repository.len(), 2);
        assert_eq!(repository.read(3).and_then(|s| s.name).as_deref(), Some("Kaivopuisto"));
    }

    #[test]
    fn test_load_repository_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ID,Nimi\n1,Kamppi\n1,Kaivopuisto\n").unwrap();

        let result = load_repository(Some(file.path()), ImportFormat::Csv);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"port": 4000}"#).unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.port, 4000);

        let missing = load_config(Path::new("/nonexistent/config.json")).await;
        assert!(missing.is_err());
    }
}
