//! CLI command implementations

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{JwtConfig, JwtManager};
use crate::controller::RESOURCE_PATHS;
use crate::http_server::{route_table, HttpServer, HttpServerConfig, Services};
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope, Severity};
use crate::pagination::PaginationConfig;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_lines, write_response};

/// Configuration file structure
///
/// Every section is optional; an empty object is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub auth: JwtConfig,

    /// Pagination overrides keyed by resource path (`blogs`, `tweets`, ...)
    #[serde(default)]
    pub pagination: HashMap<String, PaginationConfig>,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            auth: JwtConfig::default(),
            pagination: HashMap::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.server.validate().map_err(CliError::config_error)?;

        if self.auth.secret.trim().is_empty() {
            return Err(CliError::config_error("auth.secret must not be empty"));
        }
        if self.auth.access_token_ttl_minutes <= 0 {
            return Err(CliError::config_error(
                "auth.access_token_ttl_minutes must be > 0",
            ));
        }

        for (resource, pagination) in &self.pagination {
            if !RESOURCE_PATHS.contains(&resource.as_str()) {
                return Err(CliError::config_error(format!(
                    "Unknown resource in pagination: '{}'. Expected one of: {}",
                    resource,
                    RESOURCE_PATHS.join(", ")
                )));
            }
            pagination.validate().map_err(|e| {
                CliError::config_error(format!("pagination.{}: {}", resource, e))
            })?;
        }

        self.severity()?;

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("log_level: {}", e)))
    }

    /// Shared services built from this configuration
    pub fn services(&self) -> Services {
        Services::new(self.auth.clone()).with_pagination(self.pagination.clone())
    }
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckConfig { config } => check_config(&config),
        Command::Routes => routes(),
        Command::Token { config, user } => token(&config, &user),
    }
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => {
            let config = Config::load(path)?;
            let path_text = path.display().to_string();
            log_event_with_fields(Event::ConfigLoaded, &[("path", path_text.as_str())]);
            config
        }
        None => Config::default(),
    };
    if let Some(port) = port {
        config.server.port = port;
    }
    Logger::set_min_severity(config.severity()?);

    let addr = config.server.socket_addr();
    let scope = ObservationScope::with_fields("SERVE", &[("addr", addr.as_str())]);
    let server = HttpServer::with_config(config.server.clone(), config.services());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let result = rt.block_on(server.start());
    match result {
        Ok(()) => {
            scope.complete();
            Ok(())
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(Event::ServerFailed, &[("reason", reason.as_str())]);
            scope.fail(&reason);
            Err(CliError::serve_failed(format!("HTTP server failed: {}", e)))
        }
    }
}

/// Validate a configuration file and report what it resolves to
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    let mut pagination: Vec<_> = config.pagination.iter().collect();
    pagination.sort_by(|a, b| a.0.cmp(b.0));

    write_response(json!({
        "addr": config.server.socket_addr(),
        "request_timeout_ms": config.server.request_timeout_ms,
        "cors_origins": config.server.cors_origins,
        "log_level": config.severity()?.as_str(),
        "pagination": pagination
            .into_iter()
            .map(|(resource, p)| (resource.clone(), json!(p)))
            .collect::<serde_json::Map<_, _>>(),
    }))
}

/// Print the route table
pub fn routes() -> CliResult<()> {
    write_lines(route_table())
}

/// Issue a bearer token for `user`
pub fn token(config_path: &Path, user: &str) -> CliResult<()> {
    if user.trim().is_empty() {
        return Err(CliError::token_failed("user must not be empty"));
    }
    let config = Config::load(config_path)?;
    let manager = JwtManager::new(config.auth);

    let token = manager
        .issue(user)
        .map_err(|e| CliError::token_failed(e.to_string()))?;
    write_response(json!({ "user": user, "token": token }))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::cli::errors::CliErrorCode;

    #[test]
    fn test_empty_object_is_valid() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert!(config.pagination.is_empty());
    }

    #[test]
    fn test_unknown_pagination_resource_rejected() {
        let err = Config::parse(r#"{"pagination": {"widgets": {"page_size": 5}}}"#).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert!(err.message().contains("widgets"));
    }

    #[test]
    fn test_pagination_override_is_validated() {
        let err = Config::parse(r#"{"pagination": {"blogs": {"page_size": 0}}}"#).unwrap_err();
        assert!(err.message().starts_with("pagination.blogs"));

        let config = Config::parse(r#"{"pagination": {"blogs": {"page_size": 3}}}"#).unwrap();
        assert_eq!(config.pagination["blogs"].page_size, 3);
        assert_eq!(config.pagination["blogs"].max_page_size, 100);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(Config::parse(r#"{"log_level": "chatty"}"#).is_err());
        assert!(Config::parse(r#"{"log_level": "warning"}"#).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"port": 9100, "request_timeout_ms": 500}}, "auth": {{"secret": "s3cret"}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.request_timeout_ms, 500);
        assert_eq!(config.auth.secret, "s3cret");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code_str(), "RESTKIT_CLI_CONFIG_ERROR");
    }
}
