use std::env;
use std::fmt;

use anyhow::{Context, Result, bail};

/// Which record store the process talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be one of: dynamodb, memory, got '{}'", other),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::DynamoDb => write!(f, "dynamodb"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// How requests reach the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Invoked by the Lambda runtime API with API Gateway proxy events
    Lambda,
    /// Plain HTTP listener, for local development
    Local,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub store_backend: StoreBackend,
    pub dynamodb_endpoint_url: Option<String>,
    pub run_mode: RunMode,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let table_name = env::var("STUDENT_TABLE").unwrap_or_else(|_| "demo-student".to_string());

        let store_backend = env::var("STORE_BACKEND")
            .map(|value| StoreBackend::parse(&value))
            .unwrap_or(Ok(StoreBackend::DynamoDb))
            .context("STORE_BACKEND is invalid")?;

        let dynamodb_endpoint_url = env::var("DYNAMODB_ENDPOINT_URL").ok();

        let run_mode = if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
            RunMode::Lambda
        } else {
            RunMode::Local
        };

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            table_name,
            store_backend,
            dynamodb_endpoint_url,
            run_mode,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Run mode: {:?}", self.run_mode);
        tracing::info!("  Store backend: {}", self.store_backend);
        tracing::info!("  Table: {}", self.table_name);
        tracing::info!(
            "  DynamoDB endpoint: {}",
            self.dynamodb_endpoint_url.as_deref().unwrap_or("default (AWS)")
        );
        if self.run_mode == RunMode::Local {
            tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        table_name: "demo-student".to_string(),
        store_backend: StoreBackend::Memory,
        dynamodb_endpoint_url: None,
        run_mode: RunMode::Local,
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    }
}
