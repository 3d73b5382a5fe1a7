use std::sync::Arc;

use anyhow::Context;
use student_records::api_doc::ApiDoc;
use student_records::config::{Config, RunMode, StoreBackend};
use student_records::routes;
use student_records::state::AppState;
use student_records::store::{DynamoStore, InMemoryStore, StudentStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("openapi") {
        println!("{}", ApiDoc::to_pretty_json()?);
        return Ok(());
    }

    let on_lambda = std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok();
    if !on_lambda {
        // Local runs may keep their settings in a .env file
        dotenvy::dotenv().ok();
    }
    init_tracing(on_lambda);

    tracing::info!("student-records starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn StudentStore> = match config.store_backend {
        StoreBackend::DynamoDb => {
            let store = DynamoStore::from_config(&config).await;
            if config.dynamodb_endpoint_url.is_some() && config.run_mode == RunMode::Local {
                store.ensure_table().await?;
            }
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, records are lost on exit");
            Arc::new(InMemoryStore::new())
        }
    };

    if config.run_mode == RunMode::Lambda
        && std::env::var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH").is_err()
    {
        // REST API events otherwise arrive as /<stage>/student and miss every route
        tracing::warn!("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH is not set, stage names will prefix request paths");
    }

    let run_mode = config.run_mode;
    let address = format!("{}:{}", config.service_host, config.service_port);
    let app = routes::router(AppState::new(store, config));

    match run_mode {
        RunMode::Lambda => lambda_http::run(app)
            .await
            .map_err(|err| anyhow::anyhow!(err))
            .context("Lambda runtime exited with an error"),
        RunMode::Local => {
            let listener = tokio::net::TcpListener::bind(&address)
                .await
                .with_context(|| format!("Failed to bind {}", address))?;
            tracing::info!("Listening on {}", address);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("HTTP server failed")
        }
    }
}

fn init_tracing(on_lambda: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if on_lambda {
        // CloudWatch adds its own timestamps and does not render colours
        builder.with_ansi(false).without_time().with_target(false).init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutting down");
}
