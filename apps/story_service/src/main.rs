use std::{process::ExitCode, time::Duration};

use dotenvy::dotenv;
use story_llm::{LLMClient, LLMClientConfig, LLMProvider};
use story_service::{
    app_module::AppState,
    app_router::build_app,
    core::{
        error::{AppError, ConfigError},
        settings::{Environment, Settings},
    },
};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_tracing(Environment::from_env());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(environment: Environment) {
    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    let result = if environment == Environment::Dev {
        tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )
    };

    if let Err(e) = result {
        eprintln!("setting tracing subscriber failed: {}", e);
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    tracing::info!(?settings, "Configuration loaded");

    let llm_client = LLMClient::new(
        LLMProvider::Gemini(settings.gemini_config()),
        Some(LLMClientConfig {
            timeout: settings.generation_timeout,
        }),
    )
    .map_err(|e| ConfigError::Client(format!("{:#}", e)))?;

    let state = AppState::new(llm_client, settings.gemini_model.clone());
    let app = build_app(state, settings.generation_timeout + REQUEST_TIMEOUT_MARGIN);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!("Server started, listening on {}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
