pub mod ai; // Ollama-backed chat, prescription OCR, medication info
pub mod api; // HTTP API
pub mod config;
pub mod facilities; // Nearby hospitals, pharmacies, clinics
pub mod factcheck; // Health claim verifier
pub mod models;
pub mod monitor; // Expiry and low-stock alerts
pub mod shortage; // Drug shortage estimator
pub mod store;
pub mod symptoms; // Symptom predictor client

use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use crate::ai::{AiAssistant, AiError, OllamaClient};
use crate::api::server::{start_api_server, ServerError};
use crate::api::types::RateLimiter;
use crate::api::ApiContext;
use crate::config::{AppConfig, ConfigError, PlacesSource};
use crate::facilities::{
    FacilityError, LocationSearch, NearbyClient, NominatimProvider, OverpassProvider, PlaceSource,
};
use crate::shortage::{DrugCatalog, ShortageError};
use crate::store::HealthStore;
use crate::symptoms::{SymptomClient, SymptomError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Symptoms(#[from] SymptomError),
    #[error(transparent)]
    Facilities(#[from] FacilityError),
    #[error(transparent)]
    Catalog(#[from] ShortageError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Startup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Wire the store, catalog and outbound clients into the API context.
/// Builds blocking HTTP clients, so call it outside async tasks.
pub fn build_context(config: &AppConfig) -> Result<ApiContext, StartupError> {
    let store = if config.seed_demo_data {
        HealthStore::seeded()
    } else {
        HealthStore::new()
    };
    let catalog = DrugCatalog::bundled()?;

    let ollama = OllamaClient::new(&config.ollama_url, config.ai_timeout, config.connect_timeout)?;
    let assistant = AiAssistant::new(Arc::new(ollama), config.ollama_model.clone());

    let symptoms = SymptomClient::new(
        &config.symptom_url,
        config.http_timeout,
        config.connect_timeout,
    )?;

    let places: Arc<dyn PlaceSource> = match config.places_source {
        PlacesSource::Remote => Arc::new(NearbyClient::new(
            &config.nearby_url,
            config.http_timeout,
            config.connect_timeout,
        )?),
        PlacesSource::Overpass => Arc::new(OverpassProvider::new(
            &config.overpass_url,
            config.http_timeout,
            config.connect_timeout,
        )?),
    };
    let search: Arc<dyn LocationSearch> = Arc::new(NominatimProvider::new(
        &config.nominatim_url,
        config.http_timeout,
        config.connect_timeout,
    )?);

    tracing::info!(
        drugs = catalog.len(),
        seeded = config.seed_demo_data,
        places_source = ?config.places_source,
        ai_model = config.ollama_model.as_deref().unwrap_or("disabled"),
        "Context ready"
    );

    Ok(ApiContext {
        store: Arc::new(store),
        catalog: Arc::new(catalog),
        assistant,
        symptoms: Arc::new(symptoms),
        places,
        search,
        rate_limiter: Arc::new(Mutex::new(RateLimiter::new(
            config.rate_per_minute,
            config.rate_per_hour,
        ))),
    })
}

/// Log whether the configured model is available. Never fails startup:
/// chat degrades to its apology text when the model is missing.
fn report_model_status(assistant: &AiAssistant) {
    match assistant.model_installed() {
        Ok(true) => tracing::info!("AI model available"),
        Ok(false) => tracing::warn!("AI model is not installed on the Ollama server"),
        Err(AiError::NotConfigured) => {
            tracing::info!("AI assistant disabled (no model configured)")
        }
        Err(e) => tracing::warn!(error = %e, "Could not query Ollama models"),
    }
}

/// Start the server and run until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;

    // reqwest blocking clients must not be built on runtime worker threads.
    let ctx = tokio::task::spawn_blocking(move || build_context(&config)).await??;

    let assistant = ctx.assistant.clone();
    tokio::task::spawn_blocking(move || report_model_status(&assistant));

    let server = start_api_server(bind_addr, ctx).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    server.stop().await;
    Ok(())
}
