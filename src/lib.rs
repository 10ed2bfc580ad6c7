pub mod backend;
pub mod core;
pub mod db;
pub mod error;
pub mod schemas;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::core::config::Settings;
use crate::core::context::AppContext;
use crate::core::telemetry;

pub use crate::error::StoreError;

/// Build a ready-to-use context from the environment: load settings, install
/// tracing, construct the selected backend (pool plus schema bootstrap for the
/// SQL adapters, snapshot load for the JSON one) and inject it. Everything
/// after this call goes through `AppContext`.
pub async fn init() -> anyhow::Result<AppContext> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    let backend = backend::for_settings(&settings).await?;
    tracing::info!(
        backend = settings.backend_kind().as_str(),
        environment = %settings.runtime().environment.as_str(),
        "careclass store initialized"
    );

    Ok(AppContext::new(settings, backend))
}

/// Context over an explicit backend, for embedders and tests that bypass the
/// environment entirely.
pub fn init_with_backend(
    settings: Settings,
    backend: Arc<dyn backend::Backend>,
) -> AppContext {
    AppContext::new(settings, backend)
}
