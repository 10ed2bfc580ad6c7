use std::sync::Arc;

use crate::backend::Backend;
use crate::core::config::Settings;

/// Explicitly constructed process context. The backend adapter is selected
/// once (from `Settings::backend_kind`) and injected here; services depend on
/// the `Backend` trait only and never on the selection flag. Cloning is cheap
/// and multiple independent contexts may coexist, e.g. in tests.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<InnerContext>,
}

struct InnerContext {
    settings: Settings,
    backend: Arc<dyn Backend>,
}

impl AppContext {
    pub fn new(settings: Settings, backend: Arc<dyn Backend>) -> Self {
        Self { inner: Arc::new(InnerContext { settings, backend }) }
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }
}
