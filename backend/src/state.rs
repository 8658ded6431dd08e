//! Shared application state injected into the Actix handlers.

use crate::config::Settings;
use crate::error::Result;
use crate::host::probe::HttpsProbe;
use crate::renders::RenderRegistry;
use std::sync::Arc;
use std::time::Duration;

/// State built once at startup and shared as `web::Data`.
///
/// Each request opens its own host connection from `settings.database`. The
/// long-lived parts are the HTTP client behind `probe` and the renders that
/// already received the script.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub probe: HttpsProbe,
    pub renders: Arc<RenderRegistry>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let probe = HttpsProbe::new(Duration::from_millis(settings.plugin.probe_timeout_ms))?;
        Ok(Self {
            settings,
            probe,
            renders: Arc::new(RenderRegistry::default()),
        })
    }
}
