//! Production wiring from configuration
//!
//! Builds the collaborators a session needs from [`Settings`]: the HTTP
//! credential issuer, the HTTP embedding provider, an in-memory feedback
//! store sized to the configured embedding dimension, and the optional
//! catalog file override. The audio device provider and transport factory
//! stay injected; their implementations live with the hosting platform.

use std::sync::Arc;

use voice_sales_config::Settings;
use voice_sales_core::SessionEvents;
use voice_sales_persistence::MemoryFeedbackStore;
use voice_sales_rag::HttpEmbeddingProvider;
use voice_sales_transport::{AudioDeviceProvider, TransportFactory};

use crate::credential::HttpCredentialIssuer;
use crate::session::SessionCollaborators;

/// Build production collaborators from settings.
pub fn collaborators_from_settings(
    settings: &Settings,
    devices: Arc<dyn AudioDeviceProvider>,
    transport: Arc<dyn TransportFactory>,
    events: SessionEvents,
) -> SessionCollaborators {
    if let Some(path) = &settings.catalog.data_path {
        match voice_sales_catalog::reload_catalog(path) {
            Ok(count) => tracing::info!(%path, count, "Catalog loaded from override file"),
            Err(e) => {
                tracing::warn!(%path, error = %e, "Catalog override failed; keeping embedded data")
            }
        }
    }

    SessionCollaborators {
        devices,
        transport,
        credentials: Arc::new(HttpCredentialIssuer::new(&settings.credential)),
        store: Arc::new(MemoryFeedbackStore::new(settings.embedding.dimension)),
        embedder: Arc::new(HttpEmbeddingProvider::new(
            settings.embedding.endpoint.clone(),
            settings.embedding.api_key.clone(),
            settings.embedding.model.clone(),
            settings.embedding.dimension,
        )),
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_sales_rag::EmbeddingProvider;
    use voice_sales_transport::{StubCapture, StubDeviceProvider, StubTransport, StubTransportFactory};

    fn stub_platform() -> (Arc<dyn AudioDeviceProvider>, Arc<dyn TransportFactory>) {
        let capture = Arc::new(StubCapture::new());
        let transport = Arc::new(StubTransport::new());
        (
            Arc::new(StubDeviceProvider::new(capture)),
            Arc::new(StubTransportFactory::new(transport)),
        )
    }

    #[test]
    fn test_default_settings_wire_up() {
        let (devices, transport) = stub_platform();
        let collaborators = collaborators_from_settings(
            &Settings::default(),
            devices,
            transport,
            SessionEvents::new(),
        );
        // The embedder and store agree on the configured dimension.
        assert_eq!(collaborators.embedder.dimension(), 1536);
    }

    #[test]
    fn test_missing_catalog_override_is_tolerated() {
        let mut settings = Settings::default();
        settings.catalog.data_path = Some("/nonexistent/cars.json".to_string());

        let (devices, transport) = stub_platform();
        // Must not panic; the embedded catalog stays in place.
        let _ = collaborators_from_settings(&settings, devices, transport, SessionEvents::new());
        assert_eq!(voice_sales_catalog::get_catalog().len(), 50);
    }
}
