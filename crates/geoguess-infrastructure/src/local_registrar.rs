//! Session registrar that mints identifiers locally.

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::session::SessionRegistrar;
use geoguess_core::snapshot::ScreenKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSessionRegistrar;

#[async_trait]
impl SessionRegistrar for LocalSessionRegistrar {
    async fn start_session(&self, screen: ScreenKind) -> Result<String> {
        let id = format!("{}-{}", screen, uuid::Uuid::new_v4());
        tracing::debug!("[LocalSessionRegistrar] Started session {}", id);
        Ok(id)
    }
}
