use std::sync::Arc;

use tokio::sync::Mutex;

use crate::enhance::EnhancementClient;
use crate::export::ExportAdapter;
use crate::render::TemplateRegistry;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single writer: every mutate→persist cycle runs under this lock.
    pub store: Arc<Mutex<DocumentStore>>,
    pub enhancer: EnhancementClient,
    pub templates: Arc<TemplateRegistry>,
    pub exporter: ExportAdapter,
}
