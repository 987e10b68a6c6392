use service::{RetailDataService, StorageGateway};

/// Shared by every handler. Both services are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub gateway: StorageGateway,
    /// `None` when no database URL is configured.
    pub retail: Option<RetailDataService>,
}
