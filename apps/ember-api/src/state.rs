use std::sync::Arc;

use ember_chat::ChatService;
use ember_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ChatService>,
}
impl AppState {
	pub fn new(config: ember_config::Config) -> color_eyre::Result<Self> {
		let store = QdrantStore::new(&config.storage.qdrant)?;
		let service = ChatService::new(config, store);

		Ok(Self::with_service(Arc::new(service)))
	}

	pub fn with_service(service: Arc<ChatService>) -> Self {
		Self { service }
	}
}
