pub mod chat;
pub mod classify;
pub mod ingest;
pub mod retrieve;
pub mod router;
pub mod session;

mod auxiliary;
mod error;
mod fusion;
mod improve;
mod prompts;
mod respond;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use ember_config::{
	AttestationProviderConfig, Config, EmbeddingProviderConfig, GenerationProviderConfig,
	MarketDataProviderConfig, SparseProviderConfig,
};
use ember_providers::{
	embedding::{EmbeddingTask, SparseEmbedding},
	market::QuoteRow,
};
use ember_storage::qdrant::QdrantStore;

pub use chat::{ChatRequest, ChatResponse};
pub use classify::{RagClassification, RagDecision};
pub use error::{Error, Result};
pub use ingest::{DocumentPoint, IngestReport};
pub use retrieve::{QdrantSearch, RetrievedDocument, ScoredHit};
pub use router::SemanticRoute;
pub use session::{Session, SessionStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
		response_mime_type: Option<&'a str>,
		response_schema: Option<&'a Value>,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_dense<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
		task: EmbeddingTask,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;

	fn embed_sparse<'a>(
		&'a self,
		cfg: &'a SparseProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<SparseEmbedding>>;
}

pub trait AttestationProvider
where
	Self: Send + Sync,
{
	fn token<'a>(
		&'a self,
		cfg: &'a AttestationProviderConfig,
		nonce: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait MarketDataProvider
where
	Self: Send + Sync,
{
	fn daily_quotes<'a>(
		&'a self,
		cfg: &'a MarketDataProviderConfig,
		ticker: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<QuoteRow>>>;
}

/// Read/write surface of the vector store. The serving path only queries;
/// `upsert` exists for the offline bootstrap.
pub trait VectorSearch
where
	Self: Send + Sync,
{
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, Result<()>>;

	fn query_dense<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<ScoredHit>>>;

	fn query_sparse<'a>(
		&'a self,
		embedding: SparseEmbedding,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<ScoredHit>>>;

	fn upsert<'a>(&'a self, points: Vec<DocumentPoint>) -> BoxFuture<'a, Result<()>>;
}

struct DefaultProviders;

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
		response_mime_type: Option<&'a str>,
		response_schema: Option<&'a Value>,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(ember_providers::generation::generate(
			cfg,
			prompt,
			response_mime_type,
			response_schema,
		))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed_dense<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
		task: EmbeddingTask,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(ember_providers::embedding::embed_dense(cfg, text, task))
	}

	fn embed_sparse<'a>(
		&'a self,
		cfg: &'a SparseProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<SparseEmbedding>> {
		Box::pin(ember_providers::embedding::embed_sparse(cfg, text))
	}
}

impl AttestationProvider for DefaultProviders {
	fn token<'a>(
		&'a self,
		cfg: &'a AttestationProviderConfig,
		nonce: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(ember_providers::attestation::token(cfg, nonce))
	}
}

impl MarketDataProvider for DefaultProviders {
	fn daily_quotes<'a>(
		&'a self,
		cfg: &'a MarketDataProviderConfig,
		ticker: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<QuoteRow>>> {
		Box::pin(ember_providers::market::daily_quotes(cfg, ticker))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub generation: Arc<dyn GenerationProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub attestation: Arc<dyn AttestationProvider>,
	pub market_data: Arc<dyn MarketDataProvider>,
}

impl Providers {
	pub fn new(
		generation: Arc<dyn GenerationProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
		attestation: Arc<dyn AttestationProvider>,
		market_data: Arc<dyn MarketDataProvider>,
	) -> Self {
		Self { generation, embedding, attestation, market_data }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self {
			generation: provider.clone(),
			embedding: provider.clone(),
			attestation: provider.clone(),
			market_data: provider,
		}
	}
}

pub struct ChatService {
	pub cfg: Config,
	pub search: Arc<dyn VectorSearch>,
	pub providers: Providers,
	pub(crate) sessions: SessionStore,
}

impl ChatService {
	pub fn new(cfg: Config, store: QdrantStore) -> Self {
		Self::with_providers(cfg, Arc::new(QdrantSearch::new(store)), Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		search: Arc<dyn VectorSearch>,
		providers: Providers,
	) -> Self {
		let sessions = SessionStore::new(cfg.responder.context_size as usize);

		Self { cfg, search, providers, sessions }
	}

	/// Snapshot of a session's rolling answer history, oldest first.
	pub async fn session_history(&self, session_id: &str) -> Vec<String> {
		let session = self.sessions.session(session_id);
		let session = session.lock().await;

		session.replies().iter().cloned().collect()
	}
}
