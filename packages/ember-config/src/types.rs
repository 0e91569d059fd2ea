use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retriever: Retriever,
	pub responder: Responder,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub generation: GenerationProviderConfig,
	pub dense_embedding: EmbeddingProviderConfig,
	pub sparse_embedding: SparseProviderConfig,
	pub attestation: AttestationProviderConfig,
	pub market_data: MarketDataProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct GenerationProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct SparseProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct AttestationProviderConfig {
	pub api_base: String,
	pub path: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct MarketDataProviderConfig {
	pub api_base: String,
	pub path: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Retriever {
	pub top_k: u32,
	pub limit: u32,
	#[serde(default = "default_rrf_k")]
	pub rrf_k: u32,
}

#[derive(Debug, Deserialize)]
pub struct Responder {
	pub context_size: u32,
}

fn default_rrf_k() -> u32 {
	60
}
