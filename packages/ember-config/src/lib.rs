mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AttestationProviderConfig, Config, EmbeddingProviderConfig, GenerationProviderConfig,
	MarketDataProviderConfig, Providers, Qdrant, Responder, Retriever, Service,
	SparseProviderConfig, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.dense_embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.dense_embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.dense_embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.dense_embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.retriever.top_k == 0 {
		return Err(Error::Validation {
			message: "retriever.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retriever.limit == 0 {
		return Err(Error::Validation {
			message: "retriever.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.retriever.limit > cfg.retriever.top_k {
		return Err(Error::Validation {
			message: "retriever.limit must not exceed retriever.top_k.".to_string(),
		});
	}
	if cfg.retriever.rrf_k == 0 {
		return Err(Error::Validation {
			message: "retriever.rrf_k must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.generation.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.generation.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.responder.context_size == 0 {
		return Err(Error::Validation {
			message: "responder.context_size must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("generation", &cfg.providers.generation.api_key),
		("dense_embedding", &cfg.providers.dense_embedding.api_key),
		("sparse_embedding", &cfg.providers.sparse_embedding.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in [
		&mut cfg.providers.generation.api_base,
		&mut cfg.providers.dense_embedding.api_base,
		&mut cfg.providers.sparse_embedding.api_base,
		&mut cfg.providers.attestation.api_base,
		&mut cfg.providers.market_data.api_base,
	] {
		while api_base.ends_with('/') {
			api_base.pop();
		}
	}
}
