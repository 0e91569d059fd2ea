use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Task hint for asymmetric embedding models. Documents are embedded once at
/// ingestion time; queries are embedded fresh per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
	Document,
	Query,
}
impl EmbeddingTask {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Document => "RETRIEVAL_DOCUMENT",
			Self::Query => "RETRIEVAL_QUERY",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparseEmbedding {
	pub indices: Vec<u32>,
	pub weights: Vec<f32>,
}

pub async fn embed_dense(
	cfg: &ember_config::EmbeddingProviderConfig,
	text: &str,
	task: EmbeddingTask,
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/models/{}:embedContent", cfg.api_base, cfg.model);
	let body = serde_json::json!({
		"content": { "parts": [ { "text": text } ] },
		"taskType": task.as_str(),
		"outputDimensionality": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::goog_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_dense_response(json)
}

pub async fn embed_sparse(
	cfg: &ember_config::SparseProviderConfig,
	text: &str,
) -> Result<SparseEmbedding> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "model": cfg.model, "input": text });
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_sparse_response(json)
}

fn parse_dense_response(json: Value) -> Result<Vec<f32>> {
	let values = json
		.get("embedding")
		.and_then(|v| v.get("values"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing values array."))?;

	let mut vec = Vec::with_capacity(values.len());
	for value in values {
		let number =
			value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;
		vec.push(number as f32);
	}

	Ok(vec)
}

fn parse_sparse_response(json: Value) -> Result<SparseEmbedding> {
	// Flat { indices, values } object, or the per-input pair list some sparse
	// encoders return.
	if let Some(indices) = json.get("indices").and_then(|v| v.as_array()) {
		let weights = json
			.get("values")
			.or_else(|| json.get("weights"))
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Sparse response is missing values array."))?;

		return build_sparse(indices, weights);
	}

	if let Some(pairs) = json.as_array().and_then(|arr| arr.first()).and_then(|v| v.as_array()) {
		let mut indices = Vec::with_capacity(pairs.len());
		let mut weights = Vec::with_capacity(pairs.len());
		for pair in pairs {
			let index = pair
				.get("index")
				.and_then(|v| v.as_u64())
				.ok_or_else(|| eyre::eyre!("Sparse pair is missing index."))?;
			let weight = pair
				.get("value")
				.and_then(|v| v.as_f64())
				.ok_or_else(|| eyre::eyre!("Sparse pair is missing value."))?;
			indices.push(index as u32);
			weights.push(weight as f32);
		}

		return Ok(SparseEmbedding { indices, weights });
	}

	Err(eyre::eyre!("Sparse response has an unrecognized shape."))
}

fn build_sparse(indices: &[Value], weights: &[Value]) -> Result<SparseEmbedding> {
	if indices.len() != weights.len() {
		return Err(eyre::eyre!("Sparse indices and values have mismatched lengths."));
	}

	let mut out = SparseEmbedding {
		indices: Vec::with_capacity(indices.len()),
		weights: Vec::with_capacity(weights.len()),
	};
	for (index, weight) in indices.iter().zip(weights) {
		let index =
			index.as_u64().ok_or_else(|| eyre::eyre!("Sparse index must be an integer."))?;
		let weight =
			weight.as_f64().ok_or_else(|| eyre::eyre!("Sparse value must be numeric."))?;
		out.indices.push(index as u32);
		out.weights.push(weight as f32);
	}

	Ok(out)
}
