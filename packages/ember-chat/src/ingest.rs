use serde::Serialize;
use tracing::{info, warn};

use ember_providers::embedding::{EmbeddingTask, SparseEmbedding};
use ember_storage::models::DocumentRecord;

use crate::{ChatService, Result};

/// A fully embedded record ready to upsert.
#[derive(Debug, Clone)]
pub struct DocumentPoint {
	pub id: uuid::Uuid,
	pub dense: Vec<f32>,
	pub sparse: SparseEmbedding,
	pub record: DocumentRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
	pub indexed: usize,
	pub skipped: usize,
}

impl ChatService {
	/// One-shot corpus load, run before the service answers queries. Records
	/// with missing content or a failed embedding are skipped with a warning;
	/// a skip never aborts the batch. The serving path has no write access to
	/// the collection.
	pub async fn bootstrap(&self, records: &[DocumentRecord]) -> Result<IngestReport> {
		self.search.ensure_collection().await?;

		let provider_cfg = &self.cfg.providers;
		let mut points = Vec::with_capacity(records.len());
		let mut skipped = 0usize;

		for record in records {
			if record.content.trim().is_empty() {
				warn!(
					identifier = %record.identifier,
					"Skipping document with missing or blank content."
				);
				skipped += 1;

				continue;
			}

			let embedded = tokio::try_join!(
				self.providers.embedding.embed_dense(
					&provider_cfg.dense_embedding,
					&record.content,
					EmbeddingTask::Document,
				),
				self.providers.embedding.embed_sparse(
					&provider_cfg.sparse_embedding,
					&record.content,
				),
			);
			let (dense, sparse) = match embedded {
				Ok(pair) => pair,
				Err(err) => {
					warn!(
						identifier = %record.identifier,
						error = %err,
						"Skipping document that failed to embed."
					);
					skipped += 1;

					continue;
				},
			};

			if dense.len() != self.cfg.storage.qdrant.vector_dim as usize {
				warn!(
					identifier = %record.identifier,
					"Skipping document with mismatched embedding dimension."
				);
				skipped += 1;

				continue;
			}

			let id = uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, record.identifier.as_bytes());

			points.push(DocumentPoint { id, dense, sparse, record: record.clone() });
		}

		let indexed = points.len();

		if points.is_empty() {
			warn!("No valid documents found to index.");
		} else {
			self.search.upsert(points).await?;

			info!(indexed, skipped, "Collection bootstrap finished.");
		}

		Ok(IngestReport { indexed, skipped })
	}
}
