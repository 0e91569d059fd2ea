use std::collections::HashMap;

use qdrant_client::qdrant::{
	PointStruct, Query, QueryPointsBuilder, ScoredPoint, Vector, VectorInput,
	point_id::PointIdOptions,
};
use tracing::warn;

use ember_providers::embedding::{EmbeddingTask, SparseEmbedding};
use ember_storage::{
	models::{self, DocumentRecord},
	qdrant::{DENSE_VECTOR_NAME, QdrantStore, SPARSE_VECTOR_NAME},
};

use crate::{
	BoxFuture, ChatService, DocumentPoint, Error, Result, VectorSearch, fusion::rrf_fuse,
};

/// A read-only projection of one stored document, scoped to a single request
/// and ordered by fused rank.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RetrievedDocument {
	pub identifier: String,
	pub content: String,
	pub metadata: String,
	pub fusion_rank: u32,
}

/// One hit from a single-signal query, keyed by its point id.
#[derive(Debug, Clone)]
pub struct ScoredHit {
	pub key: String,
	pub document: DocumentRecord,
}

pub struct QdrantSearch {
	store: QdrantStore,
}

impl QdrantSearch {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}

	async fn run_query(&self, query: Query, using: &str, limit: u64) -> Result<Vec<ScoredHit>> {
		let search = QueryPointsBuilder::new(self.store.collection.clone())
			.query(query)
			.using(using)
			.limit(limit)
			.with_payload(true);
		let response = self
			.store
			.client
			.query(search)
			.await
			.map_err(|err| Error::Qdrant { message: err.to_string() })?;

		Ok(collect_hits(&response.result))
	}
}

impl VectorSearch for QdrantSearch {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.store.ensure_collection().await?;

			Ok(())
		})
	}

	fn query_dense<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<ScoredHit>>> {
		Box::pin(async move {
			self.run_query(Query::new_nearest(vector), DENSE_VECTOR_NAME, limit).await
		})
	}

	fn query_sparse<'a>(
		&'a self,
		embedding: SparseEmbedding,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<ScoredHit>>> {
		Box::pin(async move {
			let input = VectorInput::new_sparse(embedding.indices, embedding.weights);

			self.run_query(Query::new_nearest(input), SPARSE_VECTOR_NAME, limit).await
		})
	}

	fn upsert<'a>(&'a self, points: Vec<DocumentPoint>) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut structs = Vec::with_capacity(points.len());

			for point in points {
				let mut vectors = HashMap::new();

				vectors.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(point.dense));
				vectors.insert(
					SPARSE_VECTOR_NAME.to_string(),
					Vector::new_sparse(point.sparse.indices, point.sparse.weights),
				);

				let payload = models::document_payload(&point.record);

				structs.push(PointStruct::new(point.id.to_string(), vectors, payload));
			}

			self.store.upsert_points(structs).await?;

			Ok(())
		})
	}
}

impl ChatService {
	/// Two-signal retrieval: one dense and one sparse top-`top_k` search,
	/// fused with reciprocal rank fusion and truncated to `limit`. Both
	/// signals are required; a failed embedding or store call fails the whole
	/// search rather than degrading to single-signal results.
	pub async fn hybrid_search(
		&self,
		query: &str,
		top_k: u32,
		limit: u32,
	) -> Result<Vec<RetrievedDocument>> {
		if limit == 0 || limit > top_k {
			return Err(Error::InvalidRequest {
				message: format!(
					"limit must satisfy 0 < limit <= top_k, got limit {limit} and top_k {top_k}."
				),
			});
		}

		let provider_cfg = &self.cfg.providers;
		let (dense, sparse) = tokio::try_join!(
			self.providers.embedding.embed_dense(
				&provider_cfg.dense_embedding,
				query,
				EmbeddingTask::Query,
			),
			self.providers.embedding.embed_sparse(&provider_cfg.sparse_embedding, query),
		)?;

		if dense.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		let (dense_hits, sparse_hits) = tokio::try_join!(
			self.search.query_dense(dense, top_k as u64),
			self.search.query_sparse(sparse, top_k as u64),
		)?;

		let mut documents: HashMap<String, DocumentRecord> = HashMap::new();
		let mut ranked_lists = Vec::with_capacity(2);

		for hits in [dense_hits, sparse_hits] {
			let mut keys = Vec::with_capacity(hits.len());

			for hit in hits {
				keys.push(hit.key.clone());
				documents.entry(hit.key).or_insert(hit.document);
			}

			ranked_lists.push(keys);
		}

		let mut fused = rrf_fuse(&ranked_lists, self.cfg.retriever.rrf_k);

		fused.truncate(limit as usize);

		let mut out = Vec::with_capacity(fused.len());

		for (key, _score) in fused {
			let Some(document) = documents.remove(&key) else {
				continue;
			};

			out.push(RetrievedDocument {
				identifier: document.identifier,
				content: document.content,
				metadata: document.metadata,
				fusion_rank: out.len() as u32 + 1,
			});
		}

		Ok(out)
	}
}

fn collect_hits(points: &[ScoredPoint]) -> Vec<ScoredHit> {
	let mut hits = Vec::with_capacity(points.len());

	for point in points {
		let Some(key) = point.id.as_ref().and_then(point_key) else {
			warn!("Scored point is missing a usable id.");

			continue;
		};
		let Some(document) = models::decode_document(&point.payload) else {
			warn!(key = %key, "Scored point has no usable document payload.");

			continue;
		};

		hits.push(ScoredHit { key, document });
	}

	hits
}

fn point_key(point_id: &qdrant_client::qdrant::PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		None => None,
	}
}
