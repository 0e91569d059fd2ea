pub const DENSE_VECTOR_NAME: &str = "dense";
pub const SPARSE_VECTOR_NAME: &str = "sparse";

use qdrant_client::qdrant::{
	CreateCollectionBuilder, Distance, Modifier, PointStruct, SparseVectorParamsBuilder,
	SparseVectorsConfigBuilder, UpsertPointsBuilder, VectorParamsBuilder, VectorsConfigBuilder,
};

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &ember_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Create the collection if it does not exist yet: one named dense vector
	/// under cosine distance and one named IDF-weighted sparse vector.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		vectors_config.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
		);

		let mut sparse_vectors_config = SparseVectorsConfigBuilder::default();

		sparse_vectors_config.add_named_vector_params(
			SPARSE_VECTOR_NAME,
			SparseVectorParamsBuilder::default().modifier(Modifier::Idf as i32),
		);

		let builder = CreateCollectionBuilder::new(self.collection.clone())
			.vectors_config(vectors_config)
			.sparse_vectors_config(sparse_vectors_config);

		self.client.create_collection(builder).await?;

		Ok(())
	}

	pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<()> {
		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(())
	}
}
