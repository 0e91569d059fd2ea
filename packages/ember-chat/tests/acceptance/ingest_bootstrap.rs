use std::sync::Arc;

use crate::acceptance::{StubEmbedding, StubSearch, build_service, record};

#[tokio::test]
async fn skips_records_with_missing_content() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		Vec::new(),
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);
	let records = vec![
		record("ftso.md", "The FTSO provides decentralized price feeds."),
		record("broken.md", "   "),
		record("fdc.md", "The FDC attests external data."),
	];
	let report = parts.service.bootstrap(&records).await.expect("Bootstrap failed.");

	assert_eq!(report.indexed, 2);
	assert_eq!(report.skipped, 1);

	let upserted = parts.search.upserted.lock().expect("Upsert log poisoned.");
	let identifiers: Vec<&str> =
		upserted.iter().map(|point| point.record.identifier.as_str()).collect();

	assert_eq!(identifiers, ["ftso.md", "fdc.md"]);
}

#[tokio::test]
async fn embedding_failures_skip_without_aborting_the_batch() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		Vec::new(),
		Arc::new(crate::acceptance::FailingEmbedding),
		StubSearch::empty(),
		false,
	);
	let records =
		vec![record("ftso.md", "price feeds"), record("fdc.md", "external data")];
	let report = parts.service.bootstrap(&records).await.expect("Bootstrap must not fail.");

	assert_eq!(report.indexed, 0);
	assert_eq!(report.skipped, 2);
	assert!(parts.search.upserted.lock().expect("Upsert log poisoned.").is_empty());
}

#[tokio::test]
async fn point_ids_are_stable_per_identifier() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		Vec::new(),
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);
	let records = vec![record("ftso.md", "price feeds")];

	parts.service.bootstrap(&records).await.expect("Bootstrap failed.");
	parts.service.bootstrap(&records).await.expect("Bootstrap failed.");

	let upserted = parts.search.upserted.lock().expect("Upsert log poisoned.");

	assert_eq!(upserted.len(), 2);
	assert_eq!(upserted[0].id, upserted[1].id);
}
