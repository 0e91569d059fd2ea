use std::sync::Arc;

use ember_chat::ChatRequest;

use crate::acceptance::{Reply, StubEmbedding, StubSearch, build_service};

fn request(message: &str) -> ChatRequest {
	ChatRequest { session_id: Some("gate".to_string()), message: message.to_string() }
}

#[tokio::test]
async fn delivers_the_token_on_the_gated_turn() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("ATTESTATION"),
			Reply::Text("Send a single random nonce as your next message."),
			// No replies for the second turn: the gate must bypass routing
			// entirely.
			Reply::Text("CONVERSATIONAL"),
			Reply::Text("Back to normal."),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);

	let first = parts
		.service
		.chat(request("Please verify the enclave"))
		.await
		.expect("Attestation request failed.");

	assert_eq!(first.response, "Send a single random nonce as your next message.");

	let second = parts
		.service
		.chat(request("nonce-4201337"))
		.await
		.expect("Gated turn failed.");

	assert_eq!(second.response, "header.nonce-4201337.signature");

	// The gate is reset, so the next turn routes normally again.
	let third = parts.service.chat(request("hello")).await.expect("Follow-up turn failed.");

	assert_eq!(third.response, "Back to normal.");
}

#[tokio::test]
async fn gate_consumes_any_message_while_armed() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![Reply::Text("ATTESTATION"), Reply::Text("Send a nonce.")],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);

	parts
		.service
		.chat(request("attest the enclave"))
		.await
		.expect("Attestation request failed.");

	// A message that would otherwise route to the RAG path is still consumed
	// as the nonce; an exhausted script proves no routing call happened.
	let gated = parts
		.service
		.chat(request("What is Flare's block time?"))
		.await
		.expect("Gated turn failed.");

	assert_eq!(gated.response, "header.What is Flare's block time?.signature");
}

#[tokio::test]
async fn gate_resets_after_a_failed_attestation() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("ATTESTATION"),
			Reply::Text("Send a nonce."),
			Reply::Text("CONVERSATIONAL"),
			Reply::Text("Still here."),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		true,
	);

	parts
		.service
		.chat(request("attest the enclave"))
		.await
		.expect("Attestation request failed.");

	let gated = parts.service.chat(request("nonce-12345678")).await.expect("Gated turn failed.");

	assert!(gated.response.starts_with("The attestation failed with error:"));

	let after = parts.service.chat(request("hello")).await.expect("Follow-up turn failed.");

	assert_eq!(after.response, "Still here.");
}
