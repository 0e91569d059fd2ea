use std::sync::Arc;

use ember_chat::{ChatRequest, Error};

use crate::acceptance::{Reply, StubEmbedding, StubSearch, build_service, hit};

fn request(session_id: &str, message: &str) -> ChatRequest {
	ChatRequest { session_id: Some(session_id.to_string()), message: message.to_string() }
}

fn docs_search() -> StubSearch {
	StubSearch::new(
		vec![
			hit("1", "flare_overview.md", "Flare produces a block roughly every 1.8 seconds."),
			hit("2", "ftso.md", "The FTSO provides decentralized price feeds."),
		],
		vec![
			hit("2", "ftso.md", "The FTSO provides decentralized price feeds."),
			hit("3", "fdc.md", "The FDC attests external data for smart contracts."),
		],
	)
}

#[tokio::test]
async fn answers_grounded_rag_queries() {
	let answer = "Flare produces a block roughly every 1.8 seconds. [Document flare_overview.md]";
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("What is the block time of the Flare network?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text(answer),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);
	let response = parts
		.service
		.chat(request("s1", "What is Flare's block time?"))
		.await
		.expect("Chat turn failed.");

	assert_eq!(response.classification.as_deref(), Some("ANSWER"));
	assert_eq!(response.response, answer);

	let history = parts.service.session_history("s1").await;

	assert_eq!(history, vec![answer.to_string()]);
}

#[tokio::test]
async fn synthesizer_sees_the_literal_document_content() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("What is the block time of the Flare network?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text("An answer."),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);

	parts
		.service
		.chat(request("s1", "What is Flare's block time?"))
		.await
		.expect("Chat turn failed.");

	let prompts = parts.generation.prompts.lock().expect("Prompt log poisoned.");
	let responder_prompt = prompts.last().expect("No responder prompt recorded.");

	assert!(responder_prompt.contains("Document flare_overview.md"));
	assert!(responder_prompt.contains("Flare produces a block roughly every 1.8 seconds."));
	assert!(responder_prompt.contains("User query: What is Flare's block time?"));
}

#[tokio::test]
async fn returns_static_reply_for_rejected_queries() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("How is the weather today in the Flare ecosystem?"),
			Reply::Text(r#"{"classification": "REJECT"}"#),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);
	let response = parts
		.service
		.chat(request("s1", "How is the weather today?"))
		.await
		.expect("Chat turn failed.");

	// The script holds no responder reply, so reaching the synthesizer would
	// have failed the turn.
	assert_eq!(response.classification.as_deref(), Some("REJECT"));
	assert_eq!(response.response, "The query is out of scope.");
	assert!(parts.service.session_history("s1").await.is_empty());
}

#[tokio::test]
async fn returns_static_reply_for_clarify() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("What is the average block time?"),
			Reply::Text(
				r#"{"classification": "CLARIFY", "reason": "No specific chain is mentioned."}"#,
			),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);
	let response = parts
		.service
		.chat(request("s1", "What is the average block time?"))
		.await
		.expect("Chat turn failed.");

	assert_eq!(response.classification.as_deref(), Some("CLARIFY"));
	assert_eq!(response.response, "Please provide additional context.");
}

#[tokio::test]
async fn surfaces_out_of_enum_classification() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("What is Flare?"),
			Reply::Text(r#"{"classification": "MAYBE"}"#),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);
	let result = parts.service.chat(request("s1", "What is Flare?")).await;

	assert!(matches!(result, Err(Error::Classifier { .. })));
}

#[tokio::test]
async fn falls_back_to_conversational_on_routing_failure() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![Reply::Fail("routing endpoint is down"), Reply::Text("Hello! How can I help?")],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);
	let response =
		parts.service.chat(request("s1", "hi there")).await.expect("Chat turn failed.");

	assert_eq!(response.classification, None);
	assert_eq!(response.response, "Hello! How can I help?");
}

#[tokio::test]
async fn keeps_the_original_query_when_improvement_fails() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Fail("rewrite endpoint is down"),
			Reply::Text(r#"{"classification": "REJECT"}"#),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);

	parts
		.service
		.chat(request("s1", "What is Flare's consensus?"))
		.await
		.expect("Chat turn failed.");

	let prompts = parts.generation.prompts.lock().expect("Prompt log poisoned.");
	let classifier_prompt = prompts.last().expect("No classifier prompt recorded.");

	assert!(classifier_prompt.contains("What is Flare's consensus?"));
}

#[tokio::test]
async fn retrieval_failure_leaves_history_untouched() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("What is the block time of the Flare network?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
		],
		Arc::new(crate::acceptance::FailingEmbedding),
		docs_search(),
		false,
	);
	let result = parts.service.chat(request("s1", "What is Flare's block time?")).await;

	assert!(matches!(result, Err(Error::Provider { .. })));
	assert!(parts.service.session_history("s1").await.is_empty());
}

#[tokio::test]
async fn history_evicts_the_oldest_answer() {
	let parts = build_service(
		crate::acceptance::test_config(4, 2, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("Improved one?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text("answer one"),
			Reply::Text("RAG_ROUTER"),
			Reply::Text("Improved two?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text("answer two"),
			Reply::Text("RAG_ROUTER"),
			Reply::Text("Improved three?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text("answer three"),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);

	for turn in ["one", "two", "three"] {
		parts
			.service
			.chat(request("s1", &format!("Question {turn}?")))
			.await
			.expect("Chat turn failed.");
	}

	let history = parts.service.session_history("s1").await;

	assert_eq!(history, vec!["answer two".to_string(), "answer three".to_string()]);
}

#[tokio::test]
async fn sessions_do_not_share_history() {
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![
			Reply::Text("RAG_ROUTER"),
			Reply::Text("Improved?"),
			Reply::Text(r#"{"classification": "ANSWER"}"#),
			Reply::Text("an answer"),
		],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		docs_search(),
		false,
	);

	parts.service.chat(request("s1", "What is Flare?")).await.expect("Chat turn failed.");

	assert_eq!(parts.service.session_history("s1").await.len(), 1);
	assert!(parts.service.session_history("s2").await.is_empty());
}

#[tokio::test]
async fn summarizes_market_data_for_auxiliary_routes() {
	let summary = "BTC-USD closed lower over the last sessions.";
	let parts = build_service(
		crate::acceptance::test_config(4, 5, 10, 3),
		vec![Reply::Text("AUXILIARY_DATA"), Reply::Text("BTC-USD"), Reply::Text(summary)],
		Arc::new(StubEmbedding { vector_dim: 4 }),
		StubSearch::empty(),
		false,
	);
	let response = parts
		.service
		.chat(request("s1", "Predict the price of BTC-USD"))
		.await
		.expect("Chat turn failed.");

	assert_eq!(response.classification, None);
	assert_eq!(response.response, summary);

	let prompts = parts.generation.prompts.lock().expect("Prompt log poisoned.");
	let summary_prompt = prompts.last().expect("No summary prompt recorded.");

	assert!(summary_prompt.contains("82,573.92"));
}
