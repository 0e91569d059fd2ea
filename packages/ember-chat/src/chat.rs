use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
	ChatService, Error, Result, classify::RagClassification, prompts, router::SemanticRoute,
	session::Session,
};

pub(crate) const CLARIFY_REPLY: &str = "Please provide additional context.";
pub(crate) const REJECT_REPLY: &str = "The query is out of scope.";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
	pub session_id: Option<String>,
	pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub classification: Option<String>,
	pub response: String,
}

impl ChatService {
	/// Process one chat turn. Turns within a session are serialized by the
	/// session mutex, so history appends happen strictly in arrival order;
	/// unrelated sessions run in parallel. The attestation gate is checked
	/// before any routing.
	pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
		let message = req.message.trim();

		if message.is_empty() {
			return Err(Error::InvalidRequest { message: "message must be non-empty.".to_string() });
		}

		let session = match req.session_id.as_deref() {
			Some(id) => self.sessions.session(id),
			None => self.sessions.ephemeral(),
		};
		let mut session = session.lock().await;

		if session.attestation_requested {
			return Ok(self.consume_attestation(message, &mut session).await);
		}

		let route = self.semantic_route(message, &session).await;

		info!(route = route.as_str(), "Message routed.");

		match route {
			SemanticRoute::RagRouter => self.handle_rag(message, &mut session).await,
			SemanticRoute::AuxiliaryData => self.handle_auxiliary(message).await,
			SemanticRoute::Attestation => self.handle_attestation(&mut session).await,
			SemanticRoute::Conversational => self.handle_conversation(message).await,
		}
	}

	/// The gated turn: whatever the message says, it is consumed as the
	/// attestation nonce, and the gate resets no matter how the token call
	/// goes.
	async fn consume_attestation(&self, nonce: &str, session: &mut Session) -> ChatResponse {
		session.attestation_requested = false;

		let response = match self
			.providers
			.attestation
			.token(&self.cfg.providers.attestation, nonce)
			.await
		{
			Ok(token) => token,
			Err(err) => {
				warn!(error = %err, "Attestation token request failed.");

				format!("The attestation failed with error:\n{err}")
			},
		};

		ChatResponse { classification: None, response }
	}

	async fn handle_rag(&self, message: &str, session: &mut Session) -> Result<ChatResponse> {
		let improved = self.improve_query(message, session).await;
		let decision = self.classify_query(&improved).await?;

		info!(classification = decision.classification.as_str(), "Query classified.");

		let classification = Some(decision.classification.as_str().to_string());

		match decision.classification {
			RagClassification::Answer => {
				let retrieved = self
					.hybrid_search(&improved, self.cfg.retriever.top_k, self.cfg.retriever.limit)
					.await?;

				info!(retrieved = retrieved.len(), "Documents retrieved.");

				let answer = self.respond(message, &retrieved, session).await?;

				Ok(ChatResponse { classification, response: answer })
			},
			RagClassification::Clarify => {
				if let Some(reason) = &decision.reason {
					info!(reason = %reason, "Clarification requested.");
				}

				Ok(ChatResponse { classification, response: CLARIFY_REPLY.to_string() })
			},
			RagClassification::Reject =>
				Ok(ChatResponse { classification, response: REJECT_REPLY.to_string() }),
		}
	}

	async fn handle_attestation(&self, session: &mut Session) -> Result<ChatResponse> {
		let response = self
			.providers
			.generation
			.generate(
				&self.cfg.providers.generation,
				prompts::ATTESTATION_INSTRUCTIONS,
				None,
				None,
			)
			.await?;

		session.attestation_requested = true;

		Ok(ChatResponse { classification: None, response })
	}

	async fn handle_conversation(&self, message: &str) -> Result<ChatResponse> {
		let response = self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &prompts::conversational(message), None, None)
			.await?;

		Ok(ChatResponse { classification: None, response })
	}
}
