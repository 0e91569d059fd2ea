use tracing::warn;

use crate::{ChatService, prompts, session::Session};

/// Top-level intent of one incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticRoute {
	RagRouter,
	AuxiliaryData,
	Attestation,
	Conversational,
}

impl SemanticRoute {
	pub fn parse(text: &str) -> Option<Self> {
		let normalized = text.trim().trim_matches(['"', '\'', '`']).trim().to_uppercase();

		match normalized.as_str() {
			"RAG_ROUTER" => Some(Self::RagRouter),
			"AUXILIARY_DATA" => Some(Self::AuxiliaryData),
			"ATTESTATION" => Some(Self::Attestation),
			"CONVERSATIONAL" => Some(Self::Conversational),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::RagRouter => "RAG_ROUTER",
			Self::AuxiliaryData => "AUXILIARY_DATA",
			Self::Attestation => "ATTESTATION",
			Self::Conversational => "CONVERSATIONAL",
		}
	}
}

impl ChatService {
	/// Classify a message into a route. Any failure, transport or parse,
	/// downgrades to the conversational path; routing never propagates an
	/// error to the caller.
	pub(crate) async fn semantic_route(&self, message: &str, session: &Session) -> SemanticRoute {
		let mut prompt = prompts::history_block(session.replies());

		prompt.push_str(&prompts::semantic_router(message));

		let schema = prompts::semantic_route_schema();
		let raw = match self
			.providers
			.generation
			.generate(
				&self.cfg.providers.generation,
				&prompt,
				Some(prompts::ENUM_MIME_TYPE),
				Some(&schema),
			)
			.await
		{
			Ok(text) => text,
			Err(err) => {
				warn!(error = %err, "Routing call failed; defaulting to the conversational path.");

				return SemanticRoute::Conversational;
			},
		};

		match SemanticRoute::parse(&raw) {
			Some(route) => route,
			None => {
				warn!(raw = %raw, "Unrecognized route value; defaulting to the conversational path.");

				SemanticRoute::Conversational
			},
		}
	}
}
