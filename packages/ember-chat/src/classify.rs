use serde::Deserialize;

use crate::{ChatService, Error, Result, prompts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RagClassification {
	Answer,
	Clarify,
	Reject,
}

impl RagClassification {
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"ANSWER" => Some(Self::Answer),
			"CLARIFY" => Some(Self::Clarify),
			"REJECT" => Some(Self::Reject),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Answer => "ANSWER",
			Self::Clarify => "CLARIFY",
			Self::Reject => "REJECT",
		}
	}
}

/// Outcome of classifying an improved query. `reason` is present if and only
/// if the classification is `CLARIFY`.
#[derive(Debug, Clone, PartialEq)]
pub struct RagDecision {
	pub classification: RagClassification,
	pub reason: Option<String>,
}

impl ChatService {
	/// Decide whether an improved query is answerable. Unlike routing there
	/// is no safe default here: an out-of-enum or malformed classification is
	/// surfaced as an error.
	pub(crate) async fn classify_query(&self, query: &str) -> Result<RagDecision> {
		let prompt = prompts::rag_classifier(query);
		let schema = prompts::rag_classification_schema();
		let raw = self
			.providers
			.generation
			.generate(
				&self.cfg.providers.generation,
				&prompt,
				Some(prompts::JSON_MIME_TYPE),
				Some(&schema),
			)
			.await?;

		parse_decision(&raw)
	}
}

#[derive(Debug, Deserialize)]
struct RawDecision {
	classification: String,
	#[serde(default)]
	reason: Option<String>,
}

pub(crate) fn parse_decision(raw: &str) -> Result<RagDecision> {
	let parsed: RawDecision = serde_json::from_str(raw.trim()).map_err(|err| Error::Classifier {
		message: format!("Classifier returned invalid JSON: {err}."),
	})?;
	let value = parsed.classification.trim().to_uppercase();
	let Some(classification) = RagClassification::parse(&value) else {
		return Err(Error::Classifier {
			message: format!("Unrecognized classification value: {value}."),
		});
	};
	// The reason only means something for CLARIFY; drop it elsewhere.
	let reason = match classification {
		RagClassification::Clarify => parsed.reason.filter(|reason| !reason.trim().is_empty()),
		_ => None,
	};

	Ok(RagDecision { classification, reason })
}
