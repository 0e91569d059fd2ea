use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{Value, value::Kind},
};
use serde::{Deserialize, Serialize};

pub const PAYLOAD_IDENTIFIER: &str = "filename";
pub const PAYLOAD_CONTENT: &str = "text";
pub const PAYLOAD_METADATA: &str = "metadata";

/// One corpus record as handed off by offline ingestion. Records are
/// immutable once indexed; the serving path only ever reads them back out of
/// point payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
	pub identifier: String,
	pub content: String,
	pub metadata: String,
}

pub fn document_payload(record: &DocumentRecord) -> Payload {
	let mut payload = Payload::new();

	payload.insert(PAYLOAD_IDENTIFIER, record.identifier.clone());
	payload.insert(PAYLOAD_METADATA, record.metadata.clone());
	payload.insert(PAYLOAD_CONTENT, record.content.clone());

	payload
}

/// Read a record back out of a point payload. Returns `None` when the payload
/// has no usable content, which indicates a record that should never have
/// been indexed.
pub fn decode_document(payload: &HashMap<String, Value>) -> Option<DocumentRecord> {
	let content = payload_str(payload, PAYLOAD_CONTENT)?;

	if content.trim().is_empty() {
		return None;
	}

	Some(DocumentRecord {
		identifier: payload_str(payload, PAYLOAD_IDENTIFIER).unwrap_or_default(),
		content,
		metadata: payload_str(payload, PAYLOAD_METADATA).unwrap_or_default(),
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;
	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}
