use std::collections::VecDeque;
use std::fmt::Write;

use serde_json::Value;

pub(crate) const ENUM_MIME_TYPE: &str = "text/x.enum";
pub(crate) const JSON_MIME_TYPE: &str = "application/json";

pub(crate) const RESPONDER_GUIDELINES: &str = "\
You synthesize information from the documents above into an accurate, \
concise, and well-cited answer to the user query.

Guidelines:
- Support every statement with the provided documents and cite them, \
e.g. \"[Document <name>]\".
- Do not introduce anything that is not explicitly supported by the documents.
- Be clear, factual, and concise, and keep technical details accurate.

Answer the user query based solely on the given documents.
";

pub(crate) const ATTESTATION_INSTRUCTIONS: &str = "\
A user wants to perform a remote attestation with the TEE. Walk them through \
the process:

1. Their next message must contain a single random nonce and nothing else: \
10 to 74 characters, letters and digits only.
2. The reply to that message will be the attestation token.
3. To verify, they paste the token into a JWT decoder (for example jwt.io), \
check that the decoded payload contains their exact nonce, and confirm the \
TEE signature and claims are valid.
";

const CONVERSATIONAL_PERSONA: &str = "\
You are an assistant representing Flare, the blockchain for decentralized \
data oracle services. You know Flare's enshrined protocols, the Flare Time \
Series Oracle (FTSO) and the Flare Data Connector (FDC), and you answer with \
technical accuracy while staying friendly and engaged. Acknowledge the limits \
of your knowledge when a question goes beyond it.
";

/// Recency-weighted context block shared by the router, the improver, and
/// the responder. Response 1 is the most recent answer; weight decreases as
/// the index grows.
pub(crate) fn history_block(replies: &VecDeque<String>) -> String {
	if replies.is_empty() {
		return String::new();
	}

	let mut block = String::from(
		"Previous assistant responses, most recent first. Response 1 is the \
most recent and its wording should carry the most weight; older responses \
should carry progressively less.\n\n",
	);
	for (idx, reply) in replies.iter().rev().enumerate() {
		let _ = write!(block, "Response {}:\n{reply}\n\n", idx + 1);
	}

	block
}

pub(crate) fn semantic_router(message: &str) -> String {
	format!(
		"Classify the user input below into exactly one category. Pick the \
most specific category that matches the core intent and ignore politeness or \
filler.

Categories, in order of precedence:
1. RAG_ROUTER
   - Questions about Flare networks or blockchain topics: oracles, staking, \
smart contracts, consensus, gas, nodes.
   - Follow-ups that reference a previous response, for example with \"it\" \
or \"that\".
2. AUXILIARY_DATA
   - Requests for price history or a prediction for a ticker or symbol.
3. ATTESTATION
   - Explicit requests to verify, prove, or attest the enclave.
4. CONVERSATIONAL (default)
   - Greetings, unclear requests, and anything that fits no category above.

Input: {message}

Reply with exactly one of RAG_ROUTER, AUXILIARY_DATA, ATTESTATION, \
CONVERSATIONAL."
	)
}

pub(crate) fn semantic_route_schema() -> Value {
	serde_json::json!({
		"type": "STRING",
		"enum": ["RAG_ROUTER", "AUXILIARY_DATA", "ATTESTATION", "CONVERSATIONAL"],
	})
}

pub(crate) fn rag_classifier(query: &str) -> String {
	format!(
		"Classify the query below into exactly one category:

1. ANSWER: the query is clear, specific, answerable with factual \
information, and has at least a vague link to the Flare network or to \
blockchains.
2. CLARIFY: the query is ambiguous or vague and needs additional context.
3. REJECT: the query is inappropriate, harmful, or has no relation to the \
Flare network or blockchains at all.

Query: {query}

Respond with JSON of the form {{\"classification\": \"<CATEGORY>\", \
\"reason\": \"<WHY>\"}}. Use uppercase for the classification. Include the \
reason if and only if the classification is CLARIFY; it should say what is \
missing or ambiguous. Do not infer missing values.

Examples:
- \"What is Flare's block time?\" -> {{\"classification\": \"ANSWER\"}}
- \"How is the weather today?\" -> {{\"classification\": \"REJECT\"}}
- \"What is the average block time?\" -> {{\"classification\": \"CLARIFY\", \
\"reason\": \"No specific chain is mentioned.\"}}"
	)
}

pub(crate) fn rag_classification_schema() -> Value {
	serde_json::json!({
		"type": "OBJECT",
		"properties": {
			"classification": {
				"type": "STRING",
				"enum": ["ANSWER", "CLARIFY", "REJECT"],
			},
			"reason": { "type": "STRING" },
		},
		"required": ["classification"],
	})
}

pub(crate) fn query_improvement(query: &str, history: &str) -> String {
	format!(
		"The user asked the following about the Flare blockchain:

\"{query}\"

{history}Rewrite the query to improve vector retrieval quality:
- Adapt it to the chat history above where that clarifies the intent.
- Expand it with new, relevant keywords.
- Keep it under 300 characters and do not distort its original meaning.
- Keep it phrased as a question.

Return only the improved query, with no extra commentary."
	)
}

pub(crate) fn conversational(message: &str) -> String {
	format!("{CONVERSATIONAL_PERSONA}\n<input>\n{message}\n</input>\n")
}

pub(crate) fn ticker_extraction(message: &str) -> String {
	format!("Find the ticker symbol in the following request and return only the ticker: {message}")
}

pub(crate) fn market_summary(ticker: &str, data: &str) -> String {
	format!(
		"Summarize the recent daily market data for {ticker} below and \
present the key movements to the user in a clear and simple manner. Do not \
make up values that are not in the data.\n\n{data}"
	)
}
