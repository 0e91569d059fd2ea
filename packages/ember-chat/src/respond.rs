use std::fmt::Write;

use crate::{ChatService, Result, prompts, retrieve::RetrievedDocument, session::Session};

impl ChatService {
	/// Synthesize a grounded answer from the retrieved documents and append
	/// it to the session history. The append happens only after the
	/// generation call succeeds, so a failed or cancelled turn leaves the
	/// history untouched.
	pub(crate) async fn respond(
		&self,
		query: &str,
		retrieved: &[RetrievedDocument],
		session: &mut Session,
	) -> Result<String> {
		let mut prompt = prompts::history_block(session.replies());

		prompt.push_str("List of retrieved documents:\n");

		for (idx, doc) in retrieved.iter().enumerate() {
			// Documents are cited by identifier; fall back to the position
			// for records indexed without one.
			if doc.identifier.is_empty() {
				let _ = write!(prompt, "Document Doc{}:\n{}\n\n", idx + 1, doc.content);
			} else {
				let _ = write!(prompt, "Document {}:\n{}\n\n", doc.identifier, doc.content);
			}
		}

		let _ = write!(prompt, "User query: {query}\n");

		prompt.push_str(prompts::RESPONDER_GUIDELINES);

		let answer = self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &prompt, None, None)
			.await?;

		session.push_reply(answer.clone());

		Ok(answer)
	}
}
