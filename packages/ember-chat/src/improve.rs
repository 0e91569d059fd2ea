use tracing::{info, warn};

use crate::{ChatService, prompts, session::Session};

/// Length cap the rewrite instructions ask for. Outputs far beyond it are
/// treated as malformed.
pub(crate) const MAX_IMPROVED_QUERY_CHARS: usize = 300;

impl ChatService {
	/// Best-effort query rewrite against the recent conversation. Whatever
	/// goes wrong, the caller gets a usable query back; the worst case is the
	/// original one.
	pub(crate) async fn improve_query(&self, query: &str, session: &Session) -> String {
		let history = prompts::history_block(session.replies());
		let prompt = prompts::query_improvement(query, &history);
		let raw = match self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &prompt, None, None)
			.await
		{
			Ok(text) => text,
			Err(err) => {
				warn!(error = %err, "Query improvement failed; keeping the original query.");

				return query.to_string();
			},
		};

		match accept_rewrite(&raw) {
			Some(improved) => {
				info!(improved_query = %improved, "Query improved.");

				improved
			},
			None => {
				warn!("Query improvement returned unusable output; keeping the original query.");

				query.to_string()
			},
		}
	}
}

/// A usable rewrite is non-empty and within a generous margin of the
/// requested length cap; the cap itself is an instruction to the model, not a
/// truncation rule.
pub(crate) fn accept_rewrite(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() || trimmed.chars().count() > MAX_IMPROVED_QUERY_CHARS * 2 {
		return None;
	}

	Some(trimmed.to_string())
}
