use std::{
	collections::{HashMap, VecDeque},
	sync::{Arc, Mutex},
};

/// State for one logical conversation: the bounded rolling history of prior
/// answers plus the attestation gate flag. Mutated only by the synthesizer
/// (appends) and the gate (flag toggles).
pub struct Session {
	history: VecDeque<String>,
	context_size: usize,
	pub attestation_requested: bool,
}

impl Session {
	pub fn new(context_size: usize) -> Self {
		Self {
			history: VecDeque::with_capacity(context_size),
			context_size,
			attestation_requested: false,
		}
	}

	/// Append an answer, evicting the oldest entry once the history is full.
	pub fn push_reply(&mut self, reply: String) {
		if self.history.len() == self.context_size {
			self.history.pop_front();
		}
		self.history.push_back(reply);
	}

	/// Prior answers, oldest first.
	pub fn replies(&self) -> &VecDeque<String> {
		&self.history
	}
}

/// Sessions keyed by caller-supplied id. Each session sits behind its own
/// async mutex so turns within one conversation are processed strictly in
/// arrival order while unrelated conversations run in parallel.
pub struct SessionStore {
	context_size: usize,
	sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionStore {
	pub fn new(context_size: usize) -> Self {
		Self { context_size, sessions: Mutex::new(HashMap::new()) }
	}

	pub fn session(&self, id: &str) -> Arc<tokio::sync::Mutex<Session>> {
		let mut sessions = self.sessions.lock().unwrap_or_else(|err| err.into_inner());

		sessions
			.entry(id.to_string())
			.or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::new(self.context_size))))
			.clone()
	}

	/// A one-shot session for requests that carry no session id. It is never
	/// stored, so anonymous turns can never share context.
	pub fn ephemeral(&self) -> Arc<tokio::sync::Mutex<Session>> {
		Arc::new(tokio::sync::Mutex::new(Session::new(self.context_size)))
	}
}
