pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Classifier error: {message}")]
	Classifier { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<ember_storage::Error> for Error {
	fn from(err: ember_storage::Error) -> Self {
		match err {
			ember_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}
