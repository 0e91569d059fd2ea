pub mod attestation;
pub mod embedding;
pub mod generation;
pub mod market;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

const GOOG_API_KEY_HEADER: &str = "x-goog-api-key";

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	append_default_headers(&mut headers, default_headers)?;
	Ok(headers)
}

pub fn goog_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	headers.insert(HeaderName::from_static(GOOG_API_KEY_HEADER), api_key.parse()?);
	append_default_headers(&mut headers, default_headers)?;
	Ok(headers)
}

fn append_default_headers(
	headers: &mut HeaderMap,
	default_headers: &Map<String, Value>,
) -> Result<()> {
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};
		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}
	Ok(())
}
