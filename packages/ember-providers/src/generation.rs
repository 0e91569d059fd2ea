use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// One call against the generation service. When `response_schema` is set the
/// model is constrained to structured output; the caller is responsible for
/// parsing the returned text against its own expectations.
pub async fn generate(
	cfg: &ember_config::GenerationProviderConfig,
	prompt: &str,
	response_mime_type: Option<&str>,
	response_schema: Option<&Value>,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/models/{}:generateContent", cfg.api_base, cfg.model);
	let mut generation_config = serde_json::json!({ "temperature": cfg.temperature });

	if let Some(mime) = response_mime_type {
		generation_config["responseMimeType"] = Value::String(mime.to_string());
	}
	if let Some(schema) = response_schema {
		generation_config["responseSchema"] = schema.clone();
	}

	let body = serde_json::json!({
		"contents": [ { "parts": [ { "text": prompt } ] } ],
		"generationConfig": generation_config,
	});
	let res = client
		.post(url)
		.headers(crate::goog_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_generation_response(json)
}

fn parse_generation_response(json: Value) -> Result<String> {
	let parts = json
		.get("candidates")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|candidate| candidate.get("content"))
		.and_then(|content| content.get("parts"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Generation response is missing candidate parts."))?;

	let mut text = String::new();
	for part in parts {
		if let Some(chunk) = part.get("text").and_then(|v| v.as_str()) {
			text.push_str(chunk);
		}
	}

	if text.is_empty() {
		return Err(eyre::eyre!("Generation response contains no text."));
	}

	Ok(text)
}
