use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;

/// Request an attestation token from the TEE launcher endpoint. The nonce is
/// the user-supplied random message; the response body is the raw token.
pub async fn token(cfg: &ember_config::AttestationProviderConfig, nonce: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"nonces": [nonce],
		"token_type": "OIDC",
	});
	let res = client.post(url).json(&body).send().await?;
	let token = res.error_for_status()?.text().await?;
	let token = token.trim();

	if token.is_empty() {
		return Err(eyre::eyre!("Attestation endpoint returned an empty token."));
	}

	Ok(token.to_string())
}
