use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRow {
	pub date: String,
	pub open: String,
	pub high: String,
	pub low: String,
	pub close: String,
	pub volume: String,
}

pub async fn daily_quotes(
	cfg: &ember_config::MarketDataProviderConfig,
	ticker: &str,
) -> Result<Vec<QuoteRow>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client.get(url).query(&[("symbol", ticker)]).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_quotes_response(json)
}

fn parse_quotes_response(json: Value) -> Result<Vec<QuoteRow>> {
	let rows = if json.is_array() {
		json
	} else {
		json.get("quotes")
			.cloned()
			.ok_or_else(|| eyre::eyre!("Market data response is missing the quotes array."))?
	};
	let rows: Vec<QuoteRow> = serde_json::from_value(rows)
		.map_err(|_| eyre::eyre!("Market data rows have an unrecognized shape."))?;

	if rows.is_empty() {
		return Err(eyre::eyre!("Market data response contains no rows."));
	}

	Ok(rows)
}
