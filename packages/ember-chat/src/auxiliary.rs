use tracing::info;

use crate::{ChatResponse, ChatService, Error, Result, prompts};

impl ChatService {
	/// Market-data turns: pull the ticker out of the message, fetch its
	/// recent daily quotes, and summarize them without inventing values.
	pub(crate) async fn handle_auxiliary(&self, message: &str) -> Result<ChatResponse> {
		let gen_cfg = &self.cfg.providers.generation;
		let ticker = self
			.providers
			.generation
			.generate(gen_cfg, &prompts::ticker_extraction(message), None, None)
			.await?;
		let ticker = ticker.trim();

		if ticker.is_empty() {
			return Err(Error::Provider {
				message: "Ticker extraction returned no symbol.".to_string(),
			});
		}

		let rows = self
			.providers
			.market_data
			.daily_quotes(&self.cfg.providers.market_data, ticker)
			.await?;

		info!(ticker = %ticker, rows = rows.len(), "Market data fetched.");

		let data = serde_json::to_string(&rows).map_err(|err| Error::Provider {
			message: format!("Failed to encode market data: {err}."),
		})?;
		let summary = self
			.providers
			.generation
			.generate(gen_cfg, &prompts::market_summary(ticker, &data), None, None)
			.await?;

		Ok(ChatResponse { classification: None, response: summary })
	}
}
