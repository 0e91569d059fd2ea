use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = ember_api::Args::parse();
	ember_api::run(args).await
}
