use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = bt_worker::Args::parse();

	bt_worker::run(args).await
}
