//! HTTP entry point.

use std::sync::Arc;

use campus_voice::config::Config;
use campus_voice::http::App;
use campus_voice::store::Store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let config = Config::from_env();
	let store = Store::connect(&config.database_url).await?;
	let addr = config.bind_addr.parse()?;

	let app = Arc::new(App::new(store, config));
	app.serve(addr).await?;
	Ok(())
}
