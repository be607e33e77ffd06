use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pangeascrape::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity. Page progress is the
    // program's main diagnostic output, so it stays on by default.
    let default_filter = if cli::is_verbose() {
        "pangeascrape=debug"
    } else {
        "pangeascrape=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
