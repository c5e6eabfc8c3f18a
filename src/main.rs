use clap::Parser;
use spread_etl::EtlError;
use spread_etl::config::fetch_config;
use spread_etl::etl::Etl;

#[derive(Parser, Debug)]
#[command(name = "spread-etl", version, about = "Poll an order book and record its spread")]
struct Cli {
    /// Book to be extracted from the order book API (e.g. btc_mxn)
    #[arg(long)]
    book: String,
}

#[tokio::main]
async fn main() -> Result<(), EtlError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = fetch_config()?;

    let mut etl = Etl::from_config(cli.book, &config)?;
    etl.run().await;

    Ok(())
}
