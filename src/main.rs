use clap::Parser;
use memesmith::config::setup_logging;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = memesmith::cli::CliOptions::parse();

    if let Err(err) = setup_logging(cli.debug) {
        eprintln!("Logging setup error: {}", err);
        return;
    }

    if let Err(err) = memesmith::web::setup_server(&cli.listen_address, cli.port).await {
        error!("Application error: {}", err);
    }
}
