//! Epitaph's main application entry point.

use epitaph::{
    cli::get_args,
    config::AppConfig,
    error::{default_error_handler, Result},
    logger::init_logger,
    server::serve,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    let config = AppConfig::from_args(&args);
    if let Err(err) = run(config) {
        default_error_handler(err);
    }
}

#[tokio::main]
async fn run(config: AppConfig) -> Result<()> {
    serve(config).await
}
