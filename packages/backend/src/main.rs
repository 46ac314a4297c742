//! Server entry point for the eCFR metrics backend.

use ecfr_backend::{logging, server, AppConfig};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = server::serve(&config).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
