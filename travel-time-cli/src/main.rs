//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[tokio::main]
async fn main() {
    travel_time_cli::init_logging();
    if let Err(err) = travel_time_cli::run().await {
        eprintln!("travel-time: {err}");
        std::process::exit(1);
    }
}
