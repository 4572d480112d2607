// Terminal front-end for the summary workflow

#[path = "../cli.rs"]
mod cli;

#[tokio::main]
async fn main() {
    booksum::setup_logging();

    if let Err(err) = cli::run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
