mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = cli::run().await {
        cli::error_exit(error);
    }
}
