// src/main.rs

use hostboot::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("hostboot error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run_main() -> hostboot::errors::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
