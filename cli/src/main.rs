use clap::Parser;
use exo_cli::{cmd::GlobalArgs, util};

#[tokio::main]
async fn main() {
    let app = GlobalArgs::parse();
    util::init_logger(app.verbose);
    app.exec_subcmd().await.unwrap_or_else(|e| {
        log::error!("{:#}", e);
        std::process::exit(1);
    });
}
