use clap::Parser;
use lifeplan::cli::{Cli, Command, run_project};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Serve { port } => {
            if let Err(e) = lifeplan::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(args) => match run_project(&args) {
            Ok(report) => print!("{report}"),
            Err(msg) => {
                eprintln!("{msg}");
                std::process::exit(1);
            }
        },
    }
}
