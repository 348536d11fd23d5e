use clap::Parser;

use fincalc::api::cli::{Cli, run};
use fincalc::config::CalculatorDefaults;
use fincalc::logging::{LoggingConfig, init_logging};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if let Err(e) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();
    match run(cli, CalculatorDefaults::from_env()).await {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
