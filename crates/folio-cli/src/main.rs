use std::process::ExitCode;

use clap::Parser;
use folio_cli::{CliArgs, FolioCli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let result = match FolioCli::from_args("folio", &args) {
        Ok(cli) => cli.run(args).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
