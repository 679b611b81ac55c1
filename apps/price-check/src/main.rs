//! farmacia-price-check entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    farmacia_price_check::init_tracing();

    match farmacia_price_check::run(std::env::args().skip(1)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
