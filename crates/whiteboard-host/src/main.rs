use std::process::ExitCode;

use clap::Parser;
use whiteboard_host::{HostArgs, HostError, run, write_document};

fn replay(args: &HostArgs) -> Result<(), HostError> {
    let document = run(args)?;
    match &args.output {
        Some(path) => {
            write_document(&document, path)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", document.to_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting whiteboard-replay");

    let args = HostArgs::parse();
    match replay(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
