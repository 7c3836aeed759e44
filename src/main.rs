//! resume – render a resume data file into a PDF.
//!
//! Usage:
//!   resume [data.json] [--variant designed|ats] [--format a4|letter|legal]
//!          [--out-dir DIR] [--html]
//!
//! The PDF is named after the person in the data and written next to the data
//! file unless `--out-dir` says otherwise.

use std::{env, process};

use resume_forge::config::{Invocation, USAGE};
use resume_forge::{run, ForgeEngine, RunConfig};

fn main() {
    env_logger::init();

    let config = match RunConfig::from_args(env::args().skip(1)) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            eprintln!("{USAGE}");
            process::exit(0);
        }
        Err(msg) => {
            eprintln!("Error: {msg}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    match run(&config, &ForgeEngine) {
        Ok(summary) => {
            if let Some(html) = &summary.html {
                eprintln!("Wrote markup '{}'", html.display());
            }
            println!(
                "Resume PDF ({}) generated at {} ({} bytes)",
                summary.variant,
                summary.output.display(),
                summary.bytes
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
