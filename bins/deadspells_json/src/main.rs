extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate log;
extern crate deadspells;

use deadspells::frontend::Input;
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

#[derive(Debug)]
enum Error {
    Usage,
    Json(serde_json::Error),
    Io(std::io::Error),
    Engine(deadspells::Error),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<deadspells::Error> for Error {
    fn from(error: deadspells::Error) -> Self {
        Self::Engine(error)
    }
}

fn main() -> Result<(), Error> {
    let _ = env_logger::try_init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.json> [output.json]", args[0]);
        return Err(Error::Usage);
    }
    let in_path_string = &args[1];

    info!("Loading simulation input @ {}", in_path_string);
    let mut json_file_contents = String::new();
    File::open(Path::new(in_path_string))?.read_to_string(&mut json_file_contents)?;
    let input: Input = serde_json::from_str(&json_file_contents)?;
    let output = match deadspells::run(&input) {
        Ok(output) => output,
        Err(e) => {
            error!("Simulation rejected: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Seed {}: {:.1}% of turns without a dead spell",
        output.seed,
        100.0 * output.summary.pct_turns_zero_dead
    );
    match args.get(2) {
        Some(out_path_string) => {
            info!("Writing output @ {}", out_path_string);
            let file = File::create(out_path_string)?;
            serde_json::to_writer_pretty(file, &output)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &output)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}
