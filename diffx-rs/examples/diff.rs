//! Example: Print the line diff between two text files
//!
//! Usage: cargo run --example diff <from.txt> <to.txt> [algorithm]

use std::env;
use std::fs;
use std::io;

use diffx::{Algorithm, DiffConfig, DiffProcessor, ShortFormatter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <from.txt> <to.txt> [algorithm]", args[0]);
        std::process::exit(1);
    }

    let algorithm: Algorithm = match args.get(3) {
        Some(name) => name.parse()?,
        None => DiffConfig::default().algorithm,
    };

    let from_text = fs::read_to_string(&args[1])?;
    let to_text = fs::read_to_string(&args[2])?;
    let from: Vec<&str> = from_text.lines().collect();
    let to: Vec<&str> = to_text.lines().collect();

    eprintln!("Diffing {} and {} lines with {}", from.len(), to.len(), algorithm);
    let mut formatter = ShortFormatter::new(io::stdout().lock());
    DiffProcessor::new(DiffConfig::new(algorithm)).diff(&from, &to, &mut formatter)?;
    formatter.finish()?;

    Ok(())
}
