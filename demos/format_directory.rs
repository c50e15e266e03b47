//! Round-trip every TOML file in a directory tree through the decoder and
//! encoder, writing back the canonical encoding.
//!
//! Usage:
//!   cargo run --example format_directory [PATH]
//!
//! If no path is provided, it formats the current directory.

use std::env;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: {} [PATH]", args[0]);
        println!();
        println!("Round-trip every TOML file in a directory tree through");
        println!("loads()/dumps(), rewriting each file to its canonical form.");
        return;
    }

    let path = args.get(1).map(|s| s.as_str()).unwrap_or(".");
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: Path '{}' does not exist", path.display());
        std::process::exit(1);
    }

    println!("Formatting TOML files in: {}", path.display());

    let mut formatted_count = 0;
    let mut error_count = 0;

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                eprintln!("Error walking directory: {}", err);
                error_count += 1;
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().and_then(|s| s.to_str()) != Some("toml") {
            continue;
        }

        match fs::read_to_string(file_path) {
            Ok(source) => match toml_rt::loads(&source).and_then(|table| toml_rt::dumps(&table)) {
                Ok(formatted) => match fs::write(file_path, formatted) {
                    Ok(()) => {
                        println!("Formatted: {}", file_path.display());
                        formatted_count += 1;
                    }
                    Err(err) => {
                        eprintln!("Error writing {}: {}", file_path.display(), err);
                        error_count += 1;
                    }
                },
                Err(err) => {
                    eprintln!("Error parsing {}: {}", file_path.display(), err);
                    error_count += 1;
                }
            },
            Err(err) => {
                eprintln!("Error reading {}: {}", file_path.display(), err);
                error_count += 1;
            }
        }
    }

    println!("\nSummary:");
    println!("  Formatted: {}", formatted_count);
    println!("  Errors: {}", error_count);

    if error_count > 0 {
        std::process::exit(1);
    }
}
