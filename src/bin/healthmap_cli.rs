//! CLI tool for healthmap - renders the facility workbook as a Leaflet page
//!
//! Usage:
//!   healthmap                              # Default workbook, HTML to stdout
//!   healthmap <input.xlsx>                 # HTML to stdout
//!   healthmap <input.xlsx> -o map.html     # HTML to file
//!
//! Set `RUST_LOG=debug` to see per-sheet loading details on stderr.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use healthmap::config::DashboardConfig;
use healthmap::dashboard::render_dashboard;

fn usage() -> ! {
    eprintln!("Usage: healthmap [input.xlsx] [-o output.html]");
    std::process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut config = DashboardConfig::default();
    let mut output_path: Option<String> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" => match iter.next() {
                Some(path) => output_path = Some(path),
                None => usage(),
            },
            "-h" | "--help" => usage(),
            _ => config.input_path = PathBuf::from(arg),
        }
    }

    log::info!("reading {}", config.input_path.display());

    let html = match render_dashboard(&config) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &html) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            if let Err(e) = io::stdout().write_all(html.as_bytes()) {
                eprintln!("Error writing stdout: {}", e);
                std::process::exit(1);
            }
        }
    }
}
