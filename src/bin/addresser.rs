//! Command-line front end: parse addresses and print them as JSON.
//!
//! Run with: cargo run --features cli -- "705 Monterey Pass Rd, Monterey Park, CA 91754"

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use addresser::{Addresser, AddresserConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Addresses to parse. Reads one address per line from stdin when omitted.
    addresses: Vec<String>,
    /// Print a random city instead of parsing.
    #[arg(long)]
    random_city: bool,
    /// Print the known cities as JSON instead of parsing.
    #[arg(long)]
    list_cities: bool,
    /// Directory holding the JSON reference tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Only resolve US states and cities.
    #[arg(long)]
    us_only: bool,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut builder = AddresserConfig::builder().us_only(args.us_only);
    if let Some(dir) = &args.data_dir {
        builder = builder.data_dir(dir.clone());
    }
    let addresser = Addresser::with_config(builder.build())?;

    if args.random_city {
        println!("{}", addresser.random_city()?);
        return Ok(true);
    }
    if args.list_cities {
        println!("{}", serde_json::to_string_pretty(addresser.list_cities())?);
        return Ok(true);
    }

    let addresses = if args.addresses.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
    } else {
        args.addresses.clone()
    };

    let mut all_ok = true;
    for address in addresses.iter().filter(|a| !a.trim().is_empty()) {
        match addresser.parse_address(address) {
            Ok(parsed) => println!("{}", parsed.to_json_pretty()?),
            Err(e) => {
                log::warn!("Failed to parse {address:?}");
                eprintln!("{e}");
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}
