//! Electricity Billing CLI
//!
//! Loads the customer and tariff files, runs the numbered menu on stdin and
//! saves both files when the user picks "Exit and Save Data".
//!
//! # Usage
//!
//! ```bash
//! cargo run -- /path/to/data-dir
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity
//! - `BILLING_DATA_DIR`: Data directory when no argument is given
//! - `BILLING_CSV_EXPORT`: Also write a CSV export whenever all customers are listed

use electricity_billing::storage::{self, Loaded};
use electricity_billing::{BillingError, Config, CustomerRepository, Exit, Result, Shell, Tariff};
use log::{error, warn};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::resolve(env::args().skip(1), |key| env::var(key).ok());
    let mut repo = load(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let exit = Shell::new(&mut repo, stdin.lock(), stdout.lock(), &config).run()?;

    match exit {
        Exit::Save => {
            save(&config, &repo);
        }
        Exit::EndOfInput => {
            warn!("Input closed before exit was chosen; changes were not saved");
            println!("\nInput closed. Exiting without saving.");
        }
    }

    Ok(())
}

/// Builds the repository from the data files, falling back to empty state.
fn load(config: &Config) -> Result<CustomerRepository> {
    let mut out = io::stdout().lock();

    let customers = match storage::load_customers(&config.customer_file) {
        Ok(Loaded::Found(customers)) => {
            writeln!(out, "Loaded {} customer records.", customers.len())?;
            customers
        }
        Ok(Loaded::Missing) => {
            writeln!(out, "No existing data found. Starting with empty database.")?;
            Vec::new()
        }
        Err(e) => {
            warn!("Could not load {}: {}", config.customer_file.display(), e);
            writeln!(out, "Could not read customer data ({}). Starting with empty database.", e)?;
            set_aside(&mut out, &config.customer_file, &e)?;
            Vec::new()
        }
    };

    let tariff = match storage::load_tariff(&config.tariff_file) {
        Ok(loaded) => {
            if loaded.is_missing() {
                writeln!(out, "No tariff data found. Using default rates.")?;
            }
            loaded.unwrap_or(Tariff::default())
        }
        Err(e) => {
            warn!("Could not load {}: {}", config.tariff_file.display(), e);
            writeln!(out, "Could not read tariff data ({}). Using default rates.", e)?;
            set_aside(&mut out, &config.tariff_file, &e)?;
            Tariff::default()
        }
    };

    Ok(CustomerRepository::with_state(customers, tariff))
}

/// Moves a file that failed to decode out of the way of the next save.
fn set_aside<W: Write>(mut out: W, path: &Path, err: &BillingError) -> Result<()> {
    if !matches!(err, BillingError::Corrupt { .. }) {
        return Ok(());
    }

    match storage::quarantine(path) {
        Ok(moved) => writeln!(out, "The unreadable file was kept as {}.", moved.display())?,
        Err(e) => {
            error!("Could not move {} aside: {}", path.display(), e);
            writeln!(
                out,
                "Warning: {} could not be moved aside and will be overwritten on save.",
                path.display()
            )?;
        }
    }
    Ok(())
}

/// Writes both data files. Failures are reported and leave memory untouched.
fn save(config: &Config, repo: &CustomerRepository) {
    let mut ok = true;

    if let Err(e) = storage::save_customers(&config.customer_file, repo.customers()) {
        error!("Saving {} failed: {}", config.customer_file.display(), e);
        println!("Error saving data to file! ({})", e);
        ok = false;
    }

    if let Err(e) = storage::save_tariff(&config.tariff_file, repo.tariff()) {
        error!("Saving {} failed: {}", config.tariff_file.display(), e);
        println!("Error saving tariff data! ({})", e);
        ok = false;
    }

    if ok {
        println!("\nData saved successfully. Exiting...");
    }
}
