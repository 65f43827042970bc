//! Runtime configuration resolved at startup.

use std::path::PathBuf;

/// Environment variable naming the data directory.
pub const DATA_DIR_VAR: &str = "BILLING_DATA_DIR";

/// Environment variable naming an optional CSV export path.
pub const CSV_EXPORT_VAR: &str = "BILLING_CSV_EXPORT";

pub const CUSTOMER_FILE_NAME: &str = "customers.dat";
pub const TARIFF_FILE_NAME: &str = "tariff.dat";

/// Where the data files live.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub customer_file: PathBuf,
    pub tariff_file: PathBuf,

    /// When set, "View All Customers" also writes the collection here as CSV.
    pub csv_export: Option<PathBuf>,
}

impl Config {
    /// Builds the configuration for a data directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Config {
            customer_file: dir.join(CUSTOMER_FILE_NAME),
            tariff_file: dir.join(TARIFF_FILE_NAME),
            csv_export: None,
        }
    }

    /// Resolves the data directory from the first positional argument, then
    /// `BILLING_DATA_DIR`, then the working directory.
    ///
    /// `args` excludes the program name. `lookup` reads an environment
    /// variable; `main` passes a closure over `std::env::var`.
    pub fn resolve<I, F>(args: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let dir = args
            .into_iter()
            .next()
            .or_else(|| lookup(DATA_DIR_VAR))
            .unwrap_or_else(|| ".".to_string());

        let mut config = Config::in_dir(dir);
        config.csv_export = lookup(CSV_EXPORT_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::in_dir(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_working_directory() {
        let config = Config::resolve(Vec::new(), env(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.customer_file, PathBuf::from("./customers.dat"));
        assert_eq!(config.tariff_file, PathBuf::from("./tariff.dat"));
    }

    #[test]
    fn test_argument_beats_environment() {
        let config = Config::resolve(
            vec!["/srv/billing".to_string()],
            env(&[(DATA_DIR_VAR, "/tmp/other")]),
        );
        assert_eq!(config.customer_file, PathBuf::from("/srv/billing/customers.dat"));
    }

    #[test]
    fn test_environment_dir_and_export() {
        let config = Config::resolve(
            Vec::new(),
            env(&[(DATA_DIR_VAR, "/var/lib/billing"), (CSV_EXPORT_VAR, "out.csv")]),
        );
        assert_eq!(config.tariff_file, PathBuf::from("/var/lib/billing/tariff.dat"));
        assert_eq!(config.csv_export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_empty_export_is_ignored() {
        let config = Config::resolve(Vec::new(), env(&[(CSV_EXPORT_VAR, "")]));
        assert!(config.csv_export.is_none());
    }
}
