//! # Electricity Billing
//!
//! Record keeping for a utility-billing office: customers, meter readings,
//! computed bills and payment status, persisted to two local binary files.
//!
//! ## Design Principles
//!
//! - **Explicit state**: one [`CustomerRepository`] owns every record and the tariff
//! - **Single billing path**: every bill goes through [`billing::recalculate`],
//!   which also resets the payment status
//! - **Fixed file layout**: length-prefixed native-endian records, see [`codec`]
//! - **Recoverable errors**: missing or unreadable files degrade to empty state
//!
//! ## Example
//!
//! ```
//! use electricity_billing::{CustomerRepository, NewCustomer};
//!
//! let mut repo = CustomerRepository::new();
//! let customer = repo.add(
//!     NewCustomer {
//!         name: "John Doe".into(),
//!         address: "1 Main St".into(),
//!         contact: "555-0100".into(),
//!         previous_reading: 100.0,
//!         current_reading: 250.0,
//!     },
//!     "2024-03-09",
//! );
//! assert_eq!(customer.customer_id, 1001);
//! assert!((customer.bill_amount - 944.0).abs() < 1e-9);
//! ```

pub mod billing;
pub mod codec;
pub mod config;
pub mod customer;
pub mod error;
pub mod money;
pub mod report;
pub mod repository;
pub mod shell;
pub mod storage;
pub mod tariff;

pub use billing::Bill;
pub use config::Config;
pub use customer::{Customer, FieldUpdate, NewCustomer};
pub use error::{BillingError, Result};
pub use money::Money;
pub use repository::{CustomerRepository, Summary};
pub use shell::{Exit, Shell};
pub use storage::Loaded;
pub use tariff::{RateClass, Tariff};
