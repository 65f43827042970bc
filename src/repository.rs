//! Customer collection and the operations over it.
//!
//! The repository owns every customer record and the tariff. It is built once
//! at startup from whatever the data files held and handed to the shell by
//! mutable reference; nothing here touches the filesystem.

use crate::billing::{self, Bill};
use crate::customer::{Customer, FieldUpdate, NewCustomer};
use crate::error::{BillingError, Result};
use crate::tariff::{RateClass, Tariff};
use log::{debug, info};

/// Totals across the whole collection, split by payment status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total_customers: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub total_revenue_paid: f64,
    pub total_pending: f64,
}

/// The customer collection plus the tariff it is billed against.
///
/// # ID Assignment
///
/// A new customer gets `max(existing ids) + 1`. Only when the collection is
/// empty does the fallback counter advance (seeded at 1000, so the first ID is
/// 1001). Deleting the highest-ID customer therefore lets a later add reuse
/// that ID.
#[derive(Debug)]
pub struct CustomerRepository {
    /// Records in insertion order.
    customers: Vec<Customer>,

    tariff: Tariff,

    /// Last ID issued while the collection was empty.
    last_id: i32,
}

impl CustomerRepository {
    /// Seed for the empty-collection ID counter.
    pub const ID_SEED: i32 = 1000;

    /// Creates an empty repository with the default tariff.
    pub fn new() -> Self {
        Self::with_state(Vec::new(), Tariff::default())
    }

    /// Creates a repository from previously loaded state.
    pub fn with_state(customers: Vec<Customer>, tariff: Tariff) -> Self {
        CustomerRepository {
            customers,
            tariff,
            last_id: Self::ID_SEED,
        }
    }

    /// All customers in collection order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Adds a customer and computes their first bill.
    pub fn add(&mut self, new: NewCustomer, today: &str) -> &Customer {
        let id = self.next_id();

        let mut customer = Customer::new(id);
        customer.name = new.name;
        customer.address = new.address;
        customer.contact = new.contact;
        customer.previous_reading = new.previous_reading;
        customer.current_reading = new.current_reading;
        billing::recalculate(&mut customer, &self.tariff, today);

        info!("Added customer {} ({})", id, customer.name);
        self.customers.push(customer);

        // Safety: pushed just above
        self.customers.last().expect("customer was just added")
    }

    /// Returns the first customer with the given ID.
    pub fn find_by_id(&self, id: i32) -> Option<&Customer> {
        self.customers.iter().find(|c| c.customer_id == id)
    }

    /// Customers whose name contains `fragment`, ignoring case, in collection order.
    ///
    /// An empty fragment matches everyone.
    pub fn find_by_name<'a>(&'a self, fragment: &str) -> impl Iterator<Item = &'a Customer> + 'a {
        let needle = fragment.to_lowercase();
        self.customers
            .iter()
            .filter(move |c| c.name_contains(&needle))
    }

    /// Customers whose current bill is settled.
    pub fn paid(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().filter(|c| c.is_paid)
    }

    /// Customers whose current bill is outstanding.
    pub fn pending(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().filter(|c| !c.is_paid)
    }

    /// Edits one field. Reading edits recompute the bill, which also marks it unpaid.
    pub fn update_field(&mut self, id: i32, update: FieldUpdate, today: &str) -> Result<&Customer> {
        let tariff = self.tariff;
        let customer = self.get_mut(id)?;

        let rebill = update.changes_reading();
        update.apply_to(customer);
        if rebill {
            billing::recalculate(customer, &tariff, today);
        }

        debug!("Updated customer {} (rebilled: {})", id, rebill);
        Ok(customer)
    }

    /// Starts a new billing cycle: the current reading becomes the previous one.
    pub fn generate_bill(&mut self, id: i32, new_current_reading: f64, today: &str) -> Result<Bill> {
        let tariff = self.tariff;
        let customer = self.get_mut(id)?;

        customer.previous_reading = customer.current_reading;
        customer.current_reading = new_current_reading;
        let bill = billing::recalculate(customer, &tariff, today);

        info!(
            "Generated bill for customer {}: {} units",
            id, bill.units_consumed
        );
        Ok(bill)
    }

    /// Removes a customer and returns the record.
    pub fn delete(&mut self, id: i32) -> Result<Customer> {
        let pos = self
            .customers
            .iter()
            .position(|c| c.customer_id == id)
            .ok_or(BillingError::NotFound { id })?;

        let removed = self.customers.remove(pos);
        info!("Deleted customer {}", id);
        Ok(removed)
    }

    /// Records payment of the current bill.
    pub fn mark_paid(&mut self, id: i32) -> Result<&Customer> {
        let customer = self.get_mut(id)?;
        if customer.is_paid {
            return Err(BillingError::AlreadyPaid { id });
        }

        customer.is_paid = true;
        info!("Customer {} paid {}", id, customer.bill_amount);
        Ok(customer)
    }

    /// Replaces one tariff rate. Existing bills are not recomputed.
    pub fn update_tariff(&mut self, class: RateClass, rate: f64) {
        self.tariff.set_rate(class, rate);
        info!("{} rate set to {}", class, rate);
    }

    /// Counts and sums bills by payment status in one pass.
    pub fn aggregate(&self) -> Summary {
        self.customers
            .iter()
            .fold(
                Summary {
                    total_customers: self.customers.len(),
                    ..Summary::default()
                },
                |mut s, c| {
                    if c.is_paid {
                        s.paid_count += 1;
                        s.total_revenue_paid += c.bill_amount;
                    } else {
                        s.pending_count += 1;
                        s.total_pending += c.bill_amount;
                    }
                    s
                },
            )
    }

    fn get_mut(&mut self, id: i32) -> Result<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.customer_id == id)
            .ok_or(BillingError::NotFound { id })
    }

    fn next_id(&mut self) -> i32 {
        match self.customers.iter().map(|c| c.customer_id).max() {
            Some(max) => max + 1,
            None => {
                self.last_id += 1;
                self.last_id
            }
        }
    }
}

impl Default for CustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}
