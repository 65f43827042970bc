//! Customer record model.

/// One billed account.
///
/// # Derived Fields
///
/// `units_consumed`, `bill_amount` and `billing_date` are written only by
/// [`crate::billing::apply_bill`]. Callers edit readings and let the billing
/// engine recompute the rest.
///
/// # Reading Order
///
/// `current_reading >= previous_reading` is expected but not enforced. A
/// reversed pair produces negative consumption and possibly a negative bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Unique customer identifier, fixed at creation.
    pub customer_id: i32,

    pub name: String,
    pub address: String,
    pub contact: String,

    /// Meter reading at the start of the billing cycle.
    pub previous_reading: f64,

    /// Meter reading at the end of the billing cycle.
    pub current_reading: f64,

    /// `current_reading - previous_reading` as of the last bill.
    pub units_consumed: f64,

    /// Total charge of the last bill, tax included.
    pub bill_amount: f64,

    /// Date the last bill was computed, `YYYY-MM-DD`.
    pub billing_date: String,

    /// Whether the last bill has been settled.
    pub is_paid: bool,
}

impl Customer {
    /// Creates a record with the given ID and zeroed readings and bill.
    pub fn new(customer_id: i32) -> Self {
        Customer {
            customer_id,
            name: String::new(),
            address: String::new(),
            contact: String::new(),
            previous_reading: 0.0,
            current_reading: 0.0,
            units_consumed: 0.0,
            bill_amount: 0.0,
            billing_date: String::new(),
            is_paid: false,
        }
    }

    /// Returns the label shown in listings for the payment status.
    pub fn status_label(&self) -> &'static str {
        if self.is_paid {
            "PAID"
        } else {
            "PENDING"
        }
    }

    /// Case-insensitive substring test against the customer's name.
    ///
    /// `fragment_lower` must already be lowercased.
    pub(crate) fn name_contains(&self, fragment_lower: &str) -> bool {
        self.name.to_lowercase().contains(fragment_lower)
    }
}

/// Values supplied when a customer is first added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub previous_reading: f64,
    pub current_reading: f64,
}

/// A single field edit applied by the update operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Address(String),
    Contact(String),
    PreviousReading(f64),
    CurrentReading(f64),
}

impl FieldUpdate {
    /// Returns `true` if the edit changes a meter reading and so needs a new bill.
    pub fn changes_reading(&self) -> bool {
        matches!(
            self,
            FieldUpdate::PreviousReading(_) | FieldUpdate::CurrentReading(_)
        )
    }

    /// Writes the new value into the customer. Derived fields are left alone.
    pub(crate) fn apply_to(self, customer: &mut Customer) {
        match self {
            FieldUpdate::Name(v) => customer.name = v,
            FieldUpdate::Address(v) => customer.address = v,
            FieldUpdate::Contact(v) => customer.contact = v,
            FieldUpdate::PreviousReading(v) => customer.previous_reading = v,
            FieldUpdate::CurrentReading(v) => customer.current_reading = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_is_zeroed_and_unpaid() {
        let c = Customer::new(1001);
        assert_eq!(c.customer_id, 1001);
        assert!(c.name.is_empty());
        assert_eq!(c.bill_amount, 0.0);
        assert!(!c.is_paid);
        assert_eq!(c.status_label(), "PENDING");
    }

    #[test]
    fn test_name_contains_is_substring_not_prefix() {
        let mut c = Customer::new(1);
        c.name = "Marjorie Stone".to_string();
        assert!(c.name_contains("jo"));
        assert!(c.name_contains("stone"));
        assert!(!c.name_contains("john"));
    }

    #[test]
    fn test_field_update_writes_only_its_field() {
        let mut c = Customer::new(1);
        c.current_reading = 300.0;
        c.bill_amount = 12.0;

        FieldUpdate::PreviousReading(120.0).apply_to(&mut c);
        assert_eq!(c.previous_reading, 120.0);
        assert_eq!(c.current_reading, 300.0);
        assert_eq!(c.bill_amount, 12.0);

        FieldUpdate::Contact("555-0100".to_string()).apply_to(&mut c);
        assert_eq!(c.contact, "555-0100");
    }

    #[test]
    fn test_only_reading_edits_need_rebilling() {
        assert!(FieldUpdate::PreviousReading(1.0).changes_reading());
        assert!(FieldUpdate::CurrentReading(1.0).changes_reading());
        assert!(!FieldUpdate::Name("x".into()).changes_reading());
        assert!(!FieldUpdate::Address("x".into()).changes_reading());
        assert!(!FieldUpdate::Contact("x".into()).changes_reading());
    }
}
