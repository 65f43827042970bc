//! Bill computation.
//!
//! Every path that produces a bill (adding a customer, editing a reading,
//! starting a new billing cycle) goes through [`recalculate`], so the
//! payment-status reset lives in exactly one place.

use crate::customer::Customer;
use crate::tariff::Tariff;
use log::debug;

/// Flat monthly charge added to every bill before tax.
pub const FIXED_CHARGE: f64 = 50.0;

/// Tax applied to the sum of the consumption charge and the fixed charge.
pub const TAX_RATE: f64 = 0.18;

/// The derived values of one bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub units_consumed: f64,
    pub bill_amount: f64,
    pub billing_date: String,
}

/// Computes the bill for a customer's current readings.
///
/// Always bills at the domestic rate. Reversed readings are not rejected and
/// give negative consumption.
pub fn compute_bill(customer: &Customer, tariff: &Tariff, today: &str) -> Bill {
    let units_consumed = customer.current_reading - customer.previous_reading;
    let raw_charge = units_consumed * tariff.domestic_rate;
    let subtotal = raw_charge + FIXED_CHARGE;
    let bill_amount = subtotal + subtotal * TAX_RATE;

    Bill {
        units_consumed,
        bill_amount,
        billing_date: today.to_string(),
    }
}

/// Writes a bill into the customer and marks it unpaid.
///
/// A new bill supersedes whatever payment was recorded against the old one.
pub fn apply_bill(customer: &mut Customer, bill: &Bill) {
    customer.units_consumed = bill.units_consumed;
    customer.bill_amount = bill.bill_amount;
    customer.billing_date = bill.billing_date.clone();
    customer.is_paid = false;
}

/// Computes and applies a fresh bill, returning it.
pub fn recalculate(customer: &mut Customer, tariff: &Tariff, today: &str) -> Bill {
    let bill = compute_bill(customer, tariff, today);
    apply_bill(customer, &bill);

    debug!(
        "Billed customer {}: {} units, amount {}",
        customer.customer_id, bill.units_consumed, bill.bill_amount
    );

    bill
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "2024-03-09";

    fn customer_with(previous: f64, current: f64) -> Customer {
        let mut c = Customer::new(1001);
        c.previous_reading = previous;
        c.current_reading = current;
        c
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_worked_example() {
        let c = customer_with(100.0, 250.0);
        let bill = compute_bill(&c, &Tariff::default(), TODAY);

        assert_eq!(bill.units_consumed, 150.0);
        assert!(approx(bill.bill_amount, 944.0));
        assert_eq!(bill.billing_date, TODAY);
    }

    #[test]
    fn test_zero_consumption_still_pays_fixed_charge_and_tax() {
        let c = customer_with(400.0, 400.0);
        let bill = compute_bill(&c, &Tariff::default(), TODAY);

        assert_eq!(bill.units_consumed, 0.0);
        assert!(approx(bill.bill_amount, 59.0));
    }

    #[test]
    fn test_only_domestic_rate_is_used() {
        let c = customer_with(0.0, 10.0);
        let tariff = Tariff {
            domestic_rate: 2.0,
            commercial_rate: 100.0,
            industrial_rate: 1000.0,
        };
        let bill = compute_bill(&c, &tariff, TODAY);

        assert!(approx(bill.bill_amount, (10.0 * 2.0 + 50.0) * 1.18));
    }

    #[test]
    fn test_reversed_readings_give_negative_consumption() {
        let c = customer_with(500.0, 100.0);
        let bill = compute_bill(&c, &Tariff::default(), TODAY);

        assert_eq!(bill.units_consumed, -400.0);
        assert!(approx(bill.bill_amount, (-2000.0 + 50.0) * 1.18));
        assert!(bill.bill_amount < 0.0);
    }

    #[test]
    fn test_recalculate_resets_payment() {
        let mut c = customer_with(100.0, 250.0);
        c.is_paid = true;

        let bill = recalculate(&mut c, &Tariff::default(), TODAY);

        assert!(!c.is_paid);
        assert_eq!(c.units_consumed, bill.units_consumed);
        assert_eq!(c.bill_amount, bill.bill_amount);
        assert_eq!(c.billing_date, TODAY);
    }

    #[test]
    fn test_compute_bill_does_not_mutate() {
        let mut c = customer_with(100.0, 250.0);
        c.is_paid = true;
        let before = c.clone();

        let _ = compute_bill(&c, &Tariff::default(), TODAY);
        assert_eq!(c, before);
    }
}
