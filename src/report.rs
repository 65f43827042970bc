//! Text listings and CSV export of the customer collection.
//!
//! All amounts are printed through [`Money`] so they carry two decimals.

use crate::customer::Customer;
use crate::error::Result;
use crate::money::Money;
use crate::repository::Summary;
use crate::tariff::{RateClass, Tariff};
use serde::Serialize;
use std::io::Write;

const NAME_WIDTH: usize = 18;

/// Shortens long names for the fixed-width tables.
fn short_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        let head: String = name.chars().take(15).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Writes the "View All Customers" table.
pub fn write_customer_table<W: Write>(mut out: W, customers: &[Customer]) -> Result<()> {
    writeln!(
        out,
        "{:<10}{:<20}{:<15}{:<12}{:<12}{:<10}",
        "ID", "Name", "Contact", "Units Used", "Bill Amount", "Status"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    for c in customers {
        writeln!(
            out,
            "{:<10}{:<20}{:<15}{:<12.2}{:<12}{:<10}",
            c.customer_id,
            short_name(&c.name),
            c.contact,
            c.units_consumed,
            Money::from_f64(c.bill_amount).to_string(),
            c.status_label()
        )?;
    }

    Ok(())
}

/// Writes the full details of one customer and their current bill.
pub fn write_bill<W: Write>(mut out: W, c: &Customer) -> Result<()> {
    writeln!(out, "Bill Date: {}", c.billing_date)?;
    writeln!(out, "Customer ID: {}", c.customer_id)?;
    writeln!(out, "Customer Name: {}", c.name)?;
    writeln!(out, "Address: {}", c.address)?;
    writeln!(out, "Contact: {}", c.contact)?;
    writeln!(out, "{}", "-".repeat(41))?;
    writeln!(out, "Previous Reading: {:.2} units", c.previous_reading)?;
    writeln!(out, "Current Reading: {:.2} units", c.current_reading)?;
    writeln!(out, "Units Consumed: {:.2} units", c.units_consumed)?;
    writeln!(out, "{}", "-".repeat(41))?;
    writeln!(out, "Bill Amount: Rs. {}", Money::from_f64(c.bill_amount))?;
    writeln!(out, "Payment Status: {}", c.status_label())?;
    Ok(())
}

/// Writes the plain details block shown by a search on customer ID.
pub fn write_details<W: Write>(mut out: W, c: &Customer) -> Result<()> {
    writeln!(out, "Customer ID: {}", c.customer_id)?;
    writeln!(out, "Name: {}", c.name)?;
    writeln!(out, "Address: {}", c.address)?;
    writeln!(out, "Contact: {}", c.contact)?;
    writeln!(out, "Previous Reading: {:.2} units", c.previous_reading)?;
    writeln!(out, "Current Reading: {:.2} units", c.current_reading)?;
    writeln!(out, "Units Consumed: {:.2} units", c.units_consumed)?;
    writeln!(out, "Bill Amount: Rs. {}", Money::from_f64(c.bill_amount))?;
    writeln!(out, "Billing Date: {}", c.billing_date)?;
    writeln!(out, "Payment Status: {}", c.status_label())?;
    Ok(())
}

/// Writes one line per customer, as shown in name search results.
pub fn write_search_line<W: Write>(mut out: W, c: &Customer) -> Result<()> {
    writeln!(
        out,
        "ID: {} | Name: {} | Contact: {} | Bill: Rs. {} | Status: {}",
        c.customer_id,
        c.name,
        c.contact,
        Money::from_f64(c.bill_amount),
        c.status_label()
    )?;
    Ok(())
}

/// Writes a paid or pending bill list followed by its total.
///
/// Returns the number of bills listed.
pub fn write_bill_list<'a, W, I>(mut out: W, bills: I, total_label: &str) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Customer>,
{
    writeln!(
        out,
        "{:<10}{:<20}{:<15}{:<15}",
        "ID", "Name", "Bill Date", "Amount"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;

    let mut listed = 0;
    let mut total = 0.0;
    for c in bills {
        listed += 1;
        total += c.bill_amount;
        writeln!(
            out,
            "{:<10}{:<20}{:<15}{:<15}",
            c.customer_id,
            short_name(&c.name),
            c.billing_date,
            Money::from_f64(c.bill_amount).to_string()
        )?;
    }

    if listed > 0 {
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "{}: Rs. {}", total_label, Money::from_f64(total))?;
    }

    Ok(listed)
}

/// Writes the current tariff rates.
pub fn write_tariff<W: Write>(mut out: W, tariff: &Tariff) -> Result<()> {
    for class in RateClass::ALL {
        writeln!(out, "{} Rate: Rs. {} per unit", class, tariff.rate(class))?;
    }
    Ok(())
}

/// Writes the system report: statistics, then tariff rates.
pub fn write_summary<W: Write>(mut out: W, summary: &Summary, tariff: &Tariff) -> Result<()> {
    writeln!(out, "System Statistics:")?;
    writeln!(out, "------------------")?;
    writeln!(out, "Total Customers: {}", summary.total_customers)?;
    writeln!(out, "Paid Bills: {}", summary.paid_count)?;
    writeln!(out, "Pending Bills: {}", summary.pending_count)?;
    writeln!(
        out,
        "Total Revenue Collected: Rs. {}",
        Money::from_f64(summary.total_revenue_paid)
    )?;
    writeln!(
        out,
        "Total Pending Amount: Rs. {}",
        Money::from_f64(summary.total_pending)
    )?;
    writeln!(out, "------------------")?;
    writeln!(out)?;
    writeln!(out, "Tariff Rates:")?;
    writeln!(out, "-------------")?;
    write_tariff(&mut out, tariff)
}

/// One CSV export row.
#[derive(Debug, Serialize)]
struct CustomerRow<'a> {
    id: i32,
    name: &'a str,
    address: &'a str,
    contact: &'a str,
    previous_reading: f64,
    current_reading: f64,
    units_consumed: f64,
    bill_amount: Money,
    billing_date: &'a str,
    status: &'static str,
}

/// Exports the collection as CSV with a header row.
pub fn write_customers_csv<W: Write>(writer: W, customers: &[Customer]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for c in customers {
        csv_writer.serialize(CustomerRow {
            id: c.customer_id,
            name: &c.name,
            address: &c.address,
            contact: &c.contact,
            previous_reading: c.previous_reading,
            current_reading: c.current_reading,
            units_consumed: c.units_consumed,
            bill_amount: Money::from_f64(c.bill_amount),
            billing_date: &c.billing_date,
            status: c.status_label(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i32, name: &str, amount: f64, paid: bool) -> Customer {
        let mut c = Customer::new(id);
        c.name = name.to_string();
        c.contact = "555-0100".to_string();
        c.previous_reading = 100.0;
        c.current_reading = 250.0;
        c.units_consumed = 150.0;
        c.bill_amount = amount;
        c.billing_date = "2024-03-09".to_string();
        c.is_paid = paid;
        c
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_short_name_truncates_long_names() {
        assert_eq!(short_name("Ann"), "Ann");
        assert_eq!(short_name("Bartholomew Featherstone"), "Bartholomew Fea...");
    }

    #[test]
    fn test_customer_table_row() {
        let text = render(|out| write_customer_table(out, &[customer(1001, "Ann", 944.0, false)]));
        let row = text.lines().nth(2).unwrap();

        assert!(row.starts_with("1001      Ann"));
        assert!(row.contains("150.00"));
        assert!(row.contains("944.00"));
        assert!(row.trim_end().ends_with("PENDING"));
    }

    #[test]
    fn test_bill_details() {
        let text = render(|out| write_bill(out, &customer(1001, "Ann", 944.0, true)));
        assert!(text.contains("Units Consumed: 150.00 units"));
        assert!(text.contains("Bill Amount: Rs. 944.00"));
        assert!(text.contains("Payment Status: PAID"));
    }

    #[test]
    fn test_details_block() {
        let text = render(|out| write_details(out, &customer(1001, "Ann", 944.0, false)));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Customer ID: 1001");
        assert_eq!(lines[1], "Name: Ann");
        assert!(text.contains("Billing Date: 2024-03-09"));
        assert!(text.contains("Bill Amount: Rs. 944.00"));
        assert!(!text.contains("Bill Date:"));
    }

    #[test]
    fn test_bill_list_totals() {
        let bills = [customer(1, "A", 10.0, true), customer(2, "B", 5.5, true)];
        let mut out = Vec::new();
        let listed = write_bill_list(&mut out, &bills, "Total Paid Amount").unwrap();

        assert_eq!(listed, 2);
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Total Paid Amount: Rs. 15.50"));
    }

    #[test]
    fn test_empty_bill_list_has_no_total() {
        let none: [Customer; 0] = [];
        let mut out = Vec::new();
        let listed = write_bill_list(&mut out, &none, "Total Pending Amount").unwrap();

        assert_eq!(listed, 0);
        assert!(!String::from_utf8(out).unwrap().contains("Total"));
    }

    #[test]
    fn test_summary_lists_rates() {
        let summary = Summary {
            total_customers: 2,
            paid_count: 1,
            pending_count: 1,
            total_revenue_paid: 944.0,
            total_pending: 59.0,
        };
        let text = render(|out| write_summary(out, &summary, &Tariff::default()));

        assert!(text.contains("Total Customers: 2"));
        assert!(text.contains("Total Revenue Collected: Rs. 944.00"));
        assert!(text.contains("Total Pending Amount: Rs. 59.00"));
        assert!(text.contains("Domestic Rate: Rs. 5 per unit"));
        assert!(text.contains("Commercial Rate: Rs. 7.5 per unit"));
    }

    #[test]
    fn test_csv_export() {
        let rows = [customer(1001, "Doe, John", 944.0, false)];
        let text = render(|out| write_customers_csv(out, &rows));
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,name,address,contact,previous_reading,current_reading,units_consumed,bill_amount,billing_date,status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1001,\"Doe, John\",,555-0100,100.0,250.0,150.0,944.00,2024-03-09,PENDING"
        );
    }
}
