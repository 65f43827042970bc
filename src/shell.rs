//! Numbered-menu front end over the repository.
//!
//! The shell owns all prompting and validation. Every value it hands to the
//! repository is already checked: readings and IDs are non-negative numbers.
//! Closing the input stream ends the session without saving.

use crate::config::Config;
use crate::customer::{Customer, FieldUpdate, NewCustomer};
use crate::error::{BillingError, Result};
use crate::money::Money;
use crate::report;
use crate::repository::CustomerRepository;
use crate::tariff::RateClass;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user chose "Exit and Save Data".
    Save,

    /// Input ran out before the user chose to exit.
    EndOfInput,
}

/// Today's local date as `YYYY-MM-DD`.
pub fn local_today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// `Ok(None)` means the input stream closed while waiting for an answer.
type Step<T> = Result<Option<T>>;

const MENU: &str = "\
=========================================
   ELECTRICITY BILLING SYSTEM
=========================================
1. Add New Customer
2. Generate Electricity Bill
3. View All Customers
4. Search Customer
5. Update Customer Details
6. Delete Customer
7. Pay Bill
8. View Paid Bills
9. View Pending Bills
10. Update Tariff Rates
11. Generate Report
12. Exit and Save Data
=========================================";

/// Interactive session state.
pub struct Shell<'a, R, W> {
    repo: &'a mut CustomerRepository,
    input: R,
    out: W,
    today: Box<dyn Fn() -> String + 'a>,
    csv_export: Option<PathBuf>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Creates a session that reads today's date from the local clock.
    pub fn new(repo: &'a mut CustomerRepository, input: R, out: W, config: &Config) -> Self {
        Shell {
            repo,
            input,
            out,
            today: Box::new(local_today),
            csv_export: config.csv_export.clone(),
        }
    }

    /// Replaces the date source used to stamp bills.
    pub fn with_clock(mut self, today: impl Fn() -> String + 'a) -> Self {
        self.today = Box::new(today);
        self
    }

    /// Runs menu iterations until the user exits or input ends.
    pub fn run(&mut self) -> Result<Exit> {
        loop {
            writeln!(self.out, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Exit::EndOfInput);
            };

            let handled = match choice.trim().parse::<u32>() {
                Ok(1) => self.add_customer()?,
                Ok(2) => self.generate_bill()?,
                Ok(3) => self.view_all()?,
                Ok(4) => self.search()?,
                Ok(5) => self.update_customer()?,
                Ok(6) => self.delete_customer()?,
                Ok(7) => self.pay_bill()?,
                Ok(8) => self.view_paid()?,
                Ok(9) => self.view_pending()?,
                Ok(10) => self.update_tariff()?,
                Ok(11) => self.report()?,
                Ok(12) => return Ok(Exit::Save),
                _ => {
                    debug!("Rejected menu input {:?}", choice.trim());
                    writeln!(self.out, "\nInvalid choice! Please try again.")?;
                    Some(())
                }
            };

            if handled.is_none() {
                return Ok(Exit::EndOfInput);
            }
            writeln!(self.out)?;
        }
    }

    fn prompt(&mut self, text: &str) -> Step<String> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Re-prompts until the answer is a non-negative number.
    fn prompt_reading(&mut self, text: &str) -> Step<f64> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };
            match line.trim().parse::<f64>() {
                Ok(v) if v >= 0.0 && v.is_finite() => return Ok(Some(v)),
                _ => writeln!(
                    self.out,
                    "Invalid input! Please enter a non-negative number."
                )?,
            }
        }
    }

    /// Re-prompts until the answer is a non-negative integer.
    fn prompt_id(&mut self, text: &str) -> Step<i32> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };
            match line.trim().parse::<i32>() {
                Ok(v) if v >= 0 => return Ok(Some(v)),
                _ => writeln!(
                    self.out,
                    "Invalid input! Please enter a non-negative integer."
                )?,
            }
        }
    }

    /// Yes when the first non-blank character is `y` or `Y`.
    fn confirm(&mut self, text: &str) -> Step<bool> {
        let answer = self.prompt(text)?;
        Ok(answer.map(|a| is_yes(&a)))
    }

    /// Reads an ID and resolves it, printing the not-found message on a miss.
    fn prompt_existing(&mut self, text: &str) -> Step<Option<i32>> {
        let Some(id) = self.prompt_id(text)? else {
            return Ok(None);
        };

        if self.repo.find_by_id(id).is_some() {
            Ok(Some(Some(id)))
        } else {
            writeln!(self.out, "{}", BillingError::NotFound { id })?;
            Ok(Some(None))
        }
    }

    /// Prints the empty-collection notice. Returns `true` if there was nothing to act on.
    fn no_customers(&mut self, notice: &str) -> Result<bool> {
        if self.repo.is_empty() {
            writeln!(self.out, "{}", notice)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn add_customer(&mut self) -> Step<()> {
        writeln!(self.out, "=== ADD NEW CUSTOMER ===\n")?;

        let Some(name) = self.prompt("Enter Customer Name: ")? else {
            return Ok(None);
        };
        let Some(address) = self.prompt("Enter Address: ")? else {
            return Ok(None);
        };
        let Some(contact) = self.prompt("Enter Contact Number: ")? else {
            return Ok(None);
        };
        let Some(previous_reading) = self.prompt_reading("Enter Previous Meter Reading: ")? else {
            return Ok(None);
        };
        let Some(current_reading) = self.prompt_reading("Enter Current Meter Reading: ")? else {
            return Ok(None);
        };

        let today = (self.today)();
        let new = NewCustomer {
            name,
            address,
            contact,
            previous_reading,
            current_reading,
        };
        let id = self.repo.add(new, &today).customer_id;

        writeln!(self.out, "\nCustomer added successfully!")?;
        writeln!(self.out, "Generated Customer ID: {}", id)?;
        Ok(Some(()))
    }

    fn generate_bill(&mut self) -> Step<()> {
        writeln!(self.out, "=== GENERATE ELECTRICITY BILL ===\n")?;
        if self.no_customers("No customers found! Please add customers first.")? {
            return Ok(Some(()));
        }

        let Some(found) = self.prompt_existing("Enter Customer ID: ")? else {
            return Ok(None);
        };
        let Some(id) = found else {
            return Ok(Some(()));
        };

        writeln!(self.out, "\nEnter new meter reading for billing:")?;
        let Some(reading) = self.prompt_reading("Enter Current Meter Reading: ")? else {
            return Ok(None);
        };

        let today = (self.today)();
        self.repo.generate_bill(id, reading, &today)?;
        self.print_bill(id)?;
        Ok(Some(()))
    }

    fn print_bill(&mut self, id: i32) -> Result<()> {
        let customer = self
            .repo
            .find_by_id(id)
            .ok_or(BillingError::NotFound { id })?;

        writeln!(self.out, "=========================================")?;
        writeln!(self.out, "        ELECTRICITY BILL")?;
        writeln!(self.out, "=========================================")?;
        report::write_bill(&mut self.out, customer)?;
        writeln!(self.out, "=========================================")?;
        Ok(())
    }

    fn view_all(&mut self) -> Step<()> {
        writeln!(self.out, "=== ALL CUSTOMERS ===\n")?;
        if self.no_customers("No customers found!")? {
            return Ok(Some(()));
        }

        report::write_customer_table(&mut self.out, self.repo.customers())?;

        if let Some(path) = self.csv_export.clone() {
            match self.export_csv(&path) {
                Ok(()) => writeln!(
                    self.out,
                    "\nExported {} customers to {}",
                    self.repo.len(),
                    path.display()
                )?,
                Err(e) => {
                    warn!("CSV export to {} failed: {}", path.display(), e);
                    writeln!(self.out, "\nCould not export customers: {}", e)?;
                }
            }
        }

        Ok(Some(()))
    }

    fn export_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        report::write_customers_csv(file, self.repo.customers())
    }

    fn search(&mut self) -> Step<()> {
        writeln!(self.out, "=== SEARCH CUSTOMER ===\n")?;
        if self.no_customers("No customers found!")? {
            return Ok(Some(()));
        }

        writeln!(self.out, "Search by:\n1. Customer ID\n2. Customer Name")?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };

        match choice.trim() {
            "1" => {
                let Some(found) = self.prompt_existing("Enter Customer ID: ")? else {
                    return Ok(None);
                };
                if let Some(id) = found {
                    if let Some(c) = self.repo.find_by_id(id) {
                        writeln!(self.out, "=== CUSTOMER DETAILS ===\n")?;
                        report::write_details(&mut self.out, c)?;
                    }
                }
            }
            "2" => {
                let Some(fragment) = self.prompt("Enter Customer Name (or part): ")? else {
                    return Ok(None);
                };

                let mut found = 0;
                for c in self.repo.find_by_name(&fragment) {
                    if found == 0 {
                        writeln!(self.out, "=== SEARCH RESULTS ===\n")?;
                    }
                    found += 1;
                    report::write_search_line(&mut self.out, c)?;
                }

                if found == 0 {
                    writeln!(
                        self.out,
                        "No customers found with name containing: {}",
                        fragment
                    )?;
                }
            }
            _ => writeln!(self.out, "Invalid choice!")?,
        }

        Ok(Some(()))
    }

    fn update_customer(&mut self) -> Step<()> {
        writeln!(self.out, "=== UPDATE CUSTOMER DETAILS ===\n")?;
        if self.no_customers("No customers found!")? {
            return Ok(Some(()));
        }

        let Some(found) = self.prompt_existing("Enter Customer ID to update: ")? else {
            return Ok(None);
        };
        let Some(id) = found else {
            return Ok(Some(()));
        };

        if let Some(c) = self.repo.find_by_id(id) {
            let details = current_details(c);
            writeln!(self.out, "{}", details)?;
        }

        let Some(choice) = self.prompt("\nSelect field to update (1-5, 0 to cancel): ")? else {
            return Ok(None);
        };

        let update = match choice.trim() {
            "1" => self.prompt("Enter new Name: ")?.map(FieldUpdate::Name),
            "2" => self.prompt("Enter new Address: ")?.map(FieldUpdate::Address),
            "3" => self.prompt("Enter new Contact: ")?.map(FieldUpdate::Contact),
            "4" => self
                .prompt_reading("Enter new Previous Reading: ")?
                .map(FieldUpdate::PreviousReading),
            "5" => self
                .prompt_reading("Enter new Current Reading: ")?
                .map(FieldUpdate::CurrentReading),
            "0" => {
                writeln!(self.out, "Update cancelled.")?;
                return Ok(Some(()));
            }
            _ => {
                writeln!(self.out, "Invalid choice!")?;
                return Ok(Some(()));
            }
        };

        let Some(update) = update else {
            return Ok(None);
        };

        let today = (self.today)();
        self.repo.update_field(id, update, &today)?;
        writeln!(self.out, "Customer details updated successfully!")?;
        Ok(Some(()))
    }

    fn delete_customer(&mut self) -> Step<()> {
        writeln!(self.out, "=== DELETE CUSTOMER ===\n")?;
        if self.no_customers("No customers found!")? {
            return Ok(Some(()));
        }

        let Some(found) = self.prompt_existing("Enter Customer ID to delete: ")? else {
            return Ok(None);
        };
        let Some(id) = found else {
            return Ok(Some(()));
        };

        if let Some(c) = self.repo.find_by_id(id) {
            let line = format!("\nCustomer Found:\nID: {}, Name: {}", c.customer_id, c.name);
            writeln!(self.out, "{}", line)?;
        }

        let Some(yes) = self.confirm("Are you sure you want to delete this customer? (y/n): ")?
        else {
            return Ok(None);
        };

        if yes {
            self.repo.delete(id)?;
            writeln!(self.out, "Customer deleted successfully!")?;
        } else {
            writeln!(self.out, "Deletion cancelled.")?;
        }
        Ok(Some(()))
    }

    fn pay_bill(&mut self) -> Step<()> {
        writeln!(self.out, "=== PAY BILL ===\n")?;
        if self.no_customers("No customers found!")? {
            return Ok(Some(()));
        }

        let Some(found) = self.prompt_existing("Enter Customer ID to pay bill: ")? else {
            return Ok(None);
        };
        let Some(id) = found else {
            return Ok(Some(()));
        };

        let summary = match self.repo.find_by_id(id) {
            Some(c) if c.is_paid => None,
            Some(c) => Some(format!(
                "\nCustomer: {}\nBill Amount: Rs. {}\nBilling Date: {}",
                c.name,
                Money::from_f64(c.bill_amount),
                c.billing_date
            )),
            None => return Err(BillingError::NotFound { id }),
        };

        let Some(summary) = summary else {
            writeln!(self.out, "Bill is already paid!")?;
            return Ok(Some(()));
        };
        writeln!(self.out, "{}", summary)?;

        let Some(yes) = self.confirm("\nConfirm payment? (y/n): ")? else {
            return Ok(None);
        };

        if !yes {
            writeln!(self.out, "Payment cancelled.")?;
            return Ok(Some(()));
        }

        match self.repo.mark_paid(id) {
            Ok(_) => writeln!(self.out, "Payment recorded successfully!")?,
            Err(e @ BillingError::AlreadyPaid { .. }) => writeln!(self.out, "{}", e)?,
            Err(e) => return Err(e),
        }
        Ok(Some(()))
    }

    fn view_paid(&mut self) -> Step<()> {
        writeln!(self.out, "=== PAID BILLS ===\n")?;
        let listed = report::write_bill_list(&mut self.out, self.repo.paid(), "Total Paid Amount")?;
        if listed == 0 {
            writeln!(self.out, "No paid bills found!")?;
        }
        Ok(Some(()))
    }

    fn view_pending(&mut self) -> Step<()> {
        writeln!(self.out, "=== PENDING BILLS ===\n")?;
        let listed =
            report::write_bill_list(&mut self.out, self.repo.pending(), "Total Pending Amount")?;
        if listed == 0 {
            writeln!(self.out, "No pending bills found!")?;
        }
        Ok(Some(()))
    }

    fn update_tariff(&mut self) -> Step<()> {
        writeln!(self.out, "=== UPDATE TARIFF RATES ===\n")?;
        writeln!(self.out, "Current Tariff Rates:")?;
        for (n, class) in RateClass::ALL.iter().enumerate() {
            let line = format!(
                "{}. {} Rate: Rs. {} per unit",
                n + 1,
                class,
                self.repo.tariff().rate(*class)
            );
            writeln!(self.out, "{}", line)?;
        }

        let Some(choice) = self.prompt("\nSelect rate to update (1-3, 0 to cancel): ")? else {
            return Ok(None);
        };

        let class = match choice.trim() {
            "1" => RateClass::Domestic,
            "2" => RateClass::Commercial,
            "3" => RateClass::Industrial,
            "0" => return Ok(Some(())),
            _ => {
                writeln!(self.out, "Invalid choice!")?;
                return Ok(Some(()));
            }
        };

        let Some(answer) = self.prompt("Enter new rate: Rs. ")? else {
            return Ok(None);
        };

        match answer.trim().parse::<f64>() {
            Ok(rate) if rate < 0.0 => writeln!(self.out, "Rate cannot be negative!")?,
            Ok(rate) if rate.is_finite() => {
                self.repo.update_tariff(class, rate);
                writeln!(self.out, "Tariff rate updated successfully!")?;
            }
            _ => writeln!(self.out, "Invalid input! Please enter a non-negative number.")?,
        }
        Ok(Some(()))
    }

    fn report(&mut self) -> Step<()> {
        writeln!(self.out, "=== SYSTEM REPORT ===\n")?;
        let summary = self.repo.aggregate();
        report::write_summary(&mut self.out, &summary, self.repo.tariff())?;
        Ok(Some(()))
    }
}

fn is_yes(answer: &str) -> bool {
    answer
        .trim_start()
        .chars()
        .next()
        .map_or(false, |ch| ch.eq_ignore_ascii_case(&'y'))
}

fn current_details(c: &Customer) -> String {
    format!(
        "\nCurrent Details:\n1. Name: {}\n2. Address: {}\n3. Contact: {}\n4. Previous Reading: {}\n5. Current Reading: {}",
        c.name, c.address, c.contact, c.previous_reading, c.current_reading
    )
}
