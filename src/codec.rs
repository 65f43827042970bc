//! Binary layout of the customer and tariff data files.
//!
//! The format has no header and no version. All integers and floats are in
//! native byte order, and lengths and the record count are `usize`.
//!
//! Customer file:
//!
//! ```text
//! count        usize
//! per record:
//!   id           i32
//!   name         usize length, then raw bytes
//!   address      usize length, then raw bytes
//!   contact      usize length, then raw bytes
//!   previous     f64
//!   current      f64
//!   units        f64
//!   amount       f64
//!   billing_date usize length, then raw bytes
//!   is_paid      u8 (0 or 1)
//! ```
//!
//! Tariff file: domestic, commercial and industrial rate as three
//! consecutive `f64`, 24 bytes total.

use crate::customer::Customer;
use crate::error::{BillingError, Result};
use crate::tariff::Tariff;
use log::debug;
use std::mem::size_of;

/// Size in bytes of an encoded tariff.
pub const TARIFF_RECORD_LEN: usize = 3 * size_of::<f64>();

/// Smallest possible encoded customer: all four strings empty.
pub const MIN_RECORD_LEN: usize =
    size_of::<i32>() + 4 * size_of::<usize>() + 4 * size_of::<f64>() + 1;

/// Field-by-field writer over an owned byte buffer.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder { buf: Vec::new() }
    }

    pub fn write_usize(&mut self, value: usize) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Writes a length prefix followed by the string's bytes, no terminator.
    pub fn write_str(&mut self, value: &str) {
        self.write_usize(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded byte slice.
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Decoder { data, pos: 0 }
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.corrupt(format!(
                "need {} bytes for {}, only {} left",
                len,
                what,
                self.remaining()
            )));
        }

        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let bytes = self.take(N, what)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    pub fn read_usize(&mut self, what: &str) -> Result<usize> {
        Ok(usize::from_ne_bytes(self.take_array(what)?))
    }

    pub fn read_i32(&mut self, what: &str) -> Result<i32> {
        Ok(i32::from_ne_bytes(self.take_array(what)?))
    }

    pub fn read_f64(&mut self, what: &str) -> Result<f64> {
        Ok(f64::from_ne_bytes(self.take_array(what)?))
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self, what: &str) -> Result<bool> {
        let [byte] = self.take_array::<1>(what)?;
        Ok(byte != 0)
    }

    pub fn read_str(&mut self, what: &str) -> Result<String> {
        let start = self.pos;
        let len = self.read_usize(what)?;
        let bytes = self.take(len, what)?;

        String::from_utf8(bytes.to_vec()).map_err(|_| BillingError::Corrupt {
            offset: start,
            message: format!("{} is not valid UTF-8", what),
        })
    }

    fn corrupt(&self, message: String) -> BillingError {
        BillingError::Corrupt {
            offset: self.pos,
            message,
        }
    }
}

/// Encodes the whole customer collection.
pub fn encode_customers(customers: &[Customer]) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_usize(customers.len());

    for c in customers {
        enc.write_i32(c.customer_id);
        enc.write_str(&c.name);
        enc.write_str(&c.address);
        enc.write_str(&c.contact);
        enc.write_f64(c.previous_reading);
        enc.write_f64(c.current_reading);
        enc.write_f64(c.units_consumed);
        enc.write_f64(c.bill_amount);
        enc.write_str(&c.billing_date);
        enc.write_bool(c.is_paid);
    }

    enc.into_bytes()
}

/// Decodes a customer collection produced by [`encode_customers`].
///
/// Bytes after the last record are ignored.
pub fn decode_customers(data: &[u8]) -> Result<Vec<Customer>> {
    let mut dec = Decoder::new(data);
    let count = dec.read_usize("record count")?;

    let mut customers = Vec::with_capacity(record_capacity(count, dec.remaining()));

    for _ in 0..count {
        customers.push(Customer {
            customer_id: dec.read_i32("customer id")?,
            name: dec.read_str("name")?,
            address: dec.read_str("address")?,
            contact: dec.read_str("contact")?,
            previous_reading: dec.read_f64("previous reading")?,
            current_reading: dec.read_f64("current reading")?,
            units_consumed: dec.read_f64("units consumed")?,
            bill_amount: dec.read_f64("bill amount")?,
            billing_date: dec.read_str("billing date")?,
            is_paid: dec.read_bool("payment status")?,
        });
    }

    if dec.remaining() > 0 {
        debug!(
            "Ignoring {} trailing bytes after {} customer records",
            dec.remaining(),
            count
        );
    }

    Ok(customers)
}

/// How many records to reserve for a file claiming `count` records.
///
/// The count comes from the file, so it is capped by how many records the
/// remaining bytes could possibly hold.
fn record_capacity(count: usize, remaining: usize) -> usize {
    count.min(remaining / MIN_RECORD_LEN)
}

/// Encodes the tariff as a fixed 24-byte record.
pub fn encode_tariff(tariff: &Tariff) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_f64(tariff.domestic_rate);
    enc.write_f64(tariff.commercial_rate);
    enc.write_f64(tariff.industrial_rate);
    enc.into_bytes()
}

/// Decodes a tariff record.
pub fn decode_tariff(data: &[u8]) -> Result<Tariff> {
    let mut dec = Decoder::new(data);
    Ok(Tariff {
        domestic_rate: dec.read_f64("domestic rate")?,
        commercial_rate: dec.read_f64("commercial rate")?,
        industrial_rate: dec.read_f64("industrial rate")?,
    })
}
