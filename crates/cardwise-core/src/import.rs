//! Transaction file import (CSV or JSON)
//!
//! CSV files need a header row. Columns are matched by name, case-insensitively:
//! `date`, `merchant` (or `description`), `amount`, and optionally `category`
//! and `account` (or `card`). JSON files hold an array of transaction objects.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess from the file extension; anything but `.json` is CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Load transactions from a file, picking the parser by extension
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = BufReader::new(File::open(path)?);
    match InputFormat::from_path(path) {
        InputFormat::Json => parse_json(file),
        InputFormat::Csv => parse_csv(file),
    }
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    debug!("Parsed {} JSON transactions", transactions.len());
    Ok(transactions)
}

struct Columns {
    date: usize,
    merchant: usize,
    amount: usize,
    category: Option<usize>,
    account: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let required = |names: &[&str]| {
            find(names).ok_or_else(|| {
                Error::InvalidData(format!("CSV is missing a '{}' column", names[0]))
            })
        };

        Ok(Self {
            date: required(&["date", "transaction date"])?,
            merchant: required(&["merchant", "description", "name"])?,
            amount: required(&["amount"])?,
            category: find(&["category", "raw_category", "rawCategory"]),
            account: find(&["account", "card", "account_label", "accountLabel"]),
        })
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let optional = |i: Option<usize>| {
            i.map(field)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let date = parse_date(field(columns.date))
            .map_err(|e| Error::InvalidData(format!("row {}: {}", line + 1, e)))?;
        let amount = parse_amount(field(columns.amount))
            .map_err(|e| Error::InvalidData(format!("row {}: {}", line + 1, e)))?;

        transactions.push(Transaction {
            date,
            merchant: field(columns.merchant).to_string(),
            amount,
            raw_category: optional(columns.category),
            category: None,
            account_label: optional(columns.account).unwrap_or_default(),
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Parse a date string in various common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::InvalidData(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₹', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Unable to parse amount: {}", s)))
}
