//! Per-company trade ledger and ingestion.
//!
//! Companies are kept in the order their first accepted trade was seen. That
//! order is what the report iterates in, so it must not depend on hashing.

use crate::domain::error::CancelCheckError;
use crate::domain::record_parser::{parse_lines, ParserOptions};
use crate::domain::trade::Trade;
use crate::ports::line_source_port::LineSource;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CompanyEntry {
    pub company: String,
    pub trades: Vec<Trade>,
}

/// Trades grouped by company, in first-seen company order.
#[derive(Debug, Clone, Default)]
pub struct CompanyLedger {
    entries: Vec<CompanyEntry>,
    index: HashMap<String, usize>,
}

impl CompanyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a trade, creating the company at the end of the order if it is new.
    pub fn record(&mut self, company: &str, trade: Trade) {
        match self.index.get(company) {
            Some(&i) => self.entries[i].trades.push(trade),
            None => {
                self.index.insert(company.to_string(), self.entries.len());
                self.entries.push(CompanyEntry {
                    company: company.to_string(),
                    trades: vec![trade],
                });
            }
        }
    }

    pub fn for_each_company_in_insertion_order<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[Trade]),
    {
        for entry in &self.entries {
            f(&entry.company, &entry.trades);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Trade])> {
        self.entries
            .iter()
            .map(|e| (e.company.as_str(), e.trades.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn trades_for(&self, company: &str) -> Option<&[Trade]> {
        self.index
            .get(company)
            .map(|&i| self.entries[i].trades.as_slice())
    }

    /// Total number of trades across all companies.
    pub fn trade_count(&self) -> usize {
        self.entries.iter().map(|e| e.trades.len()).sum()
    }
}

/// Drains `source` into a fresh ledger.
///
/// Malformed lines are skipped. A source failure aborts ingestion and the
/// partially built ledger is discarded.
pub fn ingest(
    source: &mut dyn LineSource,
    options: &ParserOptions,
) -> Result<CompanyLedger, CancelCheckError> {
    let mut ledger = CompanyLedger::new();
    let mut lines = 0usize;
    let mut accepted = 0usize;
    let mut failure = None;

    let raw_lines = std::iter::from_fn(|| match source.next_line()? {
        Ok(line) => {
            lines += 1;
            Some(line)
        }
        Err(e) => {
            failure = Some(e);
            None
        }
    });
    for record in parse_lines(raw_lines, *options) {
        ledger.record(&record.company, record.trade);
        accepted += 1;
    }
    if let Some(e) = failure {
        return Err(e);
    }

    tracing::debug!(
        source = %source.describe(),
        lines,
        accepted,
        companies = ledger.len(),
        "ingestion complete"
    );
    Ok(ledger)
}
