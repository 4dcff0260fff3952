//! Report queries over a fully ingested ledger.
//!
//! Both views iterate the ledger in first-seen company order.

use crate::domain::ledger::CompanyLedger;
use crate::domain::window::{evaluate, Verdict, Violation, WindowPolicy};

/// Companies with at least one violating window, in ledger order.
pub fn flagged_companies(ledger: &CompanyLedger, policy: &WindowPolicy) -> Vec<String> {
    ledger
        .iter()
        .filter(|(_, trades)| evaluate(trades, policy).is_excessive())
        .map(|(company, _)| company.to_string())
        .collect()
}

/// Number of companies for which no window violates.
pub fn well_behaved_count(ledger: &CompanyLedger, policy: &WindowPolicy) -> usize {
    ledger
        .iter()
        .filter(|(_, trades)| !evaluate(trades, policy).is_excessive())
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyVerdict {
    pub company: String,
    pub trade_count: usize,
    pub violation: Option<Violation>,
}

impl CompanyVerdict {
    pub fn is_excessive(&self) -> bool {
        self.violation.is_some()
    }
}

/// Per-company verdicts computed once, in ledger order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub policy: WindowPolicy,
    pub verdicts: Vec<CompanyVerdict>,
}

impl Report {
    pub fn build(ledger: &CompanyLedger, policy: &WindowPolicy) -> Self {
        let verdicts = ledger
            .iter()
            .map(|(company, trades)| {
                let violation = match evaluate(trades, policy) {
                    Verdict::Excessive(v) => Some(v),
                    Verdict::WellBehaved => None,
                };
                tracing::trace!(company, flagged = violation.is_some(), "evaluated");
                CompanyVerdict {
                    company: company.to_string(),
                    trade_count: trades.len(),
                    violation,
                }
            })
            .collect();
        Self {
            policy: *policy,
            verdicts,
        }
    }

    pub fn flagged(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| v.is_excessive())
            .map(|v| v.company.as_str())
            .collect()
    }

    pub fn well_behaved_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.is_excessive()).count()
    }

    pub fn company_count(&self) -> usize {
        self.verdicts.len()
    }
}
