//! Ingest-then-report entry points.
//!
//! Each call consumes its own source into a fresh ledger, so nothing carries
//! over between calls. A source failure aborts the call before any company
//! is evaluated.

use crate::domain::error::CancelCheckError;
use crate::domain::ledger::{ingest, CompanyLedger};
use crate::domain::record_parser::ParserOptions;
use crate::domain::report::{self, Report};
use crate::domain::window::WindowPolicy;
use crate::ports::line_source_port::LineSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExcessiveCancellationsChecker {
    pub policy: WindowPolicy,
    pub parser: ParserOptions,
}

impl ExcessiveCancellationsChecker {
    pub fn new(policy: WindowPolicy, parser: ParserOptions) -> Self {
        Self { policy, parser }
    }

    pub fn load(&self, source: &mut dyn LineSource) -> Result<CompanyLedger, CancelCheckError> {
        ingest(source, &self.parser)
    }

    pub fn companies_involved_in_excessive_cancellations(
        &self,
        source: &mut dyn LineSource,
    ) -> Result<Vec<String>, CancelCheckError> {
        let ledger = self.load(source)?;
        Ok(report::flagged_companies(&ledger, &self.policy))
    }

    pub fn total_number_of_well_behaved_companies(
        &self,
        source: &mut dyn LineSource,
    ) -> Result<usize, CancelCheckError> {
        let ledger = self.load(source)?;
        Ok(report::well_behaved_count(&ledger, &self.policy))
    }

    pub fn report(&self, source: &mut dyn LineSource) -> Result<Report, CancelCheckError> {
        let ledger = self.load(source)?;
        Ok(Report::build(&ledger, &self.policy))
    }
}
