//! Report rendering port trait.

use crate::domain::error::CancelCheckError;
use crate::domain::report::Report;
use std::io::Write;

/// Port for rendering a finished report.
pub trait ReportPort {
    /// Renders every company verdict followed by the summary.
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> Result<(), CancelCheckError>;

    /// Renders only the flagged companies, in ledger order.
    fn write_flagged(&self, flagged: &[String], out: &mut dyn Write) -> Result<(), CancelCheckError>;
}
