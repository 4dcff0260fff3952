//! Text, CSV and JSON renderers for checker reports.

use crate::domain::error::CancelCheckError;
use crate::domain::report::{CompanyVerdict, Report};
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Output failures are report failures, whichever command hit them.
pub fn io_err(e: std::io::Error) -> CancelCheckError {
    CancelCheckError::Report {
        reason: e.to_string(),
    }
}

/// Plain text: one tab-separated line per company, then a summary line.
pub struct TextReportWriter;

impl ReportPort for TextReportWriter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> Result<(), CancelCheckError> {
        for v in &report.verdicts {
            let written = match &v.violation {
                Some(violation) => writeln!(
                    out,
                    "{}\tFLAGGED\ttrades={}\tat={}\torders={}\tcancels={}",
                    v.company,
                    v.trade_count,
                    violation.at.format(TIMESTAMP_FORMAT),
                    violation.period_orders,
                    violation.period_cancels
                ),
                None => writeln!(out, "{}\tok\ttrades={}", v.company, v.trade_count),
            };
            written.map_err(io_err)?;
        }
        writeln!(
            out,
            "{} of {} companies flagged, {} well-behaved (window {}s, max cancel ratio {})",
            report.company_count() - report.well_behaved_count(),
            report.company_count(),
            report.well_behaved_count(),
            report.policy.window_seconds,
            report.policy.max_cancel_ratio
        )
        .map_err(io_err)
    }

    fn write_flagged(&self, flagged: &[String], out: &mut dyn Write) -> Result<(), CancelCheckError> {
        for company in flagged {
            writeln!(out, "{}", company).map_err(io_err)?;
        }
        Ok(())
    }
}

/// CSV with a header row, via the `csv` crate so company names are quoted as needed.
pub struct CsvReportWriter;

fn csv_err(e: csv::Error) -> CancelCheckError {
    CancelCheckError::Report {
        reason: e.to_string(),
    }
}

impl ReportPort for CsvReportWriter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> Result<(), CancelCheckError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record([
            "company",
            "trade_count",
            "excessive",
            "violation_at",
            "period_orders",
            "period_cancels",
        ])
        .map_err(csv_err)?;
        for v in &report.verdicts {
            let (at, orders, cancels) = match &v.violation {
                Some(x) => (
                    x.at.format(TIMESTAMP_FORMAT).to_string(),
                    x.period_orders.to_string(),
                    x.period_cancels.to_string(),
                ),
                None => (String::new(), String::new(), String::new()),
            };
            let trade_count = v.trade_count.to_string();
            wtr.write_record([
                v.company.as_str(),
                trade_count.as_str(),
                if v.is_excessive() { "true" } else { "false" },
                at.as_str(),
                orders.as_str(),
                cancels.as_str(),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush().map_err(io_err)
    }

    fn write_flagged(&self, flagged: &[String], out: &mut dyn Write) -> Result<(), CancelCheckError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(["company"]).map_err(csv_err)?;
        for company in flagged {
            wtr.write_record([company]).map_err(csv_err)?;
        }
        wtr.flush().map_err(io_err)
    }
}

#[derive(Serialize)]
struct JsonPolicy {
    window_seconds: f64,
    max_cancel_ratio: String,
}

#[derive(Serialize)]
struct JsonViolation {
    at: String,
    period_orders: u128,
    period_cancels: u128,
}

#[derive(Serialize)]
struct JsonCompany<'a> {
    company: &'a str,
    trade_count: usize,
    excessive: bool,
    violation: Option<JsonViolation>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    policy: JsonPolicy,
    companies: Vec<JsonCompany<'a>>,
    flagged: Vec<&'a str>,
    well_behaved_count: usize,
}

impl<'a> From<&'a CompanyVerdict> for JsonCompany<'a> {
    fn from(v: &'a CompanyVerdict) -> Self {
        Self {
            company: &v.company,
            trade_count: v.trade_count,
            excessive: v.is_excessive(),
            violation: v.violation.as_ref().map(|x| JsonViolation {
                at: x.at.format(TIMESTAMP_FORMAT).to_string(),
                period_orders: x.period_orders,
                period_cancels: x.period_cancels,
            }),
        }
    }
}

/// Pretty-printed JSON document.
pub struct JsonReportWriter;

fn json_err(e: serde_json::Error) -> CancelCheckError {
    CancelCheckError::Report {
        reason: e.to_string(),
    }
}

impl ReportPort for JsonReportWriter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> Result<(), CancelCheckError> {
        let doc = JsonReport {
            policy: JsonPolicy {
                window_seconds: report.policy.window_seconds,
                max_cancel_ratio: report.policy.max_cancel_ratio.to_string(),
            },
            companies: report.verdicts.iter().map(JsonCompany::from).collect(),
            flagged: report.flagged(),
            well_behaved_count: report.well_behaved_count(),
        };
        serde_json::to_writer_pretty(&mut *out, &doc).map_err(json_err)?;
        writeln!(out).map_err(io_err)
    }

    fn write_flagged(&self, flagged: &[String], out: &mut dyn Write) -> Result<(), CancelCheckError> {
        serde_json::to_writer_pretty(&mut *out, flagged).map_err(json_err)?;
        writeln!(out).map_err(io_err)
    }
}
