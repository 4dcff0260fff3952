//! Port traits at the I/O seams of the checker.

pub mod config_port;
pub mod line_source_port;
pub mod report_port;
