//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod file_line_adapter;
pub mod report_writer;
