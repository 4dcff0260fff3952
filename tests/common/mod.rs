#![allow(dead_code)]

use cancelcheck::domain::error::CancelCheckError;
use cancelcheck::domain::trade::{OrderType, Trade};
use cancelcheck::ports::line_source_port::LineSource;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::VecDeque;

/// In-memory line source, optionally failing after its lines run out.
pub struct MockLineSource {
    pub lines: VecDeque<String>,
    pub fail_with: Option<String>,
    pub pulled: usize,
}

impl MockLineSource {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            fail_with: None,
            pulled: 0,
        }
    }

    pub fn failing_after(lines: &[&str], reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::new(lines)
        }
    }
}

impl LineSource for MockLineSource {
    fn next_line(&mut self) -> Option<Result<String, CancelCheckError>> {
        if let Some(line) = self.lines.pop_front() {
            self.pulled += 1;
            return Some(Ok(line));
        }
        self.fail_with.take().map(|reason| {
            Err(CancelCheckError::Source {
                path: "mock".to_string(),
                reason,
            })
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 2, 28)
        .unwrap()
        .and_hms_opt(7, 58, 14)
        .unwrap()
}

pub fn trade_at(secs: i64, order_type: OrderType, quantity: u64) -> Trade {
    Trade::new(base_time() + Duration::seconds(secs), order_type, quantity)
}

pub const EXCESSIVE_LINES: &[&str] = &[
    "2015-02-28 07:58:14,Bank of Mars,D,140",
    "2015-02-28 07:59:10,Bank of Mars,F,50",
    "2015-02-28 07:59:30,Bank of Mars,D,100",
    "2015-02-28 08:00:00,Bank of Mars,F,80",
    "2015-02-28 08:00:30,Cauldron Cooking,D,200",
    "2015-02-28 08:01:00,Cauldron Cooking,F,150",
];

pub const MIXED_LINES: &[&str] = &[
    "2015-02-28 07:58:14,Good Bank,D,140",
    "2015-02-28 07:59:10,Good Bank,F,20",
    "2015-02-28 07:59:30,Better Trading,D,100",
    "2015-02-28 08:00:00,Better Trading,F,10",
    "2015-02-28 08:00:30,Bad Company,D,200",
    "2015-02-28 08:01:00,Bad Company,F,150",
];
