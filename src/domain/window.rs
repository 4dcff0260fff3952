//! Sliding-window excessive-cancellation evaluator.
//!
//! Trades are sorted by timestamp (stable, so equal timestamps keep their input
//! order) and swept once. A deque holds the trades of the trailing window and
//! two running totals track the order-weighted and cancel-weighted quantity in
//! it. A cancellation counts toward both totals.
//!
//! The rule is checked only after the last trade of a timestamp group has been
//! admitted, and the first violating window decides the verdict.

use crate::domain::trade::Trade;
use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WINDOW_SECONDS: f64 = 60.0;

/// A non-negative rational threshold, compared exactly by cross-multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: u64,
    pub denominator: u64,
}

impl Ratio {
    /// Returns `None` for a zero denominator.
    pub fn new(numerator: u64, denominator: u64) -> Option<Self> {
        (denominator != 0).then_some(Self {
            numerator,
            denominator,
        })
    }

    /// `part > whole * self`, without rounding. Both products are taken at
    /// 192 bits so no ratio or total can overflow.
    fn exceeded_by(&self, part: u128, whole: u128) -> bool {
        widening_mul(part, self.denominator) > widening_mul(whole, self.numerator)
    }
}

/// Full product of `x * m` as `(high, low)` 128-bit halves.
fn widening_mul(x: u128, m: u64) -> (u128, u128) {
    let m = u128::from(m);
    let lo = (x & u128::from(u64::MAX)) * m;
    let hi = (x >> 64) * m;
    let (low, carry) = lo.overflowing_add(hi << 64);
    ((hi >> 64) + u128::from(carry), low)
}

impl Default for Ratio {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 3,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ratio {input:?}: expected N/D with D > 0")]
pub struct RatioParseError {
    pub input: String,
}

impl FromStr for Ratio {
    type Err = RatioParseError;

    /// Accepts `N/D` or a bare integer `N` (meaning `N/1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RatioParseError {
            input: s.to_string(),
        };
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let numerator = num.parse::<u64>().map_err(|_| err())?;
        let denominator = den.parse::<u64>().map_err(|_| err())?;
        Ratio::new(numerator, denominator).ok_or_else(err)
    }
}

/// Parameters of the excessive-cancellation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPolicy {
    /// Trades older than this many seconds relative to the current trade are evicted.
    pub window_seconds: f64,
    /// A window is excessive when cancels exceed this share of orders.
    pub max_cancel_ratio: Ratio,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            max_cancel_ratio: Ratio::default(),
        }
    }
}

/// The first window found in violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Timestamp of the trade group that closed the violating window.
    pub at: NaiveDateTime,
    pub period_orders: u128,
    pub period_cancels: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    WellBehaved,
    Excessive(Violation),
}

impl Verdict {
    pub fn is_excessive(&self) -> bool {
        matches!(self, Verdict::Excessive(_))
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Verdict::Excessive(v) => Some(v),
            Verdict::WellBehaved => None,
        }
    }
}

/// Trades in the trailing window and their running totals.
#[derive(Debug, Default)]
struct WindowState<'a> {
    queue: VecDeque<&'a Trade>,
    period_orders: u128,
    period_cancels: u128,
}

impl<'a> WindowState<'a> {
    fn evict_older_than(&mut self, now: NaiveDateTime, window_seconds: f64) {
        while let Some(front) = self.queue.front() {
            if seconds_between(front.timestamp, now) <= window_seconds {
                break;
            }
            self.period_orders -= u128::from(front.order_weight());
            self.period_cancels -= u128::from(front.cancel_weight());
            self.queue.pop_front();
        }
    }

    fn admit(&mut self, trade: &'a Trade) {
        self.period_orders += u128::from(trade.order_weight());
        self.period_cancels += u128::from(trade.cancel_weight());
        self.queue.push_back(trade);
    }

    fn violates(&self, ratio: &Ratio) -> bool {
        if self.period_orders == 0 {
            return self.period_cancels > 0;
        }
        ratio.exceeded_by(self.period_cancels, self.period_orders)
    }
}

/// Millisecond difference scaled to seconds.
fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

/// Runs the sliding-window rule over one company's trades.
///
/// The input is not modified; an empty slice is well behaved.
pub fn evaluate(trades: &[Trade], policy: &WindowPolicy) -> Verdict {
    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by_key(|t| t.timestamp);

    let mut window = WindowState::default();

    for (i, &trade) in sorted.iter().enumerate() {
        window.evict_older_than(trade.timestamp, policy.window_seconds);
        window.admit(trade);

        let group_continues = sorted
            .get(i + 1)
            .is_some_and(|next| next.timestamp == trade.timestamp);
        if group_continues {
            continue;
        }

        if window.violates(&policy.max_cancel_ratio) {
            return Verdict::Excessive(Violation {
                at: trade.timestamp,
                period_orders: window.period_orders,
                period_cancels: window.period_cancels,
            });
        }
    }

    Verdict::WellBehaved
}

/// `true` if some window of `trades` breaks the default rule.
pub fn is_excessive(trades: &[Trade]) -> bool {
    evaluate(trades, &WindowPolicy::default()).is_excessive()
}
