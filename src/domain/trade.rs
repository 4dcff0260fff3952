//! Order event representation.

use chrono::NaiveDateTime;
use std::fmt;

/// Kind of order event. `D` places a new order, `F` cancels one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    New,
    Cancel,
}

impl OrderType {
    /// Maps a source symbol to an order type. Anything other than `D` or `F` is unknown.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "D" => Some(OrderType::New),
            "F" => Some(OrderType::Cancel),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            OrderType::New => 'D',
            OrderType::Cancel => 'F',
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A validated order event. Only the record parser builds these from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub timestamp: NaiveDateTime,
    pub order_type: OrderType,
    pub quantity: u64,
}

impl Trade {
    pub fn new(timestamp: NaiveDateTime, order_type: OrderType, quantity: u64) -> Self {
        Self {
            timestamp,
            order_type,
            quantity,
        }
    }

    /// Quantity counted toward the order total. Cancellations count here too.
    pub fn order_weight(&self) -> u64 {
        self.quantity
    }

    /// Quantity counted toward the cancel total.
    pub fn cancel_weight(&self) -> u64 {
        match self.order_type {
            OrderType::New => 0,
            OrderType::Cancel => self.quantity,
        }
    }
}
