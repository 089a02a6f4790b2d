//! Derived totals. Pure functions of the list, recomputed on every call.

use crate::statement::{Statement, StatementType};

/// Sum of coerced amounts for one side. A non-numeric amount makes it NaN.
pub fn total_by_type(list: &[Statement], kind: StatementType) -> f64 {
    list.iter()
        .filter(|s| s.kind == kind)
        .fold(0.0, |total, s| total + s.value())
}

pub fn income(list: &[Statement]) -> f64 {
    total_by_type(list, StatementType::Income)
}

pub fn expense(list: &[Statement]) -> f64 {
    total_by_type(list, StatementType::Expense)
}

pub fn balance(list: &[Statement]) -> f64 {
    income(list) - expense(list)
}

/// Snapshot of the three totals for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Summary {
    pub fn of(list: &[Statement]) -> Self {
        Self {
            income: income(list),
            expense: expense(list),
            balance: balance(list),
        }
    }
}
