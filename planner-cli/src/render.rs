//! Plain-text rendering shared by the command output and the TUI.

use planner_core::{Statement, Summary, format_number};

use crate::config::DisplaySection;

pub fn money(n: f64, suffix: &str) -> String {
    format!("{} {}", format_number(n), suffix)
}

pub fn balance_line(summary: &Summary, display: &DisplaySection) -> String {
    money(summary.balance, &display.balance_suffix)
}

pub fn totals_line(summary: &Summary, display: &DisplaySection) -> String {
    format!(
        "Income: {}  Spendings: {}",
        money(summary.income, &display.amount_suffix),
        money(summary.expense, &display.amount_suffix)
    )
}

/// Amount as entered plus the currency suffix
pub fn entry_amount(s: &Statement, display: &DisplaySection) -> String {
    format!("{} {}", s.amount_text(), display.amount_suffix)
}

/// One `planner list` row: id, date, amount, type, remarks
pub fn entry_line(s: &Statement, display: &DisplaySection) -> String {
    format!(
        "{:>13}  {:<10}  {:>12}  {:<7}  {}",
        s.id,
        s.date,
        entry_amount(s, display),
        s.kind,
        s.remarks_text()
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use planner_core::{Amount, StatementType};

    fn entry(kind: StatementType, amount: &str, remarks: Option<&str>) -> Statement {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        Statement::new(
            1709800000000,
            d,
            kind,
            Some(Amount::from(amount)),
            remarks.map(str::to_string),
        )
    }

    #[test]
    fn test_summary_lines() {
        let list = vec![
            entry(StatementType::Income, "100", Some("salary")),
            entry(StatementType::Expense, "40", Some("lunch")),
        ];
        let s = Summary::of(&list);
        let d = DisplaySection::default();
        assert_eq!(balance_line(&s, &d), "60 czk");
        assert_eq!(totals_line(&s, &d), "Income: 100 Kc  Spendings: 40 Kc");
    }

    #[test]
    fn test_nan_is_shown_not_hidden() {
        let list = vec![entry(StatementType::Income, "abc", None)];
        let s = Summary::of(&list);
        assert_eq!(balance_line(&s, &DisplaySection::default()), "NaN czk");
    }

    #[test]
    fn test_entry_line_keeps_raw_amount() {
        let line = entry_line(
            &entry(StatementType::Expense, "40.50", Some("lunch")),
            &DisplaySection::default(),
        );
        assert!(line.contains("7.3.2024"));
        assert!(line.contains("40.50 Kc"));
        assert!(line.contains("expense"));
        assert!(line.ends_with("lunch"));
    }

    #[test]
    fn test_entry_line_without_remarks() {
        let line = entry_line(
            &entry(StatementType::Income, "5", None),
            &DisplaySection::default(),
        );
        assert!(line.ends_with("income"));
    }
}
