//! Statement model: a single income or expense entry as it is persisted.
//!
//! Amounts are kept exactly as entered (JSON number or string) and only
//! coerced to a number when they are summed.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which side of the ledger an entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum StatementType {
    #[default]
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl StatementType {
    /// Wire name, as stored in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Income => "income",
            StatementType::Expense => "expense",
        }
    }

    /// Human label used by the entry form and the action buttons
    pub fn label(&self) -> &'static str {
        match self {
            StatementType::Income => "Income",
            StatementType::Expense => "Spending",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw amount as the user entered it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Numeric value used for totals. Text that is not a number yields NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => coerce_text(s),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => f.write_str(&format_number(*n)),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

fn coerce_text(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = radix_literal(s) {
        return n;
    }
    // f64::from_str also accepts "inf" and "nan"; those are not numbers here.
    let plain = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !plain {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Unsigned `0x`, `0o` and `0b` integer literals. `None` when there is no prefix.
fn radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Render a number the way totals are shown: shortest form, `NaN`, `Infinity`,
/// and exponent notation (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return s.to_string();
    }
    if n == 0.0 {
        // collapse -0
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }
    format!("{}", n)
}

/// `day.month.year` without zero padding, e.g. `7.3.2024`
pub fn format_date(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

fn null_amount_is_zero<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = Option::<Amount>::deserialize(deserializer)?;
    Ok(Some(amount.unwrap_or(Amount::Number(0.0))))
}

/// One ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    /// Creation timestamp in milliseconds; also the delete key
    pub id: i64,
    /// Local creation date as `D.M.YYYY`
    pub date: String,
    /// `null` reads as 0; an absent field stays `None`
    #[serde(
        default,
        deserialize_with = "null_amount_is_zero",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(rename = "type")]
    pub kind: StatementType,
}

impl Statement {
    pub fn new(
        id: i64,
        date: NaiveDate,
        kind: StatementType,
        amount: Option<Amount>,
        remarks: Option<String>,
    ) -> Self {
        Self {
            id,
            date: format_date(date),
            amount,
            remarks,
            kind,
        }
    }

    /// Amount coerced for summation; a missing amount is NaN.
    pub fn value(&self) -> f64 {
        self.amount.as_ref().map_or(f64::NAN, Amount::to_number)
    }

    pub fn is_income(&self) -> bool {
        self.kind == StatementType::Income
    }

    /// Amount as entered, empty when absent
    pub fn amount_text(&self) -> String {
        self.amount.as_ref().map(|a| a.to_string()).unwrap_or_default()
    }

    /// Remarks, empty when absent
    pub fn remarks_text(&self) -> &str {
        self.remarks.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_has_no_padding() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(d), "7.3.2024");
        let d = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(format_date(d), "25.12.2023");
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(Amount::from("100").to_number(), 100.0);
        assert_eq!(Amount::from(" 12.5 ").to_number(), 12.5);
        assert_eq!(Amount::from("").to_number(), 0.0);
        assert_eq!(Amount::from("1e3").to_number(), 1000.0);
        assert_eq!(Amount::from("-40").to_number(), -40.0);
        assert_eq!(Amount::from("Infinity").to_number(), f64::INFINITY);
        assert!(Amount::from("abc").to_number().is_nan());
        assert!(Amount::from("inf").to_number().is_nan());
        assert!(Amount::from("12abc").to_number().is_nan());
        assert_eq!(Amount::from("0x10").to_number(), 16.0);
        assert_eq!(Amount::from("0b11").to_number(), 3.0);
        assert_eq!(Amount::from(" 0o17 ").to_number(), 15.0);
        assert!(Amount::from("0x").to_number().is_nan());
        assert!(Amount::from("0b12").to_number().is_nan());
        assert!(Amount::from("-0x10").to_number().is_nan());
    }

    #[test]
    fn test_missing_amount_is_nan() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let s = Statement::new(1, d, StatementType::Income, None, None);
        assert!(s.value().is_nan());
        assert_eq!(s.amount_text(), "");
        assert_eq!(s.remarks_text(), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-40.0), "-40");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn test_wire_shape() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let s = Statement::new(
            1714557600000,
            d,
            StatementType::Expense,
            Some(Amount::from("40")),
            Some("lunch".to_string()),
        );
        let v: serde_json::Value = serde_json::to_value(&s).unwrap();
        assert_eq!(v["id"], 1714557600000i64);
        assert_eq!(v["date"], "1.5.2024");
        assert_eq!(v["amount"], "40");
        assert_eq!(v["remarks"], "lunch");
        assert_eq!(v["type"], "expense");
    }

    #[test]
    fn test_absent_fields_are_omitted_and_tolerated() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let s = Statement::new(7, d, StatementType::Income, None, None);
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("amount"));
        assert!(!json.contains("remarks"));

        let parsed: Statement =
            serde_json::from_str(r#"{"id":7,"date":"1.5.2024","amount":250,"type":"income"}"#)
                .unwrap();
        assert_eq!(parsed.amount, Some(Amount::Number(250.0)));
        assert_eq!(parsed.remarks, None);
        assert_eq!(parsed.amount_text(), "250");
    }

    #[test]
    fn test_null_amount_counts_as_zero() {
        let list: Vec<Statement> = serde_json::from_str(
            r#"[{"id":1,"date":"1.5.2024","amount":null,"type":"income"},
                {"id":2,"date":"1.5.2024","amount":"30","type":"income"}]"#,
        )
        .unwrap();
        assert_eq!(list[0].amount, Some(Amount::Number(0.0)));
        assert_eq!(list[0].value(), 0.0);
        let total: f64 = list.iter().map(Statement::value).sum();
        assert_eq!(total, 30.0);
    }
}
