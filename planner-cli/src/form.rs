//! Entry form input: behaves like an HTML number field (min 0) plus a text field.

use crossterm::event::KeyCode;
use planner_core::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Amount,
    Remarks,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Still editing
    Pending,
    Submit { amount: Amount, remarks: String },
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub amount: String,
    pub remarks: String,
    pub focus: Field,
    pub error: Option<String>,
}

/// Characters a number input lets through
fn accepts_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

impl EntryForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormOutcome {
        match code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => return self.try_submit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Amount => Field::Remarks,
                    Field::Remarks => Field::Amount,
                };
            }
            KeyCode::Backspace => {
                self.error = None;
                match self.focus {
                    Field::Amount => self.amount.pop(),
                    Field::Remarks => self.remarks.pop(),
                };
            }
            KeyCode::Char(c) => match self.focus {
                Field::Amount if accepts_amount_char(c) => {
                    self.error = None;
                    self.amount.push(c);
                }
                Field::Amount => {}
                Field::Remarks => {
                    self.error = None;
                    self.remarks.push(c);
                }
            },
            _ => {}
        }
        FormOutcome::Pending
    }

    /// Number-field constraint check: empty is allowed, garbage and negatives are not.
    pub fn validate(&self) -> Result<(), String> {
        if self.amount.is_empty() {
            return Ok(());
        }
        let value = Amount::from(self.amount.as_str()).to_number();
        if value.is_nan() {
            return Err("Please enter a number.".to_string());
        }
        if value < 0.0 {
            return Err("Value must be greater than or equal to 0.".to_string());
        }
        Ok(())
    }

    fn try_submit(&mut self) -> FormOutcome {
        if let Err(msg) = self.validate() {
            tracing::debug!(amount = %self.amount, "form submit refused: {msg}");
            self.error = Some(msg);
            return FormOutcome::Pending;
        }
        FormOutcome::Submit {
            amount: Amount::Text(self.amount.clone()),
            remarks: self.remarks.clone(),
        }
    }
}
