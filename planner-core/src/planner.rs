//! Planner: the store plus the two-state entry form.
//!
//! `Closed --enable(type)--> Open`, `Open --submit--> Closed` (adds an entry),
//! `Open --cancel--> Closed`. Deleting a row works in either mode.
//! Nothing in here knows how the state is drawn.

use crate::aggregate::Summary;
use crate::clock::Clock;
use crate::error::Result;
use crate::statement::{Amount, Statement, StatementType};
use crate::storage::KeyValueStore;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Action buttons are shown
    #[default]
    Closed,
    /// Entry form is shown for the given side
    Open(StatementType),
}

/// What the presentation layer can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Enable(StatementType),
    Submit {
        amount: Option<Amount>,
        remarks: Option<String>,
    },
    Cancel,
    Delete(i64),
}

pub struct Planner<S, C> {
    store: Store<S, C>,
    mode: Mode,
}

impl<S: KeyValueStore, C: Clock> Planner<S, C> {
    pub fn new(store: Store<S, C>) -> Self {
        Self {
            store,
            mode: Mode::Closed,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.mode, Mode::Open(_))
    }

    /// Side the form is collecting, if open
    pub fn active_type(&self) -> Option<StatementType> {
        match self.mode {
            Mode::Open(kind) => Some(kind),
            Mode::Closed => None,
        }
    }

    pub fn statements(&self) -> &[Statement] {
        self.store.statements()
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self.store.statements())
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::Enable(kind) => self.enable(kind),
            Intent::Submit { amount, remarks } => self.submit(amount, remarks)?,
            Intent::Cancel => self.cancel(),
            Intent::Delete(id) => {
                self.store.remove(id)?;
            }
        }
        Ok(())
    }

    pub fn enable(&mut self, kind: StatementType) {
        tracing::debug!(kind = %kind, "form opened");
        self.mode = Mode::Open(kind);
    }

    /// Add the entry and close the form. Ignored while closed.
    ///
    /// If the write fails the form stays open so the input is not lost.
    pub fn submit(&mut self, amount: Option<Amount>, remarks: Option<String>) -> Result<()> {
        let Mode::Open(kind) = self.mode else {
            tracing::debug!("submit ignored, form is closed");
            return Ok(());
        };
        self.store.add(kind, amount, remarks)?;
        self.mode = Mode::Closed;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.mode = Mode::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn planner() -> Planner<MemoryStorage, FixedClock> {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        Planner::new(Store::open(MemoryStorage::new(), FixedClock::new(100, d)))
    }

    #[test]
    fn test_starts_closed() {
        let p = planner();
        assert_eq!(p.mode(), Mode::Closed);
        assert!(!p.is_form_open());
        assert_eq!(p.active_type(), None);
    }

    #[test]
    fn test_submit_adds_and_closes() {
        let mut p = planner();
        p.dispatch(Intent::Enable(StatementType::Expense)).unwrap();
        assert_eq!(p.active_type(), Some(StatementType::Expense));

        p.dispatch(Intent::Submit {
            amount: Some(Amount::from("40")),
            remarks: Some("lunch".into()),
        })
        .unwrap();
        assert_eq!(p.mode(), Mode::Closed);
        assert_eq!(p.statements().len(), 1);
        assert_eq!(p.statements()[0].kind, StatementType::Expense);
        assert_eq!(p.summary().balance, -40.0);
    }

    #[test]
    fn test_cancel_does_not_mutate() {
        let mut p = planner();
        p.dispatch(Intent::Enable(StatementType::Income)).unwrap();
        p.dispatch(Intent::Cancel).unwrap();
        assert_eq!(p.mode(), Mode::Closed);
        assert!(p.statements().is_empty());
    }

    #[test]
    fn test_submit_while_closed_is_ignored() {
        let mut p = planner();
        p.dispatch(Intent::Submit {
            amount: Some(Amount::from("1")),
            remarks: None,
        })
        .unwrap();
        assert!(p.statements().is_empty());
    }

    #[test]
    fn test_enable_switches_side_while_open() {
        let mut p = planner();
        p.enable(StatementType::Income);
        p.enable(StatementType::Expense);
        assert_eq!(p.mode(), Mode::Open(StatementType::Expense));
    }

    #[test]
    fn test_delete_keeps_mode() {
        let mut p = planner();
        p.enable(StatementType::Income);
        p.submit(Some(Amount::from("5")), None).unwrap();
        let id = p.statements()[0].id;
        p.enable(StatementType::Income);
        p.dispatch(Intent::Delete(id)).unwrap();
        assert!(p.statements().is_empty());
        assert!(p.is_form_open());
    }
}
