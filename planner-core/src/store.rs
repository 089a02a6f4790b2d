//! Statement store: the in-memory list, mirrored to a single key-value slot.
//!
//! The whole list is rewritten on every mutation. Reads never fail: a missing
//! or unreadable slot loads as an empty list. Writes propagate their error and
//! leave the in-memory list untouched.

use crate::clock::Clock;
use crate::error::Result;
use crate::statement::{Amount, Statement, StatementType};
use crate::storage::KeyValueStore;

/// Slot the statement list lives under
pub const STORAGE_KEY: &str = "@DATA/Statements";

/// Read the list under `key`, degrading to empty on any failure.
pub fn load(storage: &impl KeyValueStore, key: &str) -> Vec<Statement> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no persisted statements");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(key, "statement slot unreadable, starting empty: {err}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Option<Vec<Statement>>>(&raw) {
        Ok(list) => {
            let list = list.unwrap_or_default();
            tracing::debug!(key, count = list.len(), "statements loaded");
            list
        }
        Err(err) => {
            tracing::warn!(key, "discarding malformed statement data: {err}");
            Vec::new()
        }
    }
}

/// Write the full list under `key`.
pub fn persist(storage: &mut impl KeyValueStore, key: &str, list: &[Statement]) -> Result<()> {
    let json = serde_json::to_string(list)?;
    storage.set(key, &json)
}

pub struct Store<S, C> {
    storage: S,
    clock: C,
    key: String,
    statements: Vec<Statement>,
}

impl<S: KeyValueStore, C: Clock> Store<S, C> {
    /// Open the store on the default slot and load what is there.
    pub fn open(storage: S, clock: C) -> Self {
        Self::with_key(storage, clock, STORAGE_KEY)
    }

    pub fn with_key(storage: S, clock: C, key: impl Into<String>) -> Self {
        let key = key.into();
        let statements = load(&storage, &key);
        Self {
            storage,
            clock,
            key,
            statements,
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a new entry stamped with the current time and date.
    pub fn add(
        &mut self,
        kind: StatementType,
        amount: Option<Amount>,
        remarks: Option<String>,
    ) -> Result<&[Statement]> {
        let statement = Statement::new(
            self.clock.now_millis(),
            self.clock.today(),
            kind,
            amount,
            remarks,
        );
        tracing::debug!(id = statement.id, kind = %kind, "adding statement");

        let mut updated = self.statements.clone();
        updated.push(statement);
        self.commit(updated)
    }

    /// Drop every entry carrying `id`. Unknown ids still rewrite the slot.
    pub fn remove(&mut self, id: i64) -> Result<&[Statement]> {
        let updated: Vec<Statement> = self
            .statements
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        tracing::debug!(
            id,
            removed = self.statements.len() - updated.len(),
            "removing statement"
        );
        self.commit(updated)
    }

    fn commit(&mut self, updated: Vec<Statement>) -> Result<&[Statement]> {
        persist(&mut self.storage, &self.key, &updated)?;
        self.statements = updated;
        Ok(&self.statements)
    }
}
