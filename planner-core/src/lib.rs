//! planner-core: statement ledger, persistence and aggregates for the expense planner

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod planner;
pub mod statement;
pub mod storage;
pub mod store;

pub use aggregate::{Summary, balance, expense, income, total_by_type};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{PlannerError, Result};
pub use planner::{Intent, Mode, Planner};
pub use statement::{Amount, Statement, StatementType, format_date, format_number};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{STORAGE_KEY, Store, load, persist};
