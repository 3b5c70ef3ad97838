//! Quizsmith SQL Generation
//!
//! Turns ordered date-range → value schedules into SQL `CASE WHEN`
//! expressions.
//!
//! - `entry` - Raw and validated date-range entries
//! - `builder` - `CaseExpressionBuilder` and the overlap policy

pub mod builder;
pub mod entry;

pub use builder::{find_overlaps, CaseExpressionBuilder, IdentifierPolicy, OverlapPolicy};
pub use entry::{validate_entries, CaseValue, DateRangeEntry, RawDateRangeEntry};
