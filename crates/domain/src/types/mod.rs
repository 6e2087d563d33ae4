//! Shared vocabulary types.
//!
//! Pure data types with no I/O, used by the engine to describe pipeline progress.

mod unit_state;
pub use unit_state::UnitState;
