//! # Keepwatch Library
//!
//! Core of the keepwatch stopwatch: the running/paused state machine, the
//! clock it reads, and the persistence path that keeps the accumulated time
//! across restarts (startup load, periodic autosave, and the final save
//! performed before the host window closes).

pub mod autosave;
pub mod clock;
pub mod lifecycle;
pub mod persistence;
pub mod schedule;
pub mod stopwatch;

#[cfg(test)]
pub(crate) mod test_support;
