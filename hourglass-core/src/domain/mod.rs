//! Core domain types
//!
//! This module contains the structures the dispatcher reasons about. They are
//! free of I/O so that slot selection can be tested as a pure function of
//! (roster, slot).

pub mod dispatch;
pub mod roster;
pub mod slot;
