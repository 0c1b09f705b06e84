//! Hourglass Core
//!
//! Core types and abstractions for the Hourglass hourly dispatcher.
//!
//! This crate contains:
//! - Domain types: Roster, Slot, dispatch requests and outcomes
//! - DTOs: Wire types exchanged with the execution backend's control plane

pub mod domain;
pub mod dto;
