//! Data Transfer Objects for control plane communication
//!
//! DTOs are the JSON shapes sent to and received from the execution backend.

pub mod task;
