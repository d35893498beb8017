//! Endpoint handlers

pub mod recommendations;
pub mod status;
