//! Data models

pub mod event;
