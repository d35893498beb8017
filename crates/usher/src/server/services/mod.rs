//! Recommendation engine services

pub mod expansion;
pub mod index;
pub mod keywords;
pub mod normalizer;
pub mod providers;
pub mod recommender;
pub mod store;
