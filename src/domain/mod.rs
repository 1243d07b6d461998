//! Core domain types and logic.

pub mod series;
pub mod calendar;
pub mod rolling;
pub mod augment;
pub mod strategy;
pub mod rank;
pub mod universe;
pub mod config;
pub mod error;
