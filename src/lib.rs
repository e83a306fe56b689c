//! Lotview: used-vehicle sales dashboard library
//!
//! Loads and cleans a vehicle listings dataset into an immutable typed
//! table, then answers the filter and group-average queries behind each
//! dashboard chart.

pub mod cli;
pub mod dashboard;
pub mod pipeline;
pub mod report;
pub mod utils;
