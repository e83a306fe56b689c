//! Report module - cleaning summary and dashboard output

pub mod dashboard_view;
pub mod summary;

pub use dashboard_view::*;
pub use summary::*;
