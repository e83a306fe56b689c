//! Pipeline module - loading, cleaning and querying the vehicle table

pub mod aggregate;
pub mod bins;
pub mod clean;
pub mod error;
pub mod loader;
pub mod record;
pub mod stats;
pub mod table;

pub use aggregate::*;
pub use bins::*;
pub use clean::*;
pub use error::*;
pub use loader::*;
pub use record::*;
pub use table::*;
