//! Database models and queries

pub mod init;
pub mod mappings;
pub mod models;
pub mod price_fields;

pub use init::*;
pub use mappings::*;
pub use models::*;
pub use price_fields::*;
