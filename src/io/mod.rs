//! Input/output helpers.
//!
//! - catalog column resolution (`schema`)
//! - CSV ingest + validation (`ingest`)
//! - annotated CSV exports (`export`)
//! - prediction summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod schema;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use schema::*;
pub use summary::*;
