pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod safety;
pub mod seed;
pub mod service;
pub mod store;
pub mod sync;

pub use error::{BeachError, Result};
pub use model::{BeachPatch, BeachRecord, StoredBeach};
pub use store::BeachStore;
