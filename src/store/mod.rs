//! The configuration store
//!
//! - `core` - struct definition, initialization, refresh and status
//! - `mutate` - write, delete and clear (the locked read-modify-write cycle)
//! - `query` - cache-backed lookups
//! - `builder` - fluent construction

mod builder;
mod core;
mod mutate;
mod query;

pub use builder::StoreBuilder;
pub use self::core::{ConfigStore, StoreOptions};
