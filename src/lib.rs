//! # rcini - Rust Config INI
//!
//! A thread-safe, file-backed INI configuration store. Sections of string
//! key/value pairs live in one file on disk; a [`ConfigStore`] keeps an
//! in-memory cache of them that is rebuilt from disk before every query and
//! after every mutation.
//!
//! ## Features
//!
//! - **Read-modify-write under one lock**: writes and deletes re-parse the
//!   file, edit that fresh copy and save it while holding the store lock
//! - **Always-fresh queries**: lookups refresh the cache from disk first
//! - **Idempotent deletes**: removing something already gone is not an error
//! - **Pluggable codec**: the [`IniCodec`] trait, with a `rust-ini` backed default
//! - **Injectable paths**: [`PathResolver`] decouples file locations from the
//!   running process for deterministic tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rcini::ConfigStore;
//!
//! # fn example() -> rcini::Result<()> {
//! let store = ConfigStore::builder()
//!     .base_dir("~/.config/my-app")
//!     .file("settings.ini")
//!     .build()?;
//!
//! store.write("Server", "host", "localhost")?;
//! store.write("Server", "port", "8080")?;
//!
//! assert_eq!(store.find("Server", "port"), "8080");
//! assert_eq!(store.key_list("Server"), vec!["host", "port"]);
//!
//! store.delete_value("Server", "port")?;
//! assert_eq!(store.find("Server", "port"), "");
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing Between Threads
//!
//! ```rust,no_run
//! use rcini::ConfigStore;
//! use std::sync::Arc;
//! use std::thread;
//!
//! # fn example() -> rcini::Result<()> {
//! let store = Arc::new(ConfigStore::builder().file("shared.ini").build()?);
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let store = Arc::clone(&store);
//!         thread::spawn(move || store.write("Workers", &format!("w{i}"), "ready"))
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().expect("worker panicked")?;
//! }
//! assert_eq!(store.key_list("Workers").len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Absence
//!
//! [`ConfigStore::find`] returns an empty string for a missing section or key
//! and never fails. [`ConfigStore::exist_section`] and
//! [`ConfigStore::exist_value`] report absence as errors instead.
//!
//! ## Cross-process use
//!
//! The lock is in-process only. Two processes writing the same file are not
//! coordinated; the last writer wins.

// Core modules
mod error;
mod section;
mod store;
mod sync;

pub mod codec;
pub mod fs;
pub mod path;

// Re-exports from core
pub use codec::{CodecError, Document, IniCodec, IniFileCodec, RawSection};
pub use error::{Error, Result};
pub use fs::{FileKind, probe};
pub use path::PathResolver;
pub use section::Section;
pub use store::{ConfigStore, StoreBuilder, StoreOptions};
