//! Builder for ConfigStore
//!
//! This module contains [`StoreBuilder`] which provides a fluent API for
//! creating an initialized [`ConfigStore`].

use crate::codec::{IniCodec, IniFileCodec};
use crate::error::Result;
use crate::path::PathResolver;
use crate::store::{ConfigStore, StoreOptions};
use std::path::PathBuf;

/// Builder for creating a [`ConfigStore`] with a fluent API.
///
/// Anything not set falls back to the running process: the executable's
/// directory as base and its file name as program name.
///
/// # Example
///
/// ```rust,no_run
/// use rcini::ConfigStore;
///
/// let store = ConfigStore::builder()
///     .base_dir("~/.local/share/my-app")
///     .program_name("my-app")
///     .strict_writes(true)
///     .build()?;
///
/// // ~/.local/share/my-app/config/my-app.ini
/// println!("{}", store.current_path()?.display());
/// # Ok::<(), rcini::Error>(())
/// ```
#[derive(Debug)]
pub struct StoreBuilder<C: IniCodec = IniFileCodec> {
    codec: C,
    base_dir: Option<PathBuf>,
    program_name: Option<String>,
    file: Option<PathBuf>,
    options: StoreOptions,
}

impl StoreBuilder<IniFileCodec> {
    pub fn new() -> Self {
        Self {
            codec: IniFileCodec::new(),
            base_dir: None,
            program_name: None,
            file: None,
            options: StoreOptions::default(),
        }
    }
}

impl Default for StoreBuilder<IniFileCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: IniCodec> StoreBuilder<C> {
    /// Set the base directory all paths are resolved against.
    ///
    /// Supports `~` expansion for home directory.
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    /// Set the program name used for the default file name.
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Use `{base}/{relative}` instead of `{base}/config/{program}.ini`.
    pub fn file(mut self, relative: impl Into<PathBuf>) -> Self {
        self.file = Some(relative.into());
        self
    }

    /// Swap in a different codec.
    pub fn codec<C2: IniCodec>(self, codec: C2) -> StoreBuilder<C2> {
        StoreBuilder {
            codec,
            base_dir: self.base_dir,
            program_name: self.program_name,
            file: self.file,
            options: self.options,
        }
    }

    /// Return save failures from `write` instead of only logging them.
    pub fn strict_writes(mut self, strict: bool) -> Self {
        self.options.strict_writes = strict;
        self
    }

    /// Restrict created directories and files to their owner (Unix).
    pub fn secure_permissions(mut self, secure: bool) -> Self {
        self.options.secure_permissions = secure;
        self
    }

    /// Build and initialize the [`ConfigStore`].
    ///
    /// Does not touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter) if
    /// the relative file path is empty or not valid Unicode.
    pub fn build(self) -> Result<ConfigStore<C>> {
        let mut store = ConfigStore::with_codec(self.codec).with_options(self.options);

        if self.base_dir.is_some() || self.program_name.is_some() {
            let process = PathResolver::from_process();
            let base_dir = self
                .base_dir
                .unwrap_or_else(|| process.base_dir().to_path_buf());
            let program_name = self
                .program_name
                .unwrap_or_else(|| process.program_name().to_string());
            store = store.with_resolver(PathResolver::new(base_dir, program_name));
        }

        match self.file {
            Some(relative) => store.initialize_at(relative)?,
            None => store.initialize()?,
        }
        Ok(store)
    }
}
