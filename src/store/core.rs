use crate::codec::{CodecError, Document, IniCodec, IniFileCodec};
use crate::error::{Error, Result};
use crate::fs::{FileKind, probe};
use crate::path::PathResolver;
use crate::section::Section;
use crate::store::StoreBuilder;
use crate::sync::{MutexExt, RwLockExt};

use log::{debug, info};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

/// Behavioral switches for a [`ConfigStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Return save failures from [`ConfigStore::write`] instead of logging them
    pub strict_writes: bool,

    /// Create directories as 0o700 and files as 0o600 (Unix only)
    pub secure_permissions: bool,
}

/// Thread-safe, file-backed INI configuration store.
///
/// The store keeps an in-memory cache of every named section in its backing
/// file. The cache is never trusted for mutations: each write or delete
/// re-parses the file under the store lock, applies the change to that fresh
/// copy, saves it, and then rebuilds the cache from disk. Queries rebuild the
/// cache before answering, so they always see the latest saved state.
///
/// # Example
///
/// ```rust,no_run
/// use rcini::ConfigStore;
///
/// let mut store = ConfigStore::new();
/// store.initialize_at("config/app.ini")?;
///
/// store.write("Print", "Hello", "World")?;
/// assert_eq!(store.find("Print", "Hello"), "World");
/// # Ok::<(), rcini::Error>(())
/// ```
///
/// Share it between threads with `&` or `Arc`; it is never cloned because the
/// lock must stay unique.
#[derive(Debug)]
pub struct ConfigStore<C: IniCodec = IniFileCodec> {
    /// Codec used for every parse and save
    pub(crate) codec: C,

    /// Injected path resolver; `None` means "derive from the running process"
    pub(crate) resolver: Option<PathResolver>,

    pub(crate) options: StoreOptions,

    /// Backing file, `None` until initialized
    pub(crate) path: Option<PathBuf>,

    /// Guards the read-modify-write cycle and refresh
    pub(crate) lock: Mutex<()>,

    /// Section name -> section, rebuilt wholesale on every refresh
    pub(crate) sections: RwLock<HashMap<String, Section>>,
}

impl ConfigStore<IniFileCodec> {
    /// Create an uninitialized store using the default codec.
    ///
    /// Every file operation fails with [`Error::MissingPath`] until
    /// [`initialize`](Self::initialize) or [`initialize_at`](Self::initialize_at)
    /// is called.
    pub fn new() -> Self {
        Self::with_codec(IniFileCodec::new())
    }

    /// Create a [`StoreBuilder`] for fluent configuration.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }
}

impl Default for ConfigStore<IniFileCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: IniCodec> ConfigStore<C> {
    /// Create an uninitialized store using a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            resolver: None,
            options: StoreOptions::default(),
            path: None,
            lock: Mutex::new(()),
            sections: RwLock::new(HashMap::new()),
        }
    }

    /// Use `resolver` instead of the running process to compute paths.
    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the store options.
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Point the store at `{base}/config/{program}.ini`.
    ///
    /// Resets the cache and the lock. Does not touch the filesystem, so a
    /// nonexistent file is fine.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` to mirror
    /// [`initialize_at`](Self::initialize_at).
    pub fn initialize(&mut self) -> Result<()> {
        self.reset();
        let path = self.resolver().default_path();
        info!("Configuration path set to {}", path.display());
        self.path = Some(path);
        Ok(())
    }

    /// Point the store at `{base}/{relative}`.
    ///
    /// `relative` is cleaned lexically; root components are dropped so the
    /// result lives under the base directory. Resets the cache and the lock
    /// even when it fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `relative` is empty or not valid
    /// Unicode. The store is then left without a path.
    pub fn initialize_at(&mut self, relative: impl AsRef<Path>) -> Result<()> {
        const OP: &str = "initialize";

        self.reset();
        self.path = None;

        let relative = relative.as_ref();
        if relative.as_os_str().is_empty() {
            return Err(Error::InvalidParameter {
                op: OP,
                reason: "path is empty".into(),
            });
        }
        if relative.to_str().is_none() {
            return Err(Error::InvalidParameter {
                op: OP,
                reason: format!("path '{}' is not valid unicode", relative.display()),
            });
        }

        let path = self.resolver().resolve(relative);
        info!("Configuration path set to {}", path.display());
        self.path = Some(path);
        Ok(())
    }

    fn resolver(&self) -> PathResolver {
        self.resolver
            .clone()
            .unwrap_or_else(PathResolver::from_process)
    }

    fn reset(&mut self) {
        self.lock = Mutex::new(());
        self.sections
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Path of the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPath`] if the store is not initialized.
    pub fn current_path(&self) -> Result<&Path> {
        self.require_path("current_path")
    }

    pub(crate) fn require_path(&self, op: &'static str) -> Result<&Path> {
        self.path.as_deref().ok_or(Error::MissingPath { op })
    }

    /// Check that the backing file currently exists.
    ///
    /// Does not touch the cache.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::FileNotFound`] if nothing exists at the path
    /// * [`Error::TargetIsDirectory`] if the path is a directory
    pub fn status(&self) -> Result<()> {
        const OP: &str = "status";
        let path = self.require_path(OP)?;
        self.require_file(OP, path)
    }

    /// Rebuild the cache from the backing file.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::FileNotFound`] / [`Error::TargetIsDirectory`] if the path is unusable
    /// * [`Error::Parse`] if the codec fails
    ///
    /// The cache is empty after any failure other than `MissingPath`.
    pub fn read(&self) -> Result<()> {
        self.refresh("read")
    }

    /// Lock, then rebuild the cache.
    pub(crate) fn refresh(&self, op: &'static str) -> Result<()> {
        let path = self.require_path(op)?;
        let _guard = self.lock.lock_recovered();
        self.reload(op, path)
    }

    /// Refresh and log instead of failing; the cache is empty on failure.
    pub(crate) fn refresh_quietly(&self, op: &'static str) {
        if let Err(e) = self.refresh(op) {
            debug!("Refresh skipped: {e}");
        }
    }

    /// Rebuild the cache. Caller must hold `self.lock`.
    fn reload(&self, op: &'static str, path: &Path) -> Result<()> {
        let loaded = self
            .require_file(op, path)
            .and_then(|()| self.parse_document(op, path));

        let mut cache = self.sections.write_recovered();
        cache.clear();

        let document = loaded?;
        for raw in document.named_sections() {
            let Some(name) = raw.name() else { continue };
            // First occurrence wins, matching the codec's own lookups
            let mut data = HashMap::with_capacity(raw.entries().len());
            for (key, value) in raw.entries() {
                data.entry(key.clone()).or_insert_with(|| value.clone());
            }
            cache.insert(name.to_string(), Section::new(name, data));
        }

        debug!(
            "Refreshed {} section(s) from {}",
            cache.len(),
            path.display()
        );
        Ok(())
    }

    /// Ensure `path` is an existing non-directory.
    pub(crate) fn require_file(&self, op: &'static str, path: &Path) -> Result<()> {
        match probe(path) {
            Ok(FileKind::Directory) => Err(Error::TargetIsDirectory {
                op,
                path: path.to_path_buf(),
            }),
            Ok(FileKind::File | FileKind::Other) => Ok(()),
            Err(_) => Err(Error::FileNotFound {
                op,
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse through the codec, turning a codec panic into an error.
    pub(crate) fn parse_document(&self, op: &'static str, path: &Path) -> Result<Document> {
        let parsed = catch_unwind(AssertUnwindSafe(|| self.codec.parse(path)))
            .unwrap_or_else(|payload| Err(CodecError::Panicked(panic_message(payload.as_ref()))));

        parsed.map_err(|source| Error::Parse {
            op,
            path: path.to_path_buf(),
            source,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
