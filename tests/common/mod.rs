//! Common test utilities for rcini integration tests
//!
//! Provides a temp-dir backed store fixture and file helpers.

#![allow(dead_code)]

use rcini::{ConfigStore, PathResolver};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Route `log` output through the test harness; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixture
// =============================================================================

/// A store rooted in its own temporary directory
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub store: ConfigStore,
}

impl TestFixture {
    /// Store at `{tmp}/config/fixture.ini` (the default layout)
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = ConfigStore::new().with_resolver(Self::resolver_for(temp_dir.path()));
        store.initialize().expect("Failed to initialize store");
        Self { temp_dir, store }
    }

    /// Store at `{tmp}/{relative}`
    pub fn with_file(relative: &str) -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = ConfigStore::new().with_resolver(Self::resolver_for(temp_dir.path()));
        store
            .initialize_at(relative)
            .expect("Failed to initialize store");
        Self { temp_dir, store }
    }

    /// Store whose file already holds `content`
    pub fn seeded(content: &str) -> Self {
        let fixture = Self::with_file("seeded.ini");
        fixture.write_raw(content);
        fixture
    }

    pub fn resolver_for(base: &Path) -> PathResolver {
        PathResolver::new(base, "fixture")
    }

    /// A second, independent store over the same file
    pub fn second_store(&self) -> ConfigStore {
        let mut store = ConfigStore::new().with_resolver(Self::resolver_for(self.temp_dir.path()));
        let relative = self
            .path()
            .strip_prefix(self.temp_dir.path())
            .expect("store path outside temp dir")
            .to_path_buf();
        store
            .initialize_at(relative)
            .expect("Failed to initialize second store");
        store
    }

    pub fn path(&self) -> PathBuf {
        self.store
            .current_path()
            .expect("store not initialized")
            .to_path_buf()
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(self.path()).expect("Failed to read config file")
    }

    pub fn write_raw(&self, content: &str) {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create config dir");
        }
        std::fs::write(path, content).expect("Failed to write config file");
    }
}

/// Sort a list for order-independent comparisons
pub fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}
