//! Configuration path resolution
//!
//! The store never reads process state on its own; everything it needs to
//! build a path comes from a [`PathResolver`], which can be constructed
//! explicitly for tests or derived from the running executable.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Computes configuration file locations from a base directory and a program name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_dir: PathBuf,
    program_name: String,
}

impl PathResolver {
    /// Create a resolver from explicit parts
    ///
    /// Supports `~` expansion for the home directory. Relative base
    /// directories are made absolute against the current working directory.
    pub fn new(base_dir: impl Into<PathBuf>, program_name: impl Into<String>) -> Self {
        let base_dir = expand_home(base_dir.into());
        let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
        Self {
            base_dir: normalize(&base_dir),
            program_name: program_name.into(),
        }
    }

    /// Derive the resolver from the running executable
    ///
    /// The base directory is the executable's directory, except for binaries
    /// that live in a cargo `target/**/deps` directory (test harnesses), which
    /// use the current working directory instead.
    pub fn from_process() -> Self {
        let exe = std::env::current_exe().ok();
        let program_name = exe
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Self {
            base_dir: process_base_dir(exe.as_deref()),
            program_name,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// File name of the default configuration: the program name up to its
    /// first `.`, with an `.ini` extension
    pub fn config_file_name(&self) -> String {
        let name = self.program_name.as_str();
        let stem = match name.split_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        };
        format!("{stem}.ini")
    }

    /// `{base_dir}/config/{program}.ini`
    pub fn default_path(&self) -> PathBuf {
        self.base_dir.join("config").join(self.config_file_name())
    }

    /// `{base_dir}/{relative}`, cleaned lexically
    ///
    /// Root and prefix components of `relative` are dropped, so `/x.ini`
    /// resolves to `{base_dir}/x.ini`. `..` may still climb above the base.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative: PathBuf = relative
            .as_ref()
            .components()
            .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
            .collect();
        normalize(&self.base_dir.join(relative))
    }
}

fn process_base_dir(exe: Option<&Path>) -> PathBuf {
    match exe.and_then(Path::parent) {
        Some(dir) if !is_build_output_dir(dir) => dir.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn is_build_output_dir(dir: &Path) -> bool {
    dir.file_name() == Some(OsStr::new("deps"))
        && dir
            .ancestors()
            .any(|a| a.file_name() == Some(OsStr::new("target")))
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

/// Lexically resolve `.` and `..` components
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
