//! INI codec trait and the default `rust-ini` backed implementation
//!
//! The store never looks at INI text itself. It asks an [`IniCodec`] to turn a
//! file into a [`Document`] (an ordered list of sections, the first of which is
//! the implicit unnamed section) and to write a `Document` back.

use ini::{EscapePolicy, Ini, ParseOption, Properties, WriteOption};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reported by an [`IniCodec`]
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("codec panicked: {0}")]
    Panicked(String),
}

/// Trait for INI codec implementations
///
/// Implementations must be shareable between threads because a single
/// [`ConfigStore`](crate::ConfigStore) is used from many threads at once.
pub trait IniCodec: Send + Sync {
    /// Parse the file at `path`
    ///
    /// The returned document must start with the implicit unnamed section,
    /// even when the file has no entries before its first header.
    fn parse(&self, path: &Path) -> Result<Document, CodecError>;

    /// Serialize `document` to `path`, replacing its contents
    fn serialize(&self, document: &Document, path: &Path) -> Result<(), CodecError>;

    /// Backup artifact a previous [`serialize`](IniCodec::serialize) may have left behind
    fn backup_path(&self, path: &Path) -> Option<PathBuf> {
        let mut name = path.file_name()?.to_os_string();
        name.push(".bak");
        Some(path.with_file_name(name))
    }

    /// Check that an entry survives a save followed by a parse
    ///
    /// Returns a description of the problem otherwise. Accepts everything by
    /// default.
    fn validate_entry(&self, _section: &str, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

// =============================================================================
// Document
// =============================================================================

/// One section of a parsed file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSection {
    name: Option<String>,
    entries: Vec<(String, String)>,
}

impl RawSection {
    /// Create an empty named section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            entries: Vec::new(),
        }
    }

    /// Create the implicit unnamed section
    pub fn general() -> Self {
        Self::default()
    }

    /// Section name, `None` for the implicit section
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite the first occurrence of `key` in place and drop any later
    /// duplicates, or append a new pair
    ///
    /// Returns the previous value when the key already existed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) else {
            self.entries.push((key, value));
            return None;
        };

        let previous = std::mem::replace(&mut self.entries[idx].1, value);
        let mut position = 0;
        self.entries.retain(|(k, _)| {
            let keep = position <= idx || *k != key;
            position += 1;
            keep
        });
        Some(previous)
    }

    /// Remove every occurrence of `key`, returning the first value if any
    /// was present
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let first = self.get(key).map(str::to_string)?;
        self.entries.retain(|(k, _)| k != key);
        Some(first)
    }
}

/// Codec-level view of a whole file
///
/// Always holds at least the implicit unnamed section at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<RawSection>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            sections: vec![RawSection::general()],
        }
    }

    /// All sections including the implicit one
    pub fn sections(&self) -> &[RawSection] {
        &self.sections
    }

    /// Sections after the implicit one
    pub fn named_sections(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.iter().skip(1)
    }

    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.named_sections().find(|s| s.name() == Some(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut RawSection> {
        self.sections
            .iter_mut()
            .skip(1)
            .find(|s| s.name() == Some(name))
    }

    /// Get the named section, appending an empty one if it does not exist
    pub fn section_or_insert(&mut self, name: &str) -> &mut RawSection {
        let idx = match self.sections.iter().skip(1).position(|s| s.name() == Some(name)) {
            Some(i) => i + 1,
            None => {
                self.sections.push(RawSection::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Remove every section called `name`, returning the first one removed
    pub fn remove_section(&mut self, name: &str) -> Option<RawSection> {
        let idx = self.sections.iter().skip(1).position(|s| s.name() == Some(name))? + 1;
        let removed = self.sections.remove(idx);
        self.sections.retain(|s| s.name() != Some(name));
        Some(removed)
    }

    /// Append a section as-is; used by codecs while building a document
    pub fn push(&mut self, section: RawSection) {
        if section.name.is_none() {
            self.sections[0].entries.extend(section.entries);
        } else {
            self.sections.push(section);
        }
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut document = Self::new();
        for (name, properties) in ini.iter() {
            let entries = properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            document.push(RawSection {
                name: name.map(str::to_string),
                entries,
            });
        }
        document
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for section in &self.sections {
            let properties = ini.entry(section.name.clone()).or_insert(Properties::new());
            for (key, value) in &section.entries {
                properties.append(key.clone(), value.clone());
            }
        }
        ini
    }
}

// =============================================================================
// rust-ini Codec Implementation
// =============================================================================

/// INI codec backed by the `rust-ini` crate (default)
///
/// Writes go to a `.tmp` sibling which is then renamed over the target, so a
/// crash mid-save never leaves a truncated file behind.
#[derive(Debug, Clone, Default)]
pub struct IniFileCodec {
    keep_backup: bool,
}

impl IniFileCodec {
    pub fn new() -> Self {
        Self { keep_backup: false }
    }

    /// Copy the previous file to `<file>.bak` before every save
    pub fn with_backup() -> Self {
        Self { keep_backup: true }
    }
}

// Quotes are kept verbatim; reserved characters travel as backslash escapes
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: true,
        ..ParseOption::default()
    }
}

fn write_option() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Reserved,
        ..WriteOption::default()
    }
}

const SECTION_FORBIDDEN: &[char] = &['[', ']', '=', ':', ';', '#', '\\'];

impl IniCodec for IniFileCodec {
    fn parse(&self, path: &Path) -> Result<Document, CodecError> {
        let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|e| match e {
            ini::Error::Io(e) => CodecError::Io(e),
            other => CodecError::Syntax(other.to_string()),
        })?;
        Ok(Document::from_ini(&ini))
    }

    fn serialize(&self, document: &Document, path: &Path) -> Result<(), CodecError> {
        let mut content = Vec::new();
        document.to_ini().write_to_opt(&mut content, write_option())?;

        let file_name = path.file_name().ok_or_else(|| {
            CodecError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' has no file name", path.display()),
            ))
        })?;

        if self.keep_backup && path.is_file() {
            if let Some(backup) = self.backup_path(path) {
                std::fs::copy(path, backup)?;
            }
        }

        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// The parser trims keys and values, and section headers are not escaped
    fn validate_entry(&self, section: &str, key: &str, value: &str) -> Result<(), String> {
        for (field, text) in [("section", section), ("key", key), ("value", value)] {
            if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                return Err(format!("{field} '{text}' has leading or trailing whitespace"));
            }
        }
        if section.contains(SECTION_FORBIDDEN) || section.contains(char::is_control) {
            return Err(format!(
                "section '{section}' contains a reserved or control character"
            ));
        }
        if key.starts_with('[') {
            return Err(format!("key '{key}' starts with '['"));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
