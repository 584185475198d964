use crate::codec::IniCodec;
use crate::error::{Error, Result};
use crate::section::Section;
use crate::store::ConfigStore;
use crate::sync::RwLockExt;

use std::collections::HashMap;

impl<C: IniCodec> ConfigStore<C> {
    /// Look up a section after refreshing from disk.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingArgument`] if `section` is empty
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::SectionNotFound`] if the section does not exist
    pub fn exist_section(&self, section: &str) -> Result<Section> {
        const OP: &str = "exist_section";
        if section.is_empty() {
            return Err(Error::MissingArgument {
                op: OP,
                field: "section",
            });
        }
        self.require_path(OP)?;
        self.refresh_quietly(OP);
        self.cached_section(OP, section)
    }

    /// Look up a single value after refreshing from disk.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingArgument`] if either argument is empty
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::SectionNotFound`] / [`Error::ValueNotFound`] if absent
    pub fn exist_value(&self, section: &str, key: &str) -> Result<String> {
        const OP: &str = "exist_value";
        for (field, value) in [("section", section), ("key", key)] {
            if value.is_empty() {
                return Err(Error::MissingArgument { op: OP, field });
            }
        }
        self.require_path(OP)?;
        self.refresh_quietly(OP);

        self.cached_section(OP, section)?
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| Error::ValueNotFound {
                op: OP,
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Names of all sections, sorted. Empty if there are none or the file
    /// cannot be read.
    pub fn section_list(&self) -> Vec<String> {
        self.refresh_quietly("section_list");
        let mut names: Vec<String> = self.sections.read_recovered().keys().cloned().collect();
        names.sort();
        names
    }

    /// Keys of `section`, sorted. Empty if the section is missing or has no keys.
    pub fn key_list(&self, section: &str) -> Vec<String> {
        self.refresh_quietly("key_list");
        let mut keys: Vec<String> = self
            .sections
            .read_recovered()
            .get(section)
            .map(|s| s.keys().map(str::to_string).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Value of `key` in `section`, or an empty string if either is absent.
    ///
    /// Never fails, which makes it handy for chained lookups with defaults:
    ///
    /// ```rust,no_run
    /// # let store = rcini::ConfigStore::new();
    /// let host = match store.find("Net", "host") {
    ///     h if h.is_empty() => "localhost".to_string(),
    ///     h => h,
    /// };
    /// ```
    pub fn find(&self, section: &str, key: &str) -> String {
        self.refresh_quietly("find");
        self.sections
            .read_recovered()
            .get(section)
            .and_then(|s| s.get(key))
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Copy of every section after refreshing from disk.
    pub fn snapshot(&self) -> HashMap<String, Section> {
        self.refresh_quietly("snapshot");
        self.sections.read_recovered().clone()
    }

    /// Current sections as a JSON object of `{ section: { key: value } }`,
    /// with sections and keys in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    #[cfg(feature = "json")]
    pub fn export_json(&self, pretty: bool) -> Result<String> {
        use std::collections::BTreeMap;

        let snapshot = self.snapshot();
        let ordered: BTreeMap<&str, BTreeMap<&str, &str>> = snapshot
            .values()
            .map(|s| (s.name(), s.iter().collect()))
            .collect();

        let json = if pretty {
            serde_json::to_string_pretty(&ordered)?
        } else {
            serde_json::to_string(&ordered)?
        };
        Ok(json)
    }

    fn cached_section(&self, op: &'static str, section: &str) -> Result<Section> {
        self.sections
            .read_recovered()
            .get(section)
            .cloned()
            .ok_or_else(|| Error::SectionNotFound {
                op,
                section: section.to_string(),
            })
    }
}
