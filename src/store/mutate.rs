use crate::codec::{CodecError, Document, IniCodec};
use crate::error::{Error, Result};
use crate::fs::{self, FileKind};
use crate::store::ConfigStore;
use crate::sync::MutexExt;

use log::{debug, error, info, warn};
use std::path::Path;

fn require_arg(op: &'static str, field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::MissingArgument { op, field })
    } else {
        Ok(())
    }
}

impl<C: IniCodec> ConfigStore<C> {
    /// Set `key` to `value` in `section`, creating the file, its directory
    /// and the section as needed.
    ///
    /// The cache is refreshed before the lock is taken and again after it is
    /// released.
    ///
    /// # Save failures
    ///
    /// Unless [`strict_writes`](crate::StoreOptions::strict_writes) is set, a
    /// failure in the final save step is logged and `Ok(())` is still
    /// returned. Callers that need to know should enable strict writes or
    /// check with [`find`](Self::find) afterwards.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingArgument`] if any argument is empty (no I/O happens)
    /// * [`Error::InvalidParameter`] if the codec cannot store the entry
    ///   faithfully (no I/O happens)
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::TargetIsDirectory`] if the path is a directory
    /// * [`Error::DirectoryCreate`] / [`Error::FileCreate`] if the file cannot be created
    /// * [`Error::Parse`] if the existing file cannot be parsed
    /// * [`Error::Save`] only with strict writes
    pub fn write(&self, section: &str, key: &str, value: &str) -> Result<()> {
        const OP: &str = "write";

        require_arg(OP, "section", section)?;
        require_arg(OP, "key", key)?;
        require_arg(OP, "value", value)?;
        self.codec
            .validate_entry(section, key, value)
            .map_err(|reason| Error::InvalidParameter { op: OP, reason })?;
        let path = self.require_path(OP)?;

        // The file may legitimately not exist yet
        match self.refresh(OP) {
            Ok(()) | Err(Error::FileNotFound { .. }) => {}
            Err(e) => warn!("Refresh before write failed, continuing: {e}"),
        }

        let outcome = {
            let _guard = self.lock.lock_recovered();
            self.apply_write(path, section, key, value)
        };

        self.refresh_quietly(OP);
        outcome
    }

    fn apply_write(&self, path: &Path, section: &str, key: &str, value: &str) -> Result<()> {
        const OP: &str = "write";
        let secure = self.options.secure_permissions;

        match fs::probe(path) {
            Ok(FileKind::Directory) => {
                return Err(Error::TargetIsDirectory {
                    op: OP,
                    path: path.to_path_buf(),
                });
            }
            Ok(FileKind::File | FileKind::Other) => {}
            Err(_) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if !parent.is_dir() {
                        fs::ensure_dir(parent, secure)?;
                    }
                }
                fs::create_empty_file(path, secure)?;
                info!("Created configuration file {}", path.display());
            }
        }

        let mut document = self.parse_document(OP, path)?;
        document.section_or_insert(section).set(key, value);

        match self.persist(OP, &document, path) {
            Ok(()) => info!("Wrote [{section}] {key}"),
            Err(e) if self.options.strict_writes => return Err(e),
            Err(e) => error!("{e}; write reported success anyway (strict writes disabled)"),
        }
        Ok(())
    }

    /// Remove `section` and all of its keys.
    ///
    /// Deleting a section that does not exist succeeds and leaves the file
    /// untouched.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingArgument`] if `section` is empty
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::FileNotFound`] / [`Error::TargetIsDirectory`] if there is no file to edit
    /// * [`Error::Parse`] / [`Error::Save`] on codec failure
    pub fn delete_section(&self, section: &str) -> Result<()> {
        const OP: &str = "delete_section";

        require_arg(OP, "section", section)?;
        let path = self.require_path(OP)?;
        self.refresh_quietly(OP);

        let outcome = {
            let _guard = self.lock.lock_recovered();
            self.edit(OP, path, |document| {
                if document.remove_section(section).is_none() {
                    debug!("Section [{section}] not present, nothing to delete");
                    return Ok(false);
                }
                Ok(true)
            })
        };

        if let Ok(true) = outcome {
            info!("Deleted section [{section}]");
        }
        self.refresh_quietly(OP);
        outcome.map(drop)
    }

    /// Remove `key` from `section`.
    ///
    /// Deleting a key that does not exist in an existing section succeeds and
    /// leaves the file untouched.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingArgument`] if either argument is empty
    /// * [`Error::MissingPath`] if the store is not initialized
    /// * [`Error::SectionNotFound`] if `section` does not exist
    /// * [`Error::FileNotFound`] / [`Error::TargetIsDirectory`] if there is no file to edit
    /// * [`Error::Parse`] / [`Error::Save`] on codec failure
    pub fn delete_value(&self, section: &str, key: &str) -> Result<()> {
        const OP: &str = "delete_value";

        require_arg(OP, "section", section)?;
        require_arg(OP, "key", key)?;
        let path = self.require_path(OP)?;
        self.refresh_quietly(OP);

        let outcome = {
            let _guard = self.lock.lock_recovered();
            self.edit(OP, path, |document| {
                let raw = document
                    .section_mut(section)
                    .ok_or_else(|| Error::SectionNotFound {
                        op: OP,
                        section: section.to_string(),
                    })?;
                if raw.remove(key).is_none() {
                    debug!("Key {key} not present in [{section}], nothing to delete");
                    return Ok(false);
                }
                Ok(true)
            })
        };

        if let Ok(true) = outcome {
            info!("Deleted [{section}] {key}");
        }
        self.refresh_quietly(OP);
        outcome.map(drop)
    }

    /// Remove every named section from the file.
    ///
    /// Sections are deleted one at a time through
    /// [`delete_section`](Self::delete_section).
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; sections deleted before it stay
    /// deleted.
    pub fn clear(&self) -> Result<()> {
        const OP: &str = "clear";

        let path = self.require_path(OP)?;
        self.refresh_quietly(OP);

        let names: Vec<String> = {
            let _guard = self.lock.lock_recovered();
            self.require_file(OP, path)?;
            self.parse_document(OP, path)?
                .named_sections()
                .filter_map(|s| s.name().map(str::to_string))
                .collect()
        };

        for name in &names {
            self.delete_section(name)?;
        }

        info!("Cleared {} section(s) from {}", names.len(), path.display());
        Ok(())
    }

    /// Parse, let `change` mutate the fresh document, and save it if `change`
    /// returns `true`. Caller must hold `self.lock`.
    fn edit<F>(&self, op: &'static str, path: &Path, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Document) -> Result<bool>,
    {
        self.require_file(op, path)?;
        let mut document = self.parse_document(op, path)?;
        if !change(&mut document)? {
            return Ok(false);
        }
        self.persist(op, &document, path)?;
        Ok(true)
    }

    /// Drop the codec's stale backup, then save.
    fn persist(&self, op: &'static str, document: &Document, path: &Path) -> Result<()> {
        let save_error = |source: CodecError| Error::Save {
            op,
            path: path.to_path_buf(),
            source,
        };

        if let Some(backup) = self.codec.backup_path(path) {
            fs::remove_stale_backup(&backup);
        }

        self.codec.serialize(document, path).map_err(save_error)?;

        if self.options.secure_permissions {
            fs::restrict(path, 0o600).map_err(|e| save_error(CodecError::Io(e)))?;
        }
        Ok(())
    }
}
