//! Entry and collection validation.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::author::Author;
use crate::entry::Entry;
use crate::error::ValidationError;
use crate::kinds::ResolvedAssets;
use crate::scene::SceneInspector;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("name regex"));

/// Checks entries against the common rules and their kind's rules.
///
/// Validation is pure: entries are borrowed, and the asset paths they
/// resolve to are returned instead of being stored on them.
pub struct EntryValidator<'a> {
    scenes: &'a dyn SceneInspector,
}

impl<'a> EntryValidator<'a> {
    pub fn new(scenes: &'a dyn SceneInspector) -> Self {
        Self { scenes }
    }

    /// Name must be non-empty and use only `[A-Za-z0-9_-]`.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !NAME_PATTERN.is_match(name) {
            return Err(ValidationError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Validates one entry without looking at the author.
    pub fn validate_entry(&self, entry: &Entry) -> Result<ResolvedAssets, ValidationError> {
        Self::validate_name(&entry.name)?;

        if entry.version <= 0 {
            return Err(ValidationError::InvalidVersion {
                name: entry.name.clone(),
                version: entry.version,
            });
        }

        let strategy = entry.strategy();
        strategy.validate_extra(entry, self.scenes)?;
        let resolved = strategy.resolve_assets(entry);

        debug!(
            entry = %entry.name,
            kind = %entry.content_kind(),
            assets = resolved.bundle_assets().len(),
            "Entry valid"
        );
        Ok(resolved)
    }

    /// Validates the author, then the entry.
    pub fn validate(&self, entry: &Entry, author: &Author) -> Result<ResolvedAssets, ValidationError> {
        author.validate()?;
        self.validate_entry(entry)
    }

    /// The checks that abort a whole run: the author, and that at least
    /// one entry is selected. Returns the selected entries.
    pub fn validate_collection<'e>(
        &self,
        author: &Author,
        entries: &'e [Entry],
    ) -> Result<Vec<&'e Entry>, ValidationError> {
        author.validate()?;

        let selected: Vec<&Entry> = entries.iter().filter(|e| e.selected_to_build).collect();
        if selected.is_empty() {
            return Err(ValidationError::NothingToBuild);
        }
        Ok(selected)
    }

    /// Validates the author once, then every selected entry, stopping at
    /// the first failure.
    pub fn validate_all(&self, author: &Author, entries: &[Entry]) -> Result<(), ValidationError> {
        for entry in self.validate_collection(author, entries)? {
            self.validate_entry(entry)?;
        }
        Ok(())
    }
}
