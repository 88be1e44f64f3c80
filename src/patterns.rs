//! Strip rules: candidate extensions, ignored directories and the sentinel phrase.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path};

// Embed the default rules directly in the binary at compile time
const DEFAULTS_TOML: &str = include_str!("../defaults.toml");

/// How ignored directory names are compared against a visited directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreMatch {
    /// A path component below the scan root must equal the ignored name
    #[default]
    Segment,
    /// The full visited path only has to contain the ignored name
    Substring,
}

/// How far a marker block may extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockScope {
    /// From a `/**` opener through the sentinel to the nearest `*/` after it,
    /// possibly crossing earlier closers
    #[default]
    Span,
    /// A single `/** ... */` comment that contains the sentinel
    Comment,
}

/// Rules applied to every run
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StripRules {
    pub extensions: Vec<String>,
    pub ignored_dirs: Vec<String>,
    #[serde(default)]
    pub ignore_match: IgnoreMatch,
    pub sentinel: String,
    #[serde(default)]
    pub block_scope: BlockScope,
}

/// User overrides; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesOverride {
    extensions: Option<Vec<String>>,
    ignored_dirs: Option<Vec<String>>,
    ignore_match: Option<IgnoreMatch>,
    sentinel: Option<String>,
    block_scope: Option<BlockScope>,
}

impl StripRules {
    /// Built-in rules from `defaults.toml`
    pub fn defaults() -> Result<Self> {
        toml::from_str(DEFAULTS_TOML).context("Failed to parse built-in strip rules")
    }

    /// Built-in rules, with any keys present in `path` replacing the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut rules = Self::defaults()?;

        if let Some(path) = path {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read rules file {}", path.display()))?;
            rules = rules
                .merge_str(&text)
                .with_context(|| format!("Failed to parse rules file {}", path.display()))?;
        }

        rules.validate()?;
        Ok(rules)
    }

    fn merge_str(mut self, text: &str) -> Result<Self> {
        let overrides: RulesOverride = toml::from_str(text)?;

        if let Some(extensions) = overrides.extensions {
            self.extensions = extensions;
        }
        if let Some(ignored_dirs) = overrides.ignored_dirs {
            self.ignored_dirs = ignored_dirs;
        }
        if let Some(ignore_match) = overrides.ignore_match {
            self.ignore_match = ignore_match;
        }
        if let Some(sentinel) = overrides.sentinel {
            self.sentinel = sentinel;
        }
        if let Some(block_scope) = overrides.block_scope {
            self.block_scope = block_scope;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            bail!("At least one file extension is required");
        }
        if self.extensions.iter().any(|ext| ext.is_empty()) {
            bail!("File extensions must not be empty");
        }
        if self.sentinel.trim().is_empty() {
            bail!("Sentinel phrase must not be empty");
        }
        Ok(())
    }
}

/// Check whether a file name ends with one of the candidate extensions.
/// The comparison is a case-sensitive suffix match on the file name only.
pub fn is_candidate(path: &Path, rules: &StripRules) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();

    rules
        .extensions
        .iter()
        .any(|ext| name.ends_with(ext.as_str()))
}

/// Check whether a directory should be pruned from the walk.
///
/// In `Segment` mode only components below `root` are compared, so a scan
/// root that itself lives under e.g. `node_modules` is still walked.
/// In `Substring` mode the whole path as visited is searched, which also
/// prunes names like `.github` (contains `.git`) or `my-node_modules-backup`.
pub fn is_ignored_dir(path: &Path, root: &Path, rules: &StripRules) -> bool {
    if rules.ignored_dirs.is_empty() {
        return false;
    }

    match rules.ignore_match {
        IgnoreMatch::Substring => {
            let full = path.to_string_lossy();
            rules
                .ignored_dirs
                .iter()
                .any(|ignored| full.contains(ignored.as_str()))
        }
        IgnoreMatch::Segment => {
            let relative = path.strip_prefix(root).unwrap_or(path);
            relative.components().any(|c| {
                if let Component::Normal(name) = c {
                    let name = name.to_string_lossy();
                    rules.ignored_dirs.iter().any(|ignored| *ignored == name)
                } else {
                    false
                }
            })
        }
    }
}
