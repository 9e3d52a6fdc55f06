//! # Whitelist
//!
//! Decides which links discovered on the base page are in scope for the
//! snapshot. A whitelist is a list of plain-text patterns plus a [`MatchMode`]
//! and an explicit [`EmptyPolicy`] for the case where no pattern is given.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::core::SnapshotError;

/// How a pattern is compared against a normalized URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// The URL has to end with the pattern
    #[default]
    Suffix,
    /// The pattern may occur anywhere in the URL
    Substring,
}

/// What an empty whitelist means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyPolicy {
    /// Every discovered URL is in scope
    MatchAll,
    /// No discovered URL is in scope
    #[default]
    MatchNone,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "suffix" => Ok(MatchMode::Suffix),
            "substring" => Ok(MatchMode::Substring),
            _ => Err(format!(
                "invalid match mode \"{value}\" (expected \"suffix\" or \"substring\")"
            )),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchMode::Suffix => write!(f, "suffix"),
            MatchMode::Substring => write!(f, "substring"),
        }
    }
}

impl FromStr for EmptyPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "match-all" | "all" => Ok(EmptyPolicy::MatchAll),
            "match-none" | "none" => Ok(EmptyPolicy::MatchNone),
            _ => Err(format!(
                "invalid empty-whitelist policy \"{value}\" (expected \"match-all\" or \"match-none\")"
            )),
        }
    }
}

impl fmt::Display for EmptyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmptyPolicy::MatchAll => write!(f, "match-all"),
            EmptyPolicy::MatchNone => write!(f, "match-none"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    patterns: Vec<String>,
    mode: MatchMode,
    empty_policy: EmptyPolicy,
}

impl Whitelist {
    /// Builds a whitelist from raw patterns; blank patterns are dropped since
    /// every URL ends with (and contains) the empty string.
    pub fn new<I, S>(patterns: I, mode: MatchMode, empty_policy: EmptyPolicy) -> Whitelist
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Whitelist {
            patterns: patterns
                .into_iter()
                .map(|pattern| pattern.as_ref().trim().to_string())
                .filter(|pattern| !pattern.is_empty())
                .collect(),
            mode,
            empty_policy,
        }
    }

    /// Reads a whitelist file: one pattern per line, no comments or escaping.
    pub fn load(
        path: &Path,
        mode: MatchMode,
        empty_policy: EmptyPolicy,
    ) -> Result<Whitelist, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|source| SnapshotError::WhitelistFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Whitelist::new(contents.lines(), mode, empty_policy))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn empty_policy(&self) -> EmptyPolicy {
        self.empty_policy
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks a normalized URL against the whitelist.
    pub fn matches(&self, url: &str) -> bool {
        if self.patterns.is_empty() {
            return self.empty_policy == EmptyPolicy::MatchAll;
        }

        match self.mode {
            MatchMode::Suffix => self
                .patterns
                .iter()
                .any(|pattern| url.ends_with(pattern.as_str())),
            MatchMode::Substring => self
                .patterns
                .iter()
                .any(|pattern| url.contains(pattern.as_str())),
        }
    }
}

/// Returns `true` when `url` is in scope for a snapshot using `whitelist`.
pub fn is_in_scope(url: &str, whitelist: &Whitelist) -> bool {
    whitelist.matches(url)
}
