//! Team identity resolution.
//!
//! Data sources spell the same club differently ("FC Barcelona", "Barça",
//! "Barcelona"). `TeamIdentityResolver` folds those spellings onto one
//! canonical name per league and maps canonical names to badge images.

pub mod aliases;

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn fc_token() -> &'static Regex {
    static FC_TOKEN: OnceLock<Regex> = OnceLock::new();
    FC_TOKEN.get_or_init(|| Regex::new(r"(?i)\bfc\b").expect("FC token pattern is valid"))
}

/// Strip diacritics, drop the standalone token "FC" and collapse whitespace.
///
/// Diacritics go first so that a decomposed letter cannot re-form an "FC"
/// token after the token pass; this keeps `clean` idempotent.
pub fn clean_name(raw: &str) -> String {
    let plain: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();
    let without_fc = fc_token().replace_all(&plain, " ");
    without_fc.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn alias_key(name: &str) -> String {
    clean_name(name).to_lowercase()
}

/// Follow `key` through `entries` until a name maps to itself, a name has
/// no entry, or the chain loops.
fn follow(entries: &HashMap<String, String>, key: &str) -> String {
    let mut seen = HashSet::new();
    let mut current = key.to_string();
    let mut name = key.to_string();
    while seen.insert(current.clone()) {
        match entries.get(&current) {
            Some(next) => {
                name = next.clone();
                current = alias_key(next);
            }
            None => break,
        }
    }
    name
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Per-league alias → canonical name mapping. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TeamAliasTable {
    entries: HashMap<String, String>,
}

impl TeamAliasTable {
    /// Build a table from alias/canonical pairs; later pairs override
    /// earlier ones for the same alias.
    ///
    /// Keys are cleaned and lowercased the same way lookups are. Each pair
    /// also registers its canonical name under its own key, overriding
    /// earlier pairs but not later ones. Values are then followed through
    /// the table to their final spelling, so a canonical name always
    /// resolves to itself.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: HashMap<String, String> = HashMap::new();
        for (alias, target) in pairs {
            let key = alias_key(alias.as_ref());
            let target = clean_name(target.as_ref());
            if key.is_empty() || target.is_empty() {
                continue;
            }
            entries.insert(key, target.clone());
            entries.insert(alias_key(&target), target);
        }

        let resolved = entries
            .keys()
            .map(|key| (key.clone(), follow(&entries, key)))
            .collect();

        Self { entries: resolved }
    }

    /// Built-in aliases for `league_key` with `extra` merged on top.
    pub fn for_league(league_key: &str, extra: &HashMap<String, String>) -> Self {
        let builtin = aliases::builtin_aliases(league_key)
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let mut extra: Vec<(String, String)> =
            extra.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        extra.sort();
        Self::new(builtin.chain(extra))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Badge table
// ---------------------------------------------------------------------------

/// Canonical team name → badge image URL, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TeamBadgeTable {
    entries: HashMap<String, String>,
}

impl TeamBadgeTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, url)| (name.as_ref().trim().to_lowercase(), url.as_ref().trim().to_string()))
            .filter(|(name, url)| !name.is_empty() && !url.is_empty())
            .collect();
        Self { entries }
    }

    /// Load a badge table from a JSON object file (`{"Arsenal": "https://…"}`).
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read badge file: {path}"))?;
        let map: HashMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse badge file: {path}"))?;
        let table = Self::new(map);
        info!(path, badges = table.len(), "Badge table loaded");
        Ok(table)
    }

    /// Merge `other` over `self`.
    pub fn merged(mut self, other: TeamBadgeTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn get(&self, canonical_name: &str) -> Option<&str> {
        self.entries
            .get(&canonical_name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Canonicalizes team names for one league and resolves badges.
#[derive(Debug, Clone)]
pub struct TeamIdentityResolver {
    aliases: TeamAliasTable,
    badges: Arc<TeamBadgeTable>,
}

impl TeamIdentityResolver {
    pub fn new(aliases: TeamAliasTable, badges: Arc<TeamBadgeTable>) -> Self {
        Self { aliases, badges }
    }

    /// Canonical form of a free-form team name.
    ///
    /// Returns the alias target when the cleaned, lowercased name is a known
    /// alias; otherwise the cleaned name with its original casing. Runs of
    /// whitespace fold to one space, so "Real  Madrid" matches "Real Madrid".
    /// Empty input yields an empty string. Idempotent.
    pub fn canonicalize(&self, raw: &str) -> String {
        let cleaned = clean_name(raw);
        match self.aliases.get(&cleaned.to_lowercase()) {
            Some(canonical) => {
                if canonical != cleaned {
                    debug!(raw, canonical, "Team alias resolved");
                }
                canonical.to_string()
            }
            None => cleaned,
        }
    }

    /// Badge URL for a canonical name; `None` means "omit the image".
    pub fn logo_for(&self, canonical_name: &str) -> Option<&str> {
        if canonical_name.trim().is_empty() {
            return None;
        }
        self.badges.get(canonical_name)
    }

    /// Canonical name and badge in one step.
    pub fn resolve(&self, raw: &str) -> (String, Option<String>) {
        let name = self.canonicalize(raw);
        let logo = self.logo_for(&name).map(String::from);
        (name, logo)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
