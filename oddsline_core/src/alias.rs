//! Team name normalization and alias lookup.
//!
//! Sources report teams as free text ("Man Utd", "Wolverhampton Wanderers",
//! "Atlético Madrid"); the catalog knows one canonical team per identity plus
//! a set of alias rows. The index is a pure function of the full alias set
//! and is rebuilt at the start of every sync run.

use crate::types::TeamAlias;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Normalize a team name for comparison: lowercase, fold common Latin
/// diacritics to ASCII, drop punctuation, collapse whitespace.
///
/// Two names normalizing identically are treated as the same candidate.
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .flat_map(fold_diacritic)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold one lowercase character to its ASCII base form(s).
fn fold_diacritic(c: char) -> std::vec::IntoIter<char> {
    let folded: &str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        'ć' | 'č' => "c",
        'š' => "s",
        'ž' => "z",
        _ => return vec![c].into_iter(),
    };
    folded.chars().collect::<Vec<_>>().into_iter()
}

/// Lookup from normalized alias text to canonical team id.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    by_alias: HashMap<String, Uuid>,
}

impl AliasIndex {
    /// Build the index from the catalog's current alias rows.
    ///
    /// A normalized alias claimed by two different teams is ambiguous input:
    /// last write wins and the collision is logged, never fatal.
    pub fn build(rows: &[TeamAlias]) -> Self {
        let mut by_alias: HashMap<String, Uuid> = HashMap::new();

        for row in rows {
            let key = normalize_name(&row.alias);
            if key.is_empty() {
                continue;
            }
            if let Some(prev) = by_alias.insert(key.clone(), row.team_id) {
                if prev != row.team_id {
                    warn!(
                        "alias '{}' maps to multiple teams ({} and {}), keeping the latter",
                        row.alias, prev, row.team_id
                    );
                }
            }
        }

        Self { by_alias }
    }

    /// Resolve a raw team name to a canonical team id via its aliases.
    pub fn resolve(&self, name: &str) -> Option<Uuid> {
        self.by_alias.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
