//! Player id → display name lookup.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// One entry of the player identity file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName {
    pub id: u32,
    pub name: String,
}

/// Read-only mapping from player id to sanitized display name.
#[derive(Debug, Clone, Default)]
pub struct PlayerIdentity {
    names: HashMap<u32, String>,
}

impl PlayerIdentity {
    pub fn from_entries(entries: impl IntoIterator<Item = PlayerName>) -> Self {
        Self {
            names: entries.into_iter().map(|p| (p.id, p.name)).collect(),
        }
    }

    /// Display name for `id`, or the id itself when the player is unknown.
    pub fn name(&self, id: u32) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Deserialize)]
struct BootstrapStatic {
    elements: Vec<BootstrapElement>,
}

#[derive(Deserialize)]
struct BootstrapElement {
    id: u32,
    web_name: String,
}

/// Builds identity entries from the FPL `bootstrap-static` payload.
pub fn identities_from_bootstrap(bytes: &[u8]) -> Result<Vec<PlayerName>> {
    let data: BootstrapStatic =
        serde_json::from_slice(bytes).context("bootstrap payload has no usable `elements` list")?;
    Ok(data
        .elements
        .into_iter()
        .map(|e| PlayerName {
            id: e.id,
            name: sanitize_web_name(&e.web_name),
        })
        .collect())
}

/// Strips diacritics and drops everything except ASCII letters, digits,
/// periods and spaces.
///
/// Letters with no canonical decomposition (`ø`, `ß`, `ł` and friends) are
/// spelled out first; everything else goes through NFKD so the base letter
/// survives and the combining marks fall away.
pub fn sanitize_web_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if let Some(folded) = fold_char(ch) {
            out.push_str(folded);
            continue;
        }
        out.extend(
            ch.nfkd()
                .filter(|c| !is_combining_mark(*c))
                .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == ' '),
        );
    }
    out
}

fn fold_char(ch: char) -> Option<&'static str> {
    let s = match ch {
        'Æ' => "Ae",
        'æ' => "ae",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ł' => "L",
        'ł' => "l",
        'Ø' => "O",
        'ø' => "o",
        'Œ' => "Oe",
        'œ' => "oe",
        'ß' => "ss",
        'Þ' => "Th",
        'þ' => "th",
        _ => return None,
    };
    Some(s)
}
