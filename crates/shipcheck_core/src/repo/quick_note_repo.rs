//! Built-in quick-note side table.
//!
//! # Responsibility
//! - Store per-item free-text notes for built-in checklists out of line,
//!   keyed by `quickNote_builtin_<title>_s<section>_r<row>`.
//!
//! # Invariants
//! - Keys are positional. Changing the row order of a built-in template
//!   re-attributes existing notes to other rows; the key scheme is kept as
//!   is for compatibility with stored data.
//! - Setting `None` removes the key; "never noted" and "cleared" are not
//!   distinguished.

use crate::model::checklist::ChecklistInfo;
use crate::repo::kv_store::{keys, keys_with_prefix, load_text, remove_key, store_text, KvStore};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static POSITION_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)_r(\d+)$").expect("valid quick-note suffix regex"));

/// One stored note with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedNote {
    pub section_index: usize,
    pub row_index: usize,
    pub text: String,
}

pub struct QuickNoteStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> QuickNoteStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    pub fn get(&self, title: &str, section_index: usize, row_index: usize) -> Option<String> {
        let key = keys::builtin_quick_note(title, section_index, row_index);
        load_text(self.kv, &key)
    }

    pub fn set(&self, title: &str, section_index: usize, row_index: usize, text: Option<&str>) {
        let key = keys::builtin_quick_note(title, section_index, row_index);
        match text {
            Some(text) => {
                if store_text(self.kv, &key, text) {
                    info!("event=quick_note_set module=repo status=ok key={key}");
                }
            }
            None => {
                remove_key(self.kv, &key);
                info!("event=quick_note_remove module=repo status=ok key={key}");
            }
        }
    }

    /// Returns every stored note of one title, ordered by section then row.
    pub fn notes_for_title(&self, title: &str) -> Vec<PositionedNote> {
        let mut notes: Vec<PositionedNote> = self
            .positioned_keys(title)
            .into_iter()
            .filter_map(|(key, section_index, row_index)| {
                load_text(self.kv, &key).map(|text| PositionedNote {
                    section_index,
                    row_index,
                    text,
                })
            })
            .collect();
        notes.sort_by_key(|note| (note.section_index, note.row_index));
        notes
    }

    /// Removes every quick note stored for one title.
    pub fn clear_title(&self, title: &str) -> usize {
        let positioned = self.positioned_keys(title);
        for (key, _, _) in &positioned {
            remove_key(self.kv, key);
        }
        info!(
            "event=quick_note_clear module=repo status=ok removed={}",
            positioned.len()
        );
        positioned.len()
    }

    /// Copies stored notes into the matching items of `checklist`.
    ///
    /// Notes whose position no longer exists in the template are skipped.
    pub fn merge_into(&self, checklist: &mut ChecklistInfo) {
        for note in self.notes_for_title(&checklist.title) {
            match checklist.item_mut(note.section_index, note.row_index) {
                Some(item) => item.quick_note = Some(note.text),
                None => warn!(
                    "event=quick_note_merge module=repo status=skipped section={} row={}",
                    note.section_index, note.row_index
                ),
            }
        }
    }

    fn positioned_keys(&self, title: &str) -> Vec<(String, usize, usize)> {
        let prefix = keys::builtin_quick_note_prefix(title);
        keys_with_prefix(self.kv, &prefix)
            .into_iter()
            .filter_map(|key| {
                let (section_index, row_index) = parse_position(&key[prefix.len()..])?;
                Some((key, section_index, row_index))
            })
            .collect()
    }
}

fn parse_position(suffix: &str) -> Option<(usize, usize)> {
    let caps = POSITION_SUFFIX_RE.captures(suffix)?;
    let section_index = caps.get(1)?.as_str().parse().ok()?;
    let row_index = caps.get(2)?.as_str().parse().ok()?;
    Some((section_index, row_index))
}

#[cfg(test)]
mod tests {
    use super::parse_position;

    #[test]
    fn parse_position_reads_section_and_row() {
        assert_eq!(parse_position("2_r11"), Some((2, 11)));
    }

    #[test]
    fn parse_position_rejects_foreign_suffixes() {
        assert_eq!(parse_position("x_s0_r1"), None);
        assert_eq!(parse_position("1_r"), None);
        assert_eq!(parse_position("1_r2_extra"), None);
    }
}
