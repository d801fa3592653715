use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use kotoba_types::VocabularyEntry;
use unicode_normalization::UnicodeNormalization;

use crate::error::DeckError;

/// Load a vocabulary file (JSON array of entries), normalizing text and
/// dropping entries that cannot be prompted.
pub fn load_entries(path: &Path) -> Result<Vec<VocabularyEntry>, DeckError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: Vec<VocabularyEntry> = serde_json::from_reader(reader)?;

    let mut entries = Vec::with_capacity(raw.len());
    for entry in raw {
        let entry = normalize(entry);
        if entry.source_text.is_empty() || entry.target_text.is_empty() {
            tracing::warn!(?entry, "skipping vocabulary entry with empty text");
            continue;
        }
        entries.push(entry);
    }

    tracing::info!(count = entries.len(), path = %path.display(), "loaded vocabulary");
    Ok(entries)
}

fn normalize(entry: VocabularyEntry) -> VocabularyEntry {
    VocabularyEntry {
        source_text: clean(&entry.source_text),
        target_text: clean(&entry.target_text),
        transliteration: clean(&entry.transliteration),
    }
}

fn clean(text: &str) -> String {
    let text: String = text.trim().nfc().collect();
    text.replace(['\n', '\r'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_normalizes_and_trims() {
        assert_eq!(clean("  hello\nworld "), "hello world");
        // NFC: combining acute on 'e' composes to a single scalar
        assert_eq!(clean("cafe\u{0301}"), "caf\u{e9}");
    }
}
