use log::{debug, warn};

use crate::keywords::KeywordSets;
use crate::model::{VoteRecord, VoteTable, SOCIETY_ORIENTED};

/// Text fields read when no explicit list is given.
pub const DEFAULT_TEXT_FIELDS: [&str; 3] = ["titel_kurz_d", "titel_off_d", "text_d"];

/// Label every record over the default text fields.
pub fn classify(table: &VoteTable, keywords: &KeywordSets) -> VoteTable {
    classify_fields(table, keywords, &DEFAULT_TEXT_FIELDS)
}

/// Label every record over `fields`.
///
/// Fields are taken by column presence; a missing or blank cell in a
/// present column contributes an empty string. A record is society-oriented
/// when its joined lowercase text contains at least one inclusion keyword
/// and no exclusion keyword. Returns a copy with the `society_oriented`
/// column added.
pub fn classify_fields(table: &VoteTable, keywords: &KeywordSets, fields: &[&str]) -> VoteTable {
    let present: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| table.has_column(f))
        .collect();
    if present.is_empty() && !table.is_empty() {
        warn!("no text field among {fields:?} present, every vote is labeled false");
    }

    let records: Vec<VoteRecord> = table
        .records()
        .iter()
        .map(|r| {
            let mut labeled = r.clone();
            labeled.society_oriented = Some(
                !present.is_empty() && keywords.matches(&searchable_text(r, &present)),
            );
            labeled
        })
        .collect();

    let mut out = table.with_records(records);
    out.add_column(SOCIETY_ORIENTED);
    debug!(
        "classified {} votes, {} society-oriented",
        out.len(),
        out.society_votes().count()
    );
    out
}

/// Whether a single piece of text would be labeled society-oriented.
pub fn is_society_oriented(text: &str, keywords: &KeywordSets) -> bool {
    keywords.matches(&text.to_lowercase())
}

fn searchable_text(record: &VoteRecord, fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| record.text(f).unwrap_or("").to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
