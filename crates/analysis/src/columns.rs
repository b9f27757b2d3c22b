use crate::config::RegionCodePolicy;
use crate::model::VoteTable;

/// Columns whose name ends with `suffix`, in table order.
pub fn extract_region_columns(table: &VoteTable, suffix: &str) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.ends_with(suffix))
        .cloned()
        .collect()
}

/// Region code of a `<code><suffix>` column.
pub fn region_code(column: &str, suffix: &str, policy: RegionCodePolicy) -> String {
    let stripped = column.strip_suffix(suffix).unwrap_or(column);
    match policy {
        RegionCodePolicy::StripSuffix => stripped.to_string(),
        RegionCodePolicy::FirstSegment => column
            .split('-')
            .next()
            .unwrap_or(stripped)
            .to_string(),
    }
}
