pub mod config;
pub mod order;
pub mod questions;
pub mod report;
pub mod score;
pub mod take;

/// Split a comma-separated list, dropping empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `1,2,3,...` into answers. Values are kept as given; scoring skips
/// anything off the scale.
pub fn parse_answers(raw: &str) -> Result<Vec<i64>, String> {
    split_list(raw)
        .iter()
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| format!("invalid answer '{s}': expected an integer"))
        })
        .collect()
}
