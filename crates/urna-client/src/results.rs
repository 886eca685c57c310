//! Parsing of the server's results line.

/// Split a `"name: pp.pp%"` results line into `(name, percentage)` pairs.
///
/// Entries are separated by two spaces; name and value by `": "`. Empty
/// fragments (a server that appends a trailing separator) and fragments
/// with no name/value split are skipped rather than failing the whole
/// display.
pub(crate) fn parse_results(line: &str) -> Vec<(String, String)> {
    line.split("  ")
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            entry.split_once(": ").map(|(name, value)| (name.to_string(), value.to_string()))
        })
        .collect()
}
