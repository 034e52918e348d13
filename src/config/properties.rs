use std::collections::BTreeMap;

// ============================================================================
// key=value properties parser
// ============================================================================

/// Parse a properties document into an ordered key/value map.
///
/// Accepts `key=value` and `key: value` lines. Lines starting with `#` or `!`
/// are comments. Keys and values are trimmed; a later duplicate key replaces
/// the earlier one. Lines without a separator become a key with an empty value.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let split_at = line.find(['=', ':']);
        let (key, value) = match split_at {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, ""),
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), value.trim().to_string());
    }

    map
}
