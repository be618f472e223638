use std::collections::HashMap;

use regex::Regex;

/// Pulls every `key:value` shaped line out of the raw INFO text.
///
/// Section headers (`# Memory`), blank lines and the RESP `$<len>` header
/// all fail the shape and are dropped silently. Zero matches is fine —
/// the caller gets an empty sequence, not an error.
pub fn extract_stat_lines(resp: &str) -> Vec<&str> {
    // `?` covers oddball INFO fields on some server versions
    let line = Regex::new(r"[a-z0-9_?]*:[^\r\n]*").expect("line pattern compiles");
    line.find_iter(resp).map(|m| m.as_str()).collect()
}

/// Folds the extracted lines into a key → value map, splitting each line
/// on its first colon. Later occurrences of a key win.
pub fn map_stats<'a, I>(lines: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stats = HashMap::new();
    for line in lines {
        // A line with no separator would have been an index panic in a
        // naive split; skip it instead of aborting the run.
        let Some((key, value)) = line.split_once(':') else {
            tracing::debug!(line, "skipping line without separator");
            continue;
        };
        stats.insert(key.to_string(), value.to_string());
    }
    stats
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "$178\r\n\
        # Server\r\n\
        redis_version:7.2.4\r\n\
        uptime_in_seconds:86400\r\n\
        \r\n\
        # Memory\r\n\
        used_memory:1048576\r\n\
        rdb_last_bgsave_status:ok\r\n";

    #[test]
    fn extracts_only_stat_shaped_lines() {
        let lines = extract_stat_lines(SAMPLE);
        assert_eq!(
            lines,
            vec![
                "redis_version:7.2.4",
                "uptime_in_seconds:86400",
                "used_memory:1048576",
                "rdb_last_bgsave_status:ok",
            ]
        );
    }

    #[test]
    fn empty_response_yields_empty_sequence() {
        assert!(extract_stat_lines("").is_empty());
        assert!(extract_stat_lines("# Server\r\n\r\n").is_empty());
    }

    #[test]
    fn maps_on_first_colon() {
        let stats = map_stats(vec!["master_host:10.0.0.1:6379"]);
        assert_eq!(stats["master_host"], "10.0.0.1:6379");
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let stats = map_stats(vec!["loading:1", "loading:0"]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["loading"], "0");
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let stats = map_stats(vec!["no separator here", "hz:10"]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["hz"], "10");
    }

    #[test]
    fn end_to_end_extract_then_map() {
        let stats = map_stats(extract_stat_lines(SAMPLE));
        assert_eq!(stats["used_memory"], "1048576");
        assert_eq!(stats["rdb_last_bgsave_status"], "ok");
        assert!(!stats.contains_key("$178"));
    }
}
