use std::collections::HashMap;
use std::io::{self, Write};

use regex::Regex;

/// One emission-ready sample: `PUTVAL <host>/redis-<id>/<type>-<metric>`
/// paired with `N:<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub key: String,
    pub value: String,
}

/// Metric names submitted as `counter-` instead of `gauge-`.
/// Empty today — every INFO stat we forward is a point-in-time reading —
/// but kept as the switch for any future monotonic additions.
const COUNTER_METRICS: &[&str] = &[];

/// Normalizes a raw INFO value into something collectd/Graphite can graph:
/// empty → `0`, status text containing `ok` → `1` (so drawAsInfinite works),
/// any other non-numeric text → `0`, numeric values pass through.
pub fn normalize_value(value: &str) -> String {
    if value.is_empty() {
        "0".to_string()
    } else if value.contains("ok") {
        "1".to_string()
    } else if value.chars().any(|c| c.is_ascii_alphabetic()) {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Hostname for the PUTVAL identifier: `COLLECTD_HOSTNAME` wins when set
/// and non-empty, otherwise the OS-reported hostname.
pub fn resolve_hostname() -> String {
    hostname_or_os(std::env::var("COLLECTD_HOSTNAME").ok())
}

/// The env lookup is injected here so the override/fallback split is
/// testable without touching process environment.
fn hostname_or_os(env_override: Option<String>) -> String {
    match env_override {
        Some(name) if !name.is_empty() => name,
        _ => hostname::get()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Turns the filtered stats map into collectd plugin-exec lines.
/// Total transform: every value comes out as `N:0`, `N:1`, or the original
/// numeric string behind `N:`. `instance_id` is the port the instance was
/// queried on, used as its label.
pub fn format_to_collectd(
    stats: &HashMap<String, String>,
    hostname: &str,
    instance_id: &str,
) -> Vec<FormattedLine> {
    let counter = counter_pattern();

    stats
        .iter()
        .map(|(key, value)| {
            let kind = match &counter {
                Some(re) if re.is_match(key) => "counter",
                _ => "gauge",
            };
            FormattedLine {
                key: format!("PUTVAL {hostname}/redis-{instance_id}/{kind}-{key}"),
                value: format!("N:{}", normalize_value(value)),
            }
        })
        .collect()
}

/// Alternation over `COUNTER_METRICS`, anchored like the allow-list.
/// `None` while the list is empty so nothing accidentally matches.
fn counter_pattern() -> Option<Regex> {
    if COUNTER_METRICS.is_empty() {
        return None;
    }
    let joined = COUNTER_METRICS.join("|");
    Some(Regex::new(&format!("^(?:{joined})$")).expect("counter pattern compiles"))
}

/// Writes one `<key> <value>` line per sample. Emission order follows map
/// iteration order and is deliberately unspecified.
pub fn emit<W: Write>(out: &mut W, lines: &[FormattedLine]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{} {}", line.key, line.value)?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────
