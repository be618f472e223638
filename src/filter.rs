use std::collections::HashMap;

use regex::Regex;

/// Stats we forward from Redis INFO; everything else is dropped.
/// Read-only for the process lifetime.
const STATS_ALLOW_LIST: &[&str] = &[
    "aof_current_rewrite_time_sec",
    "aof_enabled",
    "aof_last_bgrewrite_status",
    "aof_last_rewrite_time_sec",
    "aof_last_write_status",
    "aof_rewrite_in_progress",
    "aof_rewrite_scheduled",
    "blocked_clients",
    "client_biggest_input_buf",
    "client_longest_output_list",
    "connected_clients",
    "connected_slaves",
    "evicted_keys",
    "expired_keys",
    "hz",
    "keyspace_hits",
    "keyspace_misses",
    "latest_fork_usec",
    "loading",
    "lru_clock",
    "master_repl_offset",
    "mem_fragmentation_ratio",
    "pubsub_channels",
    "pubsub_patterns",
    "rdb_bgsave_in_progress",
    "rdb_changes_since_last_save",
    "rdb_current_bgsave_time_sec",
    "rdb_last_bgsave_status",
    "rdb_last_bgsave_time_sec",
    "rdb_last_save_time",
    "rejected_connections",
    "repl_backlog_active",
    "repl_backlog_first_byte_offset",
    "repl_backlog_histlen",
    "repl_backlog_size",
    "sync_full",
    "sync_partial_err",
    "sync_partial_ok",
    "total_commands_processed",
    "total_connections_received",
    "uptime_in_seconds",
    "used_cpu_sys",
    "used_cpu_sys_children",
    "used_cpu_user",
    "used_cpu_user_children",
    "used_memory",
    "used_memory_lua",
    "instantaneous_ops_per_sec",
    "used_memory_peak",
    "used_memory_rss",
];

/// Compiled allow-list. Built once at startup, immutable afterwards.
pub struct StatsFilter {
    pattern: Regex,
}

impl StatsFilter {
    /// Compiles the built-in allow-list.
    pub fn from_allow_list() -> Self {
        Self::new(STATS_ALLOW_LIST)
    }

    /// Joins the names into one alternation, anchored on both ends so a
    /// short name can never claim a key it is merely a prefix or suffix
    /// of (`memory` must not match `used_memory`).
    fn new(names: &[&str]) -> Self {
        let joined = names.join("|");
        let pattern =
            Regex::new(&format!("^(?:{joined})$")).expect("allow-list pattern compiles");
        Self { pattern }
    }

    /// Does `key` fully match one allow-list member?
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    /// Drops every entry whose key is not on the allow-list.
    pub fn apply(&self, stats: &mut HashMap<String, String>) {
        stats.retain(|key, _| self.matches(key));
    }
}

// ─── Tests ───────────────────────────────────────────────────────
