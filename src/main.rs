use clap::Parser;
use tracing_subscriber::EnvFilter;

mod connector;
mod error;
mod filter;
mod format;
mod parser;

/// One-shot Redis stats collector for collectd's exec plugin.
///
/// Queries a single instance, prints PUTVAL lines to stdout, exits.
/// Run it from collectd: `redis-collectd 127.0.0.1 6379`
#[derive(Debug, Parser)]
#[command(name = "redis-collectd")]
struct Cli {
    /// Address of the Redis instance to query
    host: String,

    /// Port of the instance; doubles as the plugin instance label
    /// in the emitted PUTVAL keys
    port: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout belongs to collectd — every diagnostic goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Bad argument count: usage detail on stderr, exit 1.
            // (`--help` still prints to stdout and exits 0.)
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    // ── 1. Compile the allow-list once ───────────────────────────
    let stats_filter = filter::StatsFilter::from_allow_list();

    // ── 2. Query INFO ────────────────────────────────────────────
    let raw = match connector::query_info(&cli.host, &cli.port).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(%err, "collection failed");
            std::process::exit(1);
        }
    };

    // ── 3. Parse → map → filter ──────────────────────────────────
    let lines = parser::extract_stat_lines(&raw);
    let mut stats = parser::map_stats(lines);
    stats_filter.apply(&mut stats);

    // ── 4. Format for collectd ───────────────────────────────────
    let host = format::resolve_hostname();
    let formatted = format::format_to_collectd(&stats, &host, &cli.port);

    // ── 5. Emit ──────────────────────────────────────────────────
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = format::emit(&mut stdout, &formatted) {
        tracing::error!(%err, "writing samples failed");
        std::process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_positional_args() {
        let cli = Cli::try_parse_from(["redis-collectd", "127.0.0.1", "6379"]).unwrap();
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, "6379");
    }

    #[test]
    fn one_arg_is_rejected() {
        assert!(Cli::try_parse_from(["redis-collectd", "127.0.0.1"]).is_err());
    }

    #[test]
    fn three_args_are_rejected() {
        assert!(
            Cli::try_parse_from(["redis-collectd", "127.0.0.1", "6379", "extra"]).is_err()
        );
    }

    /// Full parse → map → filter → format pass over a canned INFO reply.
    #[test]
    fn pipeline_keeps_allowed_stats_and_normalizes() {
        let resp = "$120\r\n\
            # Server\r\n\
            redis_version:7.2.4\r\n\
            some_internal_field:foo\r\n\
            used_memory:1048576\r\n\
            rdb_last_bgsave_status:ok\r\n";

        let mut stats = parser::map_stats(parser::extract_stat_lines(resp));
        filter::StatsFilter::from_allow_list().apply(&mut stats);
        let lines = format::format_to_collectd(&stats, "box1", "6379");

        assert_eq!(lines.len(), 2);
        let mut rendered: Vec<String> = lines
            .iter()
            .map(|l| format!("{} {}", l.key, l.value))
            .collect();
        rendered.sort();
        assert_eq!(
            rendered,
            vec![
                "PUTVAL box1/redis-6379/gauge-rdb_last_bgsave_status N:1",
                "PUTVAL box1/redis-6379/gauge-used_memory N:1048576",
            ]
        );
    }

    /// Empty response: nothing emitted, but not an error either.
    #[test]
    fn pipeline_tolerates_empty_response() {
        let mut stats = parser::map_stats(parser::extract_stat_lines(""));
        filter::StatsFilter::from_allow_list().apply(&mut stats);
        assert!(format::format_to_collectd(&stats, "box1", "6379").is_empty());
    }
}
