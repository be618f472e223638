use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};

use crate::error::{Error, Result};

/// Dial timeout for the TCP connect.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Overall deadline for draining the INFO reply. A peer that stays open
/// without sending end-of-data cannot hang the run past this.
pub const READ_DEADLINE: Duration = Duration::from_secs(3);

/// Per-read chunk size.
const READ_CHUNK: usize = 2048;

/// Hard cap on accumulated response bytes.
const MAX_RESPONSE: usize = 64 * 1024;

/// Connects to the Redis instance at `host:port`, sends `INFO`, and
/// returns the raw reply text.
///
/// The connection is closed on every exit path (the stream drops with the
/// function). A reply cut short by the read deadline is returned as-is —
/// truncation is tolerated, indefinite blocking is not.
pub async fn query_info(host: &str, port: &str) -> Result<String> {
    let addr = format!("{host}:{port}");

    let mut conn = timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr))
        .await
        .map_err(|_| Error::ConnectTimeout { addr: addr.clone() })?
        .map_err(|source| Error::Connect { addr, source })?;

    // Inline-protocol INFO request
    conn.write_all(b"INFO\n").await?;

    let raw = read_response(&mut conn).await?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Accumulates reply bytes until EOF, the advertised bulk length is
/// reached, the size cap hits, or the deadline expires.
async fn read_response(conn: &mut TcpStream) -> Result<Vec<u8>> {
    let deadline = Instant::now() + READ_DEADLINE;
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    let mut expected: Option<usize> = None;

    loop {
        let n = match timeout_at(deadline, conn.read(&mut chunk)).await {
            Ok(read) => read?,
            // Deadline hit with the peer still open — keep what arrived.
            Err(_) => break,
        };
        if n == 0 {
            break; // EOF
        }
        buf.extend_from_slice(&chunk[..n]);

        if expected.is_none() {
            expected = bulk_total_len(&buf);
        }
        if let Some(total) = expected {
            if buf.len() >= total {
                break;
            }
        }
        if buf.len() >= MAX_RESPONSE {
            break;
        }
    }

    tracing::debug!(bytes = buf.len(), "read INFO response");
    Ok(buf)
}

/// RESP bulk replies open with `$<len>\r\n`. Knowing the advertised length
/// lets the read loop stop without waiting for the peer to close.
/// Returns the total reply size including header and trailing `\r\n`.
///
/// An absurd advertised length (hostile or corrupted peer) yields `None`;
/// the read loop then falls back to EOF, the size cap, or the deadline.
fn bulk_total_len(buf: &[u8]) -> Option<usize> {
    if buf.first() != Some(&b'$') {
        return None;
    }
    let nl = buf.iter().position(|&b| b == b'\n')?;
    let digits = std::str::from_utf8(&buf[1..nl]).ok()?.trim_end_matches('\r');
    let len: usize = digits.parse().ok()?;
    (nl + 1).checked_add(len)?.checked_add(2)
}

// ─── Tests ───────────────────────────────────────────────────────
