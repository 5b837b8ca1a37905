//! Per-scan query context and the row sink used to stream results.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::operation::{Qualifier, Quals, Row};

/// Everything the host tells a table about one scan.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub quals: Quals,
    /// Maximum number of rows the host will consume.
    pub limit: Option<u64>,
    /// Columns the host asked for. Empty means all columns.
    pub columns: Vec<String>,
    pub cancellation: CancellationToken,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_qual(mut self, qual: Qualifier) -> Self {
        self.quals.push(qual);
        self
    }

    #[must_use]
    pub fn with_quals(mut self, quals: Quals) -> Self {
        self.quals = quals;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Whether the host requested a column.
    pub fn wants_column(&self, column: &str) -> bool {
        self.columns.is_empty() || self.columns.iter().any(|c| c == column)
    }

    /// Upstream page size: the limit capped at the resource maximum.
    pub fn page_size(&self, resource_max: u32) -> u32 {
        match self.limit {
            Some(limit) if limit < u64::from(resource_max) => limit.max(1) as u32,
            _ => resource_max,
        }
    }
}

/// Receiving half handed to the host.
pub type RowReceiver = mpsc::Receiver<Row>;

/// Sending half a table streams rows into.
///
/// Tracks the host's row limit and cancellation so that dispatchers only
/// need to check the return value of [`RowSink::send`].
#[derive(Debug)]
pub struct RowSink {
    tx: mpsc::Sender<Row>,
    limit: Option<u64>,
    sent: u64,
    cancellation: CancellationToken,
}

impl RowSink {
    /// Create a sink and its receiver for a scan.
    pub fn channel(ctx: &QueryContext, capacity: usize) -> (Self, RowReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            tx,
            limit: ctx.limit,
            sent: 0,
            cancellation: ctx.cancellation.clone(),
        };
        (sink, rx)
    }

    /// Stream one row.
    ///
    /// Returns `false` once the scan should stop: the limit is reached, the
    /// host cancelled, or the receiver is gone.
    pub async fn send(&mut self, row: Row) -> bool {
        if self.is_done() {
            return false;
        }

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                debug!("scan cancelled while sending row");
                return false;
            }
            res = self.tx.send(row) => {
                if res.is_err() {
                    debug!("row receiver dropped");
                    return false;
                }
            }
        }

        self.sent += 1;
        !self.is_done()
    }

    /// Stream every row in order, stopping early when the scan is done.
    ///
    /// Returns `false` once the sink accepts no more rows.
    pub async fn send_all(&mut self, rows: impl IntoIterator<Item = Row>) -> bool {
        for row in rows {
            if !self.send(row).await {
                return false;
            }
        }
        true
    }

    /// Whether no further rows will be accepted.
    pub fn is_done(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.tx.is_closed()
            || self.limit.is_some_and(|limit| self.sent >= limit)
    }

    /// Rows left before the limit is hit, if there is one.
    pub fn rows_remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.sent))
    }

    /// Number of rows streamed so far.
    pub fn rows_sent(&self) -> u64 {
        self.sent
    }
}
