use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

/// Converts raw keystrokes into a stable, delayed query value.
///
/// `raw` updates synchronously on every keystroke; the committed value is
/// delivered on the paired receiver only after a full quiet period with no
/// further input. Each keystroke supersedes any pending commit, so a rapid
/// burst commits exactly once, with the final value. Dropping the debouncer
/// cancels whatever is pending.
pub struct SearchDebouncer {
    quiet: Duration,
    raw: String,
    seq: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                quiet,
                raw: String::new(),
                seq: Arc::new(AtomicU64::new(0)),
                tx,
            },
            rx,
        )
    }

    /// Record a keystroke and (re)start the quiet-period timer.
    pub fn input(&mut self, text: &str) {
        self.raw = text.to_string();
        let generation = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let seq = Arc::clone(&self.seq);
        let tx = self.tx.clone();
        let quiet = self.quiet;
        let value = self.raw.trim().to_string();

        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            // A newer keystroke (or teardown) moved the sequence on.
            if seq.load(Ordering::SeqCst) == generation {
                let _ = tx.send(value);
            }
        });
    }

    /// The uncommitted input as typed so far.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_commits_once_with_final_value() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(350));

        for text in ["a", "ab", "abc"] {
            debouncer.input(text);
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert_eq!(debouncer.raw(), "abc");
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("abc"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_commit_separately() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(350));

        debouncer.input("first");
        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("first"));

        debouncer.input("second");
        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_commit() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(350));

        debouncer.input("doomed");
        drop(debouncer);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_committed_value_is_trimmed() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(350));

        debouncer.input("  padded  ");
        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("padded"));
    }
}
