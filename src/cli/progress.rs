// src/cli/progress.rs — Terminal progress for running generations
//
// The agent callback only pushes lines into a channel. A separate task owns
// stderr. If the renderer is gone, sends fail and are ignored.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::core::AgentEvent;

/// Callback half: turns agent events into progress lines.
pub fn event_forwarder(tx: UnboundedSender<String>) -> impl Fn(AgentEvent) + Send + Sync + 'static {
    move |event| {
        if let Some(line) = event.message() {
            let _ = tx.send(line);
        }
    }
}

/// Drain lines until every sender is dropped, skipping exact repeats.
pub async fn drain_lines(mut rx: UnboundedReceiver<String>, mut sink: impl FnMut(&str)) {
    let mut last: Option<String> = None;
    while let Some(line) = rx.recv().await {
        if last.as_deref() == Some(line.as_str()) {
            continue;
        }
        sink(&line);
        last = Some(line);
    }
}

/// Progress pipeline writing `[agent] ...` lines to stderr.
pub struct TerminalProgress {
    tx: UnboundedSender<String>,
    renderer: JoinHandle<()>,
}

impl TerminalProgress {
    pub fn start(quiet: bool) -> Self {
        let (tx, rx) = unbounded_channel();
        let renderer = tokio::spawn(drain_lines(rx, move |line| {
            if !quiet {
                eprintln!("[agent] {}", line);
            }
        }));
        Self { tx, renderer }
    }

    pub fn callback(&self) -> impl Fn(AgentEvent) + Send + Sync + 'static {
        event_forwarder(self.tx.clone())
    }

    /// Close the channel and wait for the remaining lines to print.
    pub async fn finish(self) {
        drop(self.tx);
        let _ = self.renderer.await;
    }
}
