use super::{ProgressCounters, ProgressEvent, ProgressRenderer};
use std::io::Write;

/// Writes one line per event, for logs and non-interactive terminals.
pub struct PlainRenderer<W> {
    out: W,
}

impl PlainRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::debug!("Failed to write progress line: {err}");
        }
    }
}

impl<W: Write + Send> ProgressRenderer for PlainRenderer<W> {
    fn render(&mut self, event: &ProgressEvent, c: &ProgressCounters) {
        match event {
            ProgressEvent::CheckStarted(name) => {
                self.line(format_args!("Checking: {:5} / {:5}  {name}", c.checked, c.total))
            }
            ProgressEvent::DownloadStarted(name) => self.line(format_args!(
                "Download: {:5} / {:5}  {name} started",
                c.downloaded, c.downloading
            )),
            ProgressEvent::DownloadFinished(name) => self.line(format_args!(
                "Download: {:5} / {:5}  {name} finished",
                c.downloaded, c.downloading
            )),
            ProgressEvent::ItemDone(name) => {
                self.line(format_args!("Done:     {:5} / {:5}  {name}", c.done, c.total))
            }
            ProgressEvent::ItemFailed { name, reason } => self.line(format_args!(
                "Failed:   {:5} / {:5}  {name}: {reason}",
                c.failed, c.total
            )),
            ProgressEvent::AllDone => {}
        }
    }

    fn finish(&mut self, c: &ProgressCounters) {
        if c.all_succeeded() {
            self.line(format_args!("Game on!"));
        } else {
            self.line(format_args!("{} of {} items failed", c.failed, c.total));
        }
        if let Err(err) = self.out.flush() {
            tracing::debug!("Failed to flush progress output: {err}");
        }
    }
}

/// Renders nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl ProgressRenderer for NoopRenderer {
    fn render(&mut self, _event: &ProgressEvent, _counters: &ProgressCounters) {}

    fn finish(&mut self, _counters: &ProgressCounters) {}
}
