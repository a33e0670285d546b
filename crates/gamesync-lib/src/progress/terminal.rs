use super::{ProgressCounters, ProgressEvent, ProgressLogRouter, ProgressRenderer};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{prefix:>9} [{bar:40.cyan/blue}] {pos:>5}/{len:5} {wide_msg}";

fn make_bar(prefix: &'static str, len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━━╌"),
    );
    bar.set_prefix(prefix);
    bar
}

/// Scoped ownership of the terminal progress display.
///
/// The bars are shared with the [`TerminalRenderer`] handed to the reporter
/// task. Dropping the display stops every bar that has not been finished, so
/// the terminal is left usable on early returns, errors, interrupts and
/// panics alike. With [`TerminalDisplay::route_logs`], log lines are printed
/// above the bars for as long as the display lives.
pub struct TerminalDisplay {
    multi: MultiProgress,
    checking: ProgressBar,
    download: ProgressBar,
    done: ProgressBar,
    log_router: Option<ProgressLogRouter>,
}

impl TerminalDisplay {
    pub fn new(total: usize) -> Self {
        Self::with_draw_target(total, ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(total: usize, target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let checking = multi.add(make_bar("Checking", total as u64));
        let download = multi.add(make_bar("Download", 0));
        let done = multi.add(make_bar("Done", total as u64));
        Self {
            multi,
            checking,
            download,
            done,
            log_router: None,
        }
    }

    pub fn route_logs(mut self, router: &ProgressLogRouter) -> Self {
        router.attach(self.multi.clone());
        self.log_router = Some(router.clone());
        self
    }

    pub fn renderer(&self) -> TerminalRenderer {
        TerminalRenderer {
            multi: self.multi.clone(),
            checking: self.checking.clone(),
            download: self.download.clone(),
            done: self.done.clone(),
        }
    }

    fn bars(&self) -> [&ProgressBar; 3] {
        [&self.checking, &self.download, &self.done]
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        if let Some(router) = self.log_router.take() {
            router.detach();
        }
        for bar in self.bars() {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}

/// Draws checking, download and overall progress as three bars.
pub struct TerminalRenderer {
    multi: MultiProgress,
    checking: ProgressBar,
    download: ProgressBar,
    done: ProgressBar,
}

impl ProgressRenderer for TerminalRenderer {
    fn render(&mut self, event: &ProgressEvent, c: &ProgressCounters) {
        self.checking.set_position(c.checked as u64);
        self.download.set_length(c.downloading as u64);
        self.download.set_position(c.downloaded as u64);
        self.done.set_position(c.done as u64);

        match event {
            ProgressEvent::DownloadStarted(name) => self.download.set_message(name.to_string()),
            ProgressEvent::ItemFailed { name, reason } => {
                self.done.set_message(format!("{} failed", c.failed));
                if let Err(err) = self.multi.println(format!("Failed: {name}: {reason}")) {
                    tracing::debug!("Failed to print to terminal: {err}");
                }
            }
            _ => {}
        }
    }

    fn finish(&mut self, c: &ProgressCounters) {
        self.checking.finish();
        self.download.finish_with_message("");
        if c.all_succeeded() {
            self.done.finish_with_message("Game on!");
        } else {
            self.done
                .abandon_with_message(format!("{} of {} failed", c.failed, c.total));
        }
    }

    fn abandon(&mut self, _c: &ProgressCounters) {
        for bar in [&self.checking, &self.download, &self.done] {
            bar.abandon_with_message("progress does not add up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn apply(renderer: &mut TerminalRenderer, counters: &mut ProgressCounters, event: ProgressEvent) {
        counters.apply(&event);
        renderer.render(&event, counters);
    }

    #[test]
    fn test_bars_track_counters() {
        let display = TerminalDisplay::with_draw_target(2, ProgressDrawTarget::hidden());
        let mut renderer = display.renderer();
        let mut counters = ProgressCounters::new(2);
        let pong: Arc<str> = Arc::from("pong");
        let doom: Arc<str> = Arc::from("doom");

        apply(&mut renderer, &mut counters, ProgressEvent::CheckStarted(pong.clone()));
        apply(&mut renderer, &mut counters, ProgressEvent::CheckStarted(doom.clone()));
        apply(&mut renderer, &mut counters, ProgressEvent::ItemDone(pong.clone()));
        apply(&mut renderer, &mut counters, ProgressEvent::DownloadStarted(doom.clone()));

        assert_eq!(display.checking.position(), 2);
        assert_eq!(display.download.length(), Some(1));
        assert_eq!(display.download.position(), 0);
        assert_eq!(display.done.position(), 1);

        apply(&mut renderer, &mut counters, ProgressEvent::DownloadFinished(doom.clone()));
        apply(&mut renderer, &mut counters, ProgressEvent::ItemDone(doom.clone()));
        renderer.finish(&counters);

        assert_eq!(display.download.position(), 1);
        assert_eq!(display.done.position(), 2);
        assert!(display.done.is_finished());
        assert_eq!(display.done.message(), "Game on!");
    }

    #[test]
    fn test_dropping_display_stops_unfinished_bars() {
        let display = TerminalDisplay::with_draw_target(3, ProgressDrawTarget::hidden());
        let renderer = display.renderer();
        assert!(!renderer.done.is_finished());

        drop(display);

        assert!(renderer.checking.is_finished());
        assert!(renderer.download.is_finished());
        assert!(renderer.done.is_finished());
    }
}
