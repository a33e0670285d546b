use indicatif::MultiProgress;
use std::io::Write;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

static GLOBAL: LazyLock<ProgressLogRouter> =
    LazyLock::new(|| ProgressLogRouter::new(std::io::stderr()));

/// Log writer that keeps log lines from tearing through live progress bars.
///
/// While a [`MultiProgress`] is attached, each line is written with the bars
/// suspended, then the bars are redrawn below it. Otherwise lines go straight
/// to the sink.
#[derive(Clone)]
pub struct ProgressLogRouter {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    display: Mutex<Option<MultiProgress>>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ProgressLogRouter {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                display: Mutex::new(None),
                sink: Mutex::new(Box::new(sink)),
            }),
        }
    }

    /// The stderr router the CLI installs into its tracing subscriber.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    pub fn attach(&self, multi: MultiProgress) {
        *self.display() = Some(multi);
    }

    pub fn detach(&self) {
        self.display().take();
    }

    pub fn is_attached(&self) -> bool {
        self.display().is_some()
    }

    fn display(&self) -> std::sync::MutexGuard<'_, Option<MultiProgress>> {
        self.inner
            .display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, line: &[u8]) {
        if line.is_empty() {
            return;
        }
        let write = || {
            let mut sink = self
                .inner
                .sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            // Nowhere left to report a failing log sink.
            let _ = sink.write_all(line).and_then(|()| sink.flush());
        };

        let display = self.display().clone();
        match display {
            Some(multi) => multi.suspend(write),
            None => write(),
        }
    }
}

impl<'a> MakeWriter<'a> for ProgressLogRouter {
    type Writer = LogLine;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine {
            router: self.clone(),
            buf: Vec::with_capacity(256),
        }
    }
}

/// One formatted event, emitted as a whole when dropped.
pub struct LogLine {
    router: ProgressLogRouter,
    buf: Vec<u8>,
}

impl Write for LogLine {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for LogLine {
    fn drop(&mut self) {
        self.router.emit(&self.buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::TerminalDisplay;
    use indicatif::{ProgressDrawTarget, TermLike};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Clone, Default)]
    struct RecordingTerm {
        ops: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingTerm {
        fn record(&self, op: String) -> std::io::Result<()> {
            self.ops.lock().unwrap().push(op);
            Ok(())
        }

        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }
    }

    impl TermLike for RecordingTerm {
        fn width(&self) -> u16 {
            80
        }

        fn move_cursor_up(&self, n: usize) -> std::io::Result<()> {
            self.record(format!("up {n}"))
        }

        fn move_cursor_down(&self, n: usize) -> std::io::Result<()> {
            self.record(format!("down {n}"))
        }

        fn move_cursor_right(&self, n: usize) -> std::io::Result<()> {
            self.record(format!("right {n}"))
        }

        fn move_cursor_left(&self, n: usize) -> std::io::Result<()> {
            self.record(format!("left {n}"))
        }

        fn write_line(&self, s: &str) -> std::io::Result<()> {
            self.record(format!("line {s}"))
        }

        fn write_str(&self, s: &str) -> std::io::Result<()> {
            self.record(format!("str {s}"))
        }

        fn clear_line(&self) -> std::io::Result<()> {
            self.record("clear".to_string())
        }

        fn flush(&self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn log_through(router: &ProgressLogRouter, message: &str) {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(router.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || tracing::info!("{message}"));
    }

    #[test]
    fn test_detached_router_writes_to_sink() {
        let sink = SharedBuf::default();
        let router = ProgressLogRouter::new(sink.clone());

        log_through(&router, "Downloading pong");

        assert!(!router.is_attached());
        assert!(sink.contents().contains("Downloading pong"));
    }

    #[test]
    fn test_logs_bypass_the_bars_while_a_display_is_live() {
        let sink = SharedBuf::default();
        let router = ProgressLogRouter::new(sink.clone());
        let term = RecordingTerm::default();
        let display = TerminalDisplay::with_draw_target(
            2,
            ProgressDrawTarget::term_like(Box::new(term.clone())),
        )
        .route_logs(&router);

        assert!(router.is_attached());
        log_through(&router, "Downloading pong");

        assert_eq!(sink.contents().matches("Downloading pong").count(), 1);
        assert!(
            term.ops().iter().all(|op| !op.contains("Downloading pong")),
            "log line was drawn into the bars: {:?}",
            term.ops()
        );

        drop(display);
        assert!(!router.is_attached());
    }

    #[test]
    fn test_hidden_display_still_lets_logs_through() {
        let sink = SharedBuf::default();
        let router = ProgressLogRouter::new(sink.clone());
        let _display = TerminalDisplay::with_draw_target(1, ProgressDrawTarget::hidden())
            .route_logs(&router);

        log_through(&router, "File exists with incorrect digest");

        assert!(sink.contents().contains("File exists with incorrect digest"));
    }
}
