use std::io::Write;

use intake_core::{Notice, NoticeKind};

/// Notification sink injected into the effect runner. Implementations render
/// one transient message per significant event; a notice replaces the
/// previous one for the same topic.
pub(crate) trait Notifier: Send {
    fn notify(&mut self, notice: &Notice);
}

/// Renders notices on stderr. Loading notices share a single status line
/// that is rewritten in place, which approximates per-topic replacement on a
/// terminal; success and error notices are printed permanently.
pub(crate) struct ConsoleNotifier {
    status_line_open: bool,
}

impl ConsoleNotifier {
    pub(crate) fn new() -> Self {
        Self {
            status_line_open: false,
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: &Notice) {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        match notice.kind {
            NoticeKind::Loading => {
                let _ = write!(out, "\r\x1b[2K.. {}", notice.text);
                let _ = out.flush();
                self.status_line_open = true;
            }
            NoticeKind::Success | NoticeKind::Error => {
                if self.status_line_open {
                    let _ = writeln!(out);
                    self.status_line_open = false;
                }
                let marker = if notice.kind == NoticeKind::Success {
                    "ok"
                } else {
                    "error"
                };
                let _ = writeln!(out, "{marker}: {}", notice.text);
            }
        }
    }
}
