//! Terminal notification surface for `watch`.

use std::io::Write;

use owo_colors::OwoColorize;
use tracing::debug;

use laptoppos_core::{Notifier, Toast};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::output::should_color;

/// Prints one line per toast to stdout.
///
/// Structured output formats emit the toast as a JSON line so `watch` can
/// be piped into other tools.
pub struct ConsoleNotifier {
    color: bool,
    json: bool,
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            color: should_color(&global.color),
            json: matches!(
                global.output,
                OutputFormat::Json | OutputFormat::JsonCompact
            ),
            quiet: global.quiet,
        }
    }

    fn line(&self, toast: &Toast) -> String {
        if self.json {
            return serde_json::json!({
                "message": toast.message,
                "duration_ms": u64::try_from(toast.duration.as_millis()).unwrap_or(u64::MAX),
            })
            .to_string();
        }
        if self.color {
            format!("{} {}", "●".green(), toast.message.bold())
        } else {
            format!("* {}", toast.message)
        }
    }

    fn lost_line(&self, attempts: u32) -> Option<String> {
        self.json.then(|| {
            serde_json::json!({ "event": "connection_lost", "attempts": attempts }).to_string()
        })
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&self, toast: &Toast) {
        if self.quiet {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", self.line(toast));
    }

    // Plain output is reported once, by the `ConnectionLost` exit error.
    fn connection_lost(&self, attempts: u32) {
        debug!(attempts, "live updates stopped");
        if self.quiet {
            return;
        }
        if let Some(line) = self.lost_line(attempts) {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn toast() -> Toast {
        Toast {
            message: "Produk telah dibuat".into(),
            duration: Duration::from_millis(3000),
        }
    }

    #[test]
    fn plain_line() {
        let notifier = ConsoleNotifier {
            color: false,
            json: false,
            quiet: false,
        };
        assert_eq!(notifier.line(&toast()), "* Produk telah dibuat");
    }

    #[test]
    fn json_line() {
        let notifier = ConsoleNotifier {
            color: false,
            json: true,
            quiet: false,
        };
        let value: serde_json::Value = serde_json::from_str(&notifier.line(&toast())).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "message": "Produk telah dibuat", "duration_ms": 3000 })
        );
    }

    #[test]
    fn lost_connection_has_no_plain_line() {
        let notifier = ConsoleNotifier {
            color: true,
            json: false,
            quiet: false,
        };
        assert_eq!(notifier.lost_line(5), None);
    }

    #[test]
    fn lost_connection_json_event() {
        let notifier = ConsoleNotifier {
            color: false,
            json: true,
            quiet: false,
        };
        let value: serde_json::Value =
            serde_json::from_str(&notifier.lost_line(5).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "event": "connection_lost", "attempts": 5 })
        );
    }
}
