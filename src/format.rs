//! Rendering of log lines.
//!
//! Rendering happens on the caller's thread, before a line enters a queue.
//! It cannot fail: format strings are checked at compile time and every
//! argument is already `Display`.
use chrono::Local;
use std::fmt::{self, Display};
use std::panic::Location;

use crate::types::Severity;

/// Joins a list of values with no separator, `fmt::Sprint`-style.
pub(crate) struct Concat<'a>(pub &'a [&'a dyn Display]);
impl<'a> Display for Concat<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for value in self.0 {
            value.fmt(f)?;
        }
        Ok(())
    }
}

/// Renders `header ++ body`, the plain form used outside of debug mode.
pub(crate) fn line(severity: Severity, body: fmt::Arguments) -> String {
    format!("{}{}", severity.header(), body)
}

/// Renders a line with the debug-mode prefix: local date, microsecond
/// time, and the short file name and line of the call site.
pub(crate) fn verbose_line(
    severity: Severity,
    body: fmt::Arguments,
    caller: &'static Location<'static>,
) -> String {
    format!(
        "{} {}:{}: {}{}",
        Local::now().format("%Y/%m/%d %H:%M:%S%.6f"),
        short_file(caller.file()),
        caller.line(),
        severity.header(),
        body
    )
}

fn short_file(file: &str) -> &str {
    file.rsplit('/').next().unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_concatenates_without_separators() {
        let rendered = line(
            Severity::Info,
            format_args!("{}", Concat(&[&"hello", &42])),
        );
        assert_eq!(rendered, "[INFO]hello42");
    }

    #[test]
    fn plain_line_supports_templates() {
        let rendered = line(Severity::Warning, format_args!("x={}", 1));
        assert_eq!(rendered, "[WARNING]x=1");
    }

    #[test]
    fn verbose_line_carries_prefix_and_call_site() {
        let rendered = verbose_line(
            Severity::Error,
            format_args!("boom"),
            Location::caller(),
        );
        assert!(rendered.ends_with("[ERROR]boom"), "{}", rendered);
        assert!(rendered.contains("format.rs:"), "{}", rendered);
        // Date part looks like `2009/01/23`.
        assert_eq!(rendered.as_bytes()[4], b'/');
    }

    #[test]
    fn short_file_strips_directories() {
        assert_eq!(short_file("src/lib.rs"), "lib.rs");
        assert_eq!(short_file("lib.rs"), "lib.rs");
    }
}
