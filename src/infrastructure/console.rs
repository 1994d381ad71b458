//! Build console sink
//!
//! Lines meant for the person reading a build's console output. This is
//! separate from `tracing`, which is for operators of the tool itself.

use std::io::Write;

/// Plain-text sink for build console lines
pub trait BuildLog {
    /// Writes one line to the build console
    fn println(&mut self, line: &str);
}

impl<W: Write> BuildLog for W {
    fn println(&mut self, line: &str) {
        // A console that cannot be written to has nowhere to report that.
        let _ = writeln!(self, "{line}");
    }
}

/// Sink that keeps every line in memory
#[derive(Debug, Clone, Default)]
pub struct CapturedLog {
    lines: Vec<String>,
}

impl CapturedLog {
    /// Creates an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns true if any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl BuildLog for CapturedLog {
    fn println(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_appends_newline() {
        let mut buf: Vec<u8> = Vec::new();
        buf.println("Failed to copy the jarfiles");
        assert_eq!(String::from_utf8(buf).unwrap(), "Failed to copy the jarfiles\n");
    }

    #[test]
    fn test_captured_log() {
        let mut log = CapturedLog::new();
        log.println("one");
        log.println("two");
        assert_eq!(log.lines(), ["one", "two"]);
        assert!(log.contains("tw"));
    }
}
