//! Output sinks for rendered trace entries

use std::io::Write;

use crate::entry::Printable;
use crate::Result;

/// Receives the entries of flushed records in emission order
///
/// The record hands over every entry in the format's mandated order; the
/// sink owns rendering, batching and the byte-level destination.
pub trait TraceSink {
    /// Accept one entry
    fn emit(&mut self, entry: &dyn Printable) -> Result<()>;

    /// Push any buffered output to the destination
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Line-per-entry sink over any writer
///
/// Renders each entry as one text line with a fixed verbosity and line
/// prefix. The writer can be a file, a socket or a plain byte buffer.
#[derive(Debug)]
pub struct LineSink<W: Write> {
    out: W,
    verbosity: u8,
    prefix: String,
}

impl<W: Write> LineSink<W> {
    /// Create a sink writing canonical lines with no prefix
    pub fn new(out: W) -> Self {
        Self {
            out,
            verbosity: 0,
            prefix: String::new(),
        }
    }

    /// Select the verbosity passed to each entry
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Prepend `prefix` to every line
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Consume the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for LineSink<W> {
    fn emit(&mut self, entry: &dyn Printable) -> Result<()> {
        entry.print(&mut self.out, self.verbosity, &self.prefix)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{RegClass, RegId};
    use crate::entry::{RegValue, RegisterEntry};

    fn resolved_entry() -> RegisterEntry {
        let mut entry = RegisterEntry::new(RegId::new(RegClass::Int, 0), 10);
        entry.name = "r0".to_string();
        entry.value = RegValue::Word(0x42);
        entry.valid = true;
        entry
    }

    #[test]
    fn test_sink_renders_one_line_per_entry() {
        let mut sink = LineSink::new(Vec::new());
        sink.emit(&resolved_entry()).unwrap();
        sink.emit(&resolved_entry()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "10 clk R r0 00000042\n10 clk R r0 00000042\n");
    }

    #[test]
    fn test_sink_applies_prefix_and_verbosity() {
        let mut sink = LineSink::new(Vec::new())
            .with_prefix("cpu0: ")
            .with_verbosity(1);
        sink.emit(&resolved_entry()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "cpu0: 10 clk R r0 00000042 (int)\n");
    }
}
