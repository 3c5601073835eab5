//! Line sinks and the fan-out writer used by the report

use std::io::{self, Write};

use tracing::warn;

/// Destination for report lines
pub trait LineSink {
    /// Human-readable name used in diagnostics
    fn name(&self) -> &str;

    /// Writes one line; the sink adds the line terminator
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Sink over any writer, flushed after every line
pub struct WriterSink<W: Write> {
    name: String,
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(name: &str, writer: W) -> Self {
        Self {
            name: name.to_string(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// Writes every line to all of its sinks, in order.
///
/// A failing sink does not keep the line from the others. The write only
/// fails when no sink accepted the line.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn LineSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Box<dyn LineSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LineSink for MultiSink {
    fn name(&self) -> &str {
        "multi"
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut delivered = 0;

        for sink in &mut self.sinks {
            match sink.write_line(line) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to write to {}: {}", sink.name(), e),
            }
        }

        if delivered == 0 {
            return Err(io::Error::other(format!(
                "none of {} sinks accepted the line",
                self.sinks.len()
            )));
        }

        Ok(())
    }
}
