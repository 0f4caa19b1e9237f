//! `tracing` subscriber writing to the devtools console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Console method an event goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sink {
    Log,
    Warn,
    Error,
}

fn sink_for(level: &Level) -> Sink {
    if *level == Level::ERROR {
        Sink::Error
    } else if *level == Level::WARN {
        Sink::Warn
    } else {
        Sink::Log
    }
}

/// Buffers one event and flushes it to the console on drop.
pub struct ConsoleWriter {
    sink: Sink,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let value = js_sys::JsString::from(line);
        match self.sink {
            Sink::Log => web_sys::console::log_1(&value),
            Sink::Warn => web_sys::console::warn_1(&value),
            Sink::Error => web_sys::console::error_1(&value),
        }
    }
}

pub struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            sink: Sink::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            sink: sink_for(meta.level()),
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber. Debug builds log at DEBUG, release at INFO.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(Console)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}
