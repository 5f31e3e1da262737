// src/sink/mod.rs

//! Output sinks for the console channels.
//!
//! Stream runners never touch `std::io::stdout()` directly; they write to a
//! [`Sink`]. Production uses [`ConsoleSink`], tests use [`MemorySink`].

use std::fmt::Debug;
use std::io;
use std::sync::Arc;

pub mod console;
pub mod memory;

pub use console::{ConsoleSink, ConsoleStream, render_line};
pub use memory::MemorySink;

/// Something that accepts one piece of channel output at a time.
pub trait Sink: Send + Sync + Debug {
    fn write(&self, text: &str) -> io::Result<()>;
}

/// The pair of console sinks handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct ConsoleSinks {
    pub stdout: Arc<dyn Sink>,
    pub stderr: Arc<dyn Sink>,
}

impl ConsoleSinks {
    pub fn new(stdout: Arc<dyn Sink>, stderr: Arc<dyn Sink>) -> Self {
        Self { stdout, stderr }
    }

    /// Real process stdout / stderr in the given format.
    pub fn console(format: crate::types::OutputFormat) -> Self {
        Self {
            stdout: Arc::new(ConsoleSink::new(ConsoleStream::Stdout, format)),
            stderr: Arc::new(ConsoleSink::new(ConsoleStream::Stderr, format)),
        }
    }
}
