// src/sink/memory.rs

use std::io;
use std::sync::{Arc, Mutex};

use super::Sink;

/// In-memory sink that records every write. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn write(&self, text: &str) -> io::Result<()> {
        let mut guard = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?;
        guard.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_buffer() {
        let sink = MemorySink::new();
        let other = sink.clone();
        other.write("a").unwrap();
        sink.write("b").unwrap();
        assert_eq!(sink.lines(), vec!["a", "b"]);
        assert_eq!(other.len(), 2);
    }
}
