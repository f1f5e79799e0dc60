use crate::{
    Error, Result,
    journal::{Command, TERMINATOR},
};
use bytes::Bytes;

/// Accumulates producer chunks into one partial entry and promotes it to a
/// [`Command`] when the terminator arrives.
#[derive(Debug, Default)]
pub struct WriteAssembler {
    partial: Vec<u8>,
}

impl WriteAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` to the partial entry.
    ///
    /// Returns the completed command when the accumulated entry now ends
    /// with the terminator; the partial entry is reset in that case and
    /// retained across calls otherwise. A failed growth fails with
    /// [`Error::OutOfMemory`] and leaves the partial entry unmodified.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<Command>> {
        if chunk.is_empty() {
            return Ok(None);
        }
        self.partial
            .try_reserve(chunk.len())
            .map_err(|_| Error::OutOfMemory)?;
        self.partial.extend_from_slice(chunk);
        if self.partial.last() == Some(&TERMINATOR) {
            let completed = std::mem::take(&mut self.partial);
            Ok(Some(Command::new(Bytes::from(completed))))
        } else {
            Ok(None)
        }
    }

    /// Bytes accumulated since the last terminator.
    pub fn pending_bytes(&self) -> usize {
        self.partial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partial.is_empty()
    }

    /// Discards any in-progress entry and releases its storage.
    pub fn clear(&mut self) {
        self.partial = Vec::new();
    }
}
