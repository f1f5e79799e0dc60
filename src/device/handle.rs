use crate::{
    Error, Result,
    journal::{CommandLog, PositionCursor},
};
use std::{io::SeekFrom, sync::Arc};

/// Argument of [`DeviceHandle::seek_to_command`]: a position addressed as
/// (command index within the FIFO, byte offset within that command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekToCommand {
    pub command_index: u32,
    pub command_offset: u32,
}

/// Byte-stream handle over a shared [`CommandLog`] with the character-device
/// read/write/seek contract.
///
/// Opening associates the log with the handle and nothing more; releasing is
/// dropping the handle. Each handle carries its own position; any number of
/// handles may share one log.
#[derive(Debug)]
pub struct DeviceHandle {
    log: Arc<CommandLog>,
    cursor: PositionCursor,
}

impl DeviceHandle {
    pub fn open(log: Arc<CommandLog>) -> Self {
        Self {
            log,
            cursor: PositionCursor::new(),
        }
    }

    /// Command-sliced read into `buf`: at most the remaining tail of one
    /// command per call, capped by the buffer length. Returns the number of
    /// bytes copied and advances the handle position by the same amount;
    /// `0` at EOF.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let bytes = self.log.read_at(&mut self.cursor, buf.len()).await?;
        buf.get_mut(..bytes.len())
            .ok_or(Error::Fault)?
            .copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Appends `buf` to the log. The handle position is not consulted;
    /// appends are logical, not positional.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.log.append_chunk(buf).await
    }

    /// Absolute, relative, or from-end seek across the log's current total.
    pub async fn seek(&mut self, seek_from: SeekFrom) -> Result<u64> {
        self.cursor.seek(&self.log, seek_from).await
    }

    /// Positions the handle at `target.command_offset` within the resident
    /// command at FIFO position `target.command_index`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the index is at or beyond
    /// the buffer capacity, when that slot is unoccupied, or when the offset
    /// is at or beyond that command's size.
    pub async fn seek_to_command(&mut self, target: SeekToCommand) -> Result<u64> {
        self.cursor
            .seek_to_command(
                &self.log,
                target.command_index as usize,
                target.command_offset as usize,
            )
            .await
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}
