use crate::{Error, Result, journal::CommandLog};
use std::io::SeekFrom;

/// Per-open-handle byte position into the logical concatenation of resident
/// commands.
///
/// A position past the current total is legal and reads as EOF until more
/// is written.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionCursor {
    pos: u64,
}

impl PositionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub(crate) fn advance(&mut self, count: u64) {
        self.pos += count;
    }

    /// Applies an absolute, relative, or from-end seek and returns the new
    /// position.
    ///
    /// From-end seeks read the total and compute the position under a single
    /// log acquisition. Relative and from-end results below zero fail with
    /// [`Error::InvalidArgument`].
    pub async fn seek(&mut self, log: &CommandLog, seek_from: SeekFrom) -> Result<u64> {
        let new_pos = match seek_from {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta).ok_or_else(|| {
                Error::InvalidArgument(format!("seek from {} by {delta} out of range", self.pos))
            })?,
            SeekFrom::End(delta) => log.seek_from_end(delta).await?,
        };
        self.pos = new_pos;
        Ok(new_pos)
    }

    /// Positions the cursor at `intra_offset` within the resident command at
    /// FIFO position `cmd_index`.
    pub async fn seek_to_command(
        &mut self,
        log: &CommandLog,
        cmd_index: usize,
        intra_offset: usize,
    ) -> Result<u64> {
        let new_pos = log.seek_by_command(cmd_index, intra_offset).await?;
        self.pos = new_pos;
        Ok(new_pos)
    }
}
