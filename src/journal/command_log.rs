use crate::{
    Error, Result,
    journal::{CircularCommandBuffer, FileMirror, PositionCursor, WriteAssembler},
};
use bytes::Bytes;
use log::warn;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Concurrency-safe facade over the circular command buffer, the write
/// assembler, and the optional backing-file mirror.
///
/// Every operation serializes on one internal mutex held for the full call,
/// so each call observes a single residency state. Acquisition is
/// interruptible: once the shutdown token is cancelled it fails with
/// [`Error::Interrupted`] and no state is mutated.
#[derive(Debug)]
pub struct CommandLog {
    inner: Mutex<LogInner>,
    shutdown: CancellationToken,
}

#[derive(Debug)]
struct LogInner {
    buffer: CircularCommandBuffer,
    assembler: WriteAssembler,
    mirror: Option<FileMirror>,
}

impl CommandLog {
    /// An in-memory log with `capacity` command slots and its own shutdown
    /// token.
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, None, CancellationToken::new())
    }

    /// A log wired to an externally owned shutdown token.
    pub fn with_shutdown(capacity: usize, shutdown: CancellationToken) -> Self {
        Self::build(capacity, None, shutdown)
    }

    /// A log that mirrors every accepted chunk to a backing file.
    pub fn with_mirror(capacity: usize, mirror: FileMirror, shutdown: CancellationToken) -> Self {
        Self::build(capacity, Some(mirror), shutdown)
    }

    fn build(capacity: usize, mirror: Option<FileMirror>, shutdown: CancellationToken) -> Self {
        Self {
            inner: Mutex::new(LogInner {
                buffer: CircularCommandBuffer::new(capacity),
                assembler: WriteAssembler::new(),
                mirror,
            }),
            shutdown,
        }
    }

    /// Cancels every pending and future lock acquisition.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    async fn lock(&self) -> Result<MutexGuard<'_, LogInner>> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Error::Interrupted),
            guard = self.inner.lock() => Ok(guard),
        }
    }

    /// Feeds `chunk` into the write assembler, admitting a command when the
    /// terminator arrives. Returns the number of bytes accepted, which is
    /// always the full chunk length.
    pub async fn append_chunk(&self, chunk: &[u8]) -> Result<usize> {
        let mut guard = self.lock().await?;
        let inner = &mut *guard;
        if let Some(completed) = inner.assembler.feed(chunk)? {
            // ownership of the displaced command ends here
            let _evicted = inner.buffer.add(completed);
        }
        if let Some(mirror) = &mut inner.mirror {
            mirror.append(chunk).await?;
        }
        Ok(chunk.len())
    }

    /// Command-sliced read: at most the remaining tail of the single command
    /// containing the cursor, capped by `max`. Advances the cursor by the
    /// returned length. Returns an empty buffer at EOF.
    pub async fn read_at(&self, cursor: &mut PositionCursor, max: usize) -> Result<Bytes> {
        let guard = self.lock().await?;
        let Some((cmd, intra_offset)) = guard.buffer.find(cursor.position()) else {
            return Ok(Bytes::new());
        };
        let count = (cmd.len() - intra_offset).min(max);
        let bytes = cmd.bytes().slice(intra_offset..intra_offset + count);
        cursor.advance(count as u64);
        Ok(bytes)
    }

    /// Sum of resident command sizes.
    pub async fn total_bytes(&self) -> Result<u64> {
        Ok(self.lock().await?.buffer.total_bytes())
    }

    /// The byte cursor addressing `intra_offset` within the resident command
    /// at FIFO position `cmd_index`.
    pub async fn seek_by_command(&self, cmd_index: usize, intra_offset: usize) -> Result<u64> {
        let guard = self.lock().await?;
        if cmd_index >= guard.buffer.capacity() {
            return Err(Error::InvalidArgument(format!(
                "command index {cmd_index} exceeds capacity {}",
                guard.buffer.capacity()
            )));
        }
        guard
            .buffer
            .offset_of(cmd_index, intra_offset)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "no resident command {cmd_index} with offset {intra_offset}"
                ))
            })
    }

    /// The cursor `total_bytes() + delta`, with the total read and the
    /// cursor computed under one acquisition.
    pub async fn seek_from_end(&self, delta: i64) -> Result<u64> {
        let guard = self.lock().await?;
        guard
            .buffer
            .total_bytes()
            .checked_add_signed(delta)
            .ok_or_else(|| Error::InvalidArgument(format!("seek to end {delta:+} out of range")))
    }

    /// Releases every resident command, any partial entry, and the mirror
    /// handle.
    ///
    /// Close runs after cancellation has fired, so it acquires the lock
    /// without the interruptible path and never fails; mirror flush problems
    /// are logged.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        guard.buffer.clear();
        guard.assembler.clear();
        if let Some(mut mirror) = guard.mirror.take() {
            if let Err(e) = mirror.flush().await {
                warn!("flush of backing file failed on close: {e}");
            }
        }
    }
}
