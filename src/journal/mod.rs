/*!
The core of the crate: a newline-delimited, append-only log of commands
stored in a fixed-capacity circular buffer.

Bytes enter through [`CommandLog::append_chunk`] and accumulate in a
[`WriteAssembler`] until a terminator arrives, at which point the completed
[`Command`] is admitted into the [`CircularCommandBuffer`], evicting the
oldest resident when the buffer is full. Readback goes through
[`CommandLog::read_at`] with a per-handle [`PositionCursor`]: one command
tail per call, repeated until a zero-length read drains the whole log.
*/

mod assembler;
mod circular_buffer;
mod command_log;
mod cursor;
mod mirror;

pub use assembler::*;
pub use circular_buffer::*;
pub use command_log::*;
pub use cursor::*;
pub use mirror::*;
