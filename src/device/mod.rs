/*!
The character-device-style front-end: a byte-stream handle with
read/write/seek semantics over a shared [`CommandLog`](crate::journal::CommandLog).

Device registration plumbing is a thin adapter outside this crate; this
module defines the interface the core exposes to it.
*/

mod handle;

pub use handle::*;
