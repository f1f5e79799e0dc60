use crate::Result;
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

/// Append-only mirror of the accepted byte stream at a well-known path.
///
/// The file is opened once and the handle kept for the process lifetime;
/// appends run while the log lock is held so the file order matches the
/// admit order.
#[derive(Debug)]
pub struct FileMirror {
    path: PathBuf,
    file: File,
}

impl FileMirror {
    /// Opens (creating if needed) the backing file in append mode.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    /// Appends one accepted chunk.
    pub async fn append(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Completes any in-flight write.
    pub async fn flush(&mut self) -> Result<()> {
        self.file.flush().await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
