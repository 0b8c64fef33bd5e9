//! Async convenience functions
//!
//! This module provides async entry points for loading talk tables. File
//! contents are read with tokio and decoded on the blocking thread pool.

#[cfg(feature = "async")]
/// Async load and convert functions
pub mod functions {
    use crate::render::{write_table, OutputFormat};
    use crate::{LoadOptions, Result, TalkTableFile, TlkError};
    use std::path::Path;
    use tokio::io::{AsyncRead, AsyncReadExt};

    /// Decode a talk table on the blocking pool
    pub async fn decode_bytes_async(data: Vec<u8>, options: LoadOptions) -> Result<TalkTableFile> {
        tokio::task::spawn_blocking(move || TalkTableFile::from_bytes_with_options(&data, &options))
            .await
            .map_err(|e| TlkError::Io(std::io::Error::other(e)))?
    }

    /// Read a whole talk table from an async reader and decode it
    pub async fn load_async<R: AsyncRead + Unpin>(
        mut reader: R,
        options: LoadOptions,
    ) -> Result<TalkTableFile> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        decode_bytes_async(data, options).await
    }

    /// Load and decode a talk table file
    pub async fn load_file_async<P: AsRef<Path>>(
        path: P,
        options: LoadOptions,
    ) -> Result<TalkTableFile> {
        let data = tokio::fs::read(path.as_ref()).await?;
        log::debug!(
            "Read {} bytes from {}",
            data.len(),
            path.as_ref().display()
        );
        decode_bytes_async(data, options).await
    }

    /// Load a talk table file and write it rendered to `output_path`
    pub async fn convert_file_async<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
        format: OutputFormat,
        options: LoadOptions,
    ) -> Result<TalkTableFile> {
        let table = load_file_async(input_path, options).await?;

        let mut rendered = Vec::new();
        write_table(&table, format, &mut rendered)?;
        tokio::fs::write(output_path, rendered).await?;

        Ok(table)
    }
}

#[cfg(feature = "async")]
pub use functions::*;
