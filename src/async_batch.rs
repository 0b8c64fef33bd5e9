//! Async batch processing module
//!
//! This module loads many talk tables concurrently, for example every
//! language variant shipped with a game.

#[cfg(feature = "async")]
/// Concurrent talk table loading with a configurable concurrency limit
pub mod processor {
    use crate::async_convenience::{convert_file_async, load_file_async};
    use crate::render::OutputFormat;
    use crate::{LoadOptions, LoadStats, Result, TalkTableFile, TlkError};
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Concurrent talk table loader
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
        options: LoadOptions,
    }

    impl AsyncBatchProcessor {
        /// Create a new batch processor with default settings
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                options: LoadOptions::default(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Set the load options used for every file
        pub fn with_options(mut self, options: LoadOptions) -> Self {
            self.options = options;
            self
        }

        /// Load multiple files concurrently; the first error aborts the batch
        ///
        /// Results are returned in completion order.
        pub async fn load_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
        ) -> Result<Vec<(PathBuf, TalkTableFile)>> {
            stream::iter(files.into_iter().map(|path| {
                let options = self.options.clone();
                async move {
                    let path = path.as_ref().to_path_buf();
                    let table = load_file_async(&path, options).await?;
                    Ok((path, table))
                }
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Convert files concurrently, writing `<output_dir>/<file stem>.<ext>`
        ///
        /// Every file is attempted; each gets its own result. Inputs whose
        /// output path would collide with another input's fail with
        /// [`TlkError::DuplicateOutput`] and are not converted.
        pub async fn convert_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
            output_dir: &Path,
            format: OutputFormat,
        ) -> Vec<(PathBuf, Result<LoadStats>)> {
            let jobs: Vec<(PathBuf, PathBuf)> = files
                .iter()
                .map(|path| {
                    let input = path.as_ref().to_path_buf();
                    let output = output_path(&input, output_dir, format);
                    (input, output)
                })
                .collect();

            let mut claims: HashMap<&Path, usize> = HashMap::new();
            for (_, output) in &jobs {
                *claims.entry(output.as_path()).or_default() += 1;
            }
            let (unique, clashing): (Vec<_>, Vec<_>) = jobs
                .iter()
                .partition(|(_, output)| claims[output.as_path()] == 1);

            let mut results: Vec<(PathBuf, Result<LoadStats>)> = clashing
                .into_iter()
                .map(|(input, output)| {
                    log::warn!(
                        "Skipping {}: {} is also the output of another input",
                        input.display(),
                        output.display()
                    );
                    (
                        input.clone(),
                        Err(TlkError::DuplicateOutput {
                            path: output.clone(),
                        }),
                    )
                })
                .collect();

            let converted: Vec<(PathBuf, Result<LoadStats>)> =
                stream::iter(unique.into_iter().map(|(input, output)| {
                    let options = self.options.clone();
                    async move {
                        let result = convert_file_async(input, output, format, options)
                            .await
                            .map(|table| table.stats().clone());
                        if let Err(e) = &result {
                            log::warn!("Failed to convert {}: {}", input.display(), e);
                        }
                        (input.clone(), result)
                    }
                }))
                .buffer_unordered(self.concurrency_limit)
                .collect()
                .await;

            results.extend(converted);
            results
        }
    }

    /// Output file for `input`: its file stem plus the format's extension
    pub fn output_path(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "talk_table".to_string());
        output_dir.join(format!("{}.{}", stem, format.extension()))
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::{output_path, AsyncBatchProcessor};
