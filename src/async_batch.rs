//! Async batch processing module
//!
//! This module decodes many independent streams concurrently, either from one
//! shared ROM image or from separate files. Each decode runs on the blocking
//! thread pool; no state is shared between decodes.

#[cfg(feature = "async")]
/// Concurrent decoding with a configurable concurrency limit
pub mod processor {
    use crate::{DecodeJob, DecodeOptions, Format, GenesisError, Result};
    use bytes::Bytes;
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::path::{Path, PathBuf};

    /// Concurrent decoder for batches of ROM assets
    #[derive(Debug, Clone)]
    pub struct AsyncBatchDecoder {
        concurrency_limit: usize,
        options: DecodeOptions,
    }

    impl AsyncBatchDecoder {
        /// Create a new batch decoder with default settings
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                options: DecodeOptions::default(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Set the decode options shared by every job
        ///
        /// A job's own `art_tile` overrides the one given here.
        pub fn with_options(mut self, options: DecodeOptions) -> Self {
            self.options = options;
            self
        }

        /// Concurrency limit in effect
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Decode every job against the same ROM image
        ///
        /// Results arrive in completion order; each carries its job and its
        /// own outcome, so one corrupt stream does not fail the batch.
        pub async fn decode_jobs(
            &self,
            rom: Bytes,
            jobs: Vec<DecodeJob>,
        ) -> Vec<(DecodeJob, Result<Vec<u8>>)> {
            log::debug!(
                "batch: {} jobs over {} byte ROM, concurrency {}",
                jobs.len(),
                rom.len(),
                self.concurrency_limit
            );

            stream::iter(jobs.into_iter().map(|job| {
                let rom = rom.clone();
                let options = self.options.with_art_tile(job.art_tile);
                async move {
                    let result = run_blocking(move || {
                        crate::decompress_at(job.format, &rom, job.offset, &options)
                    })
                    .await;

                    if let Err(e) = &result {
                        log::warn!("{} at {:#x}: {}", job.format, job.offset, e);
                    }
                    (job, result)
                }
            }))
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await
        }

        /// Decode multiple files of one format concurrently
        pub async fn decode_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
            format: Format,
        ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
            let results = stream::iter(files.into_iter().map(|path| {
                let decoder = self.clone();
                async move { decoder.decode_single_file(path, format).await }
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await?;

            Ok(results)
        }

        /// Decode a single file
        async fn decode_single_file<P: AsRef<Path>>(
            &self,
            path: P,
            format: Format,
        ) -> Result<(PathBuf, Vec<u8>)> {
            let path = path.as_ref();
            let data = tokio::fs::read(path).await?;
            let options = self.options;

            let decoded = run_blocking(move || crate::decompress(format, &data, &options)).await?;
            Ok((path.to_path_buf(), decoded))
        }
    }

    impl Default for AsyncBatchDecoder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Run a decode on the blocking pool
    pub(crate) async fn run_blocking<F>(decode: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Result<Vec<u8>> + Send + 'static,
    {
        tokio::task::spawn_blocking(decode).await.map_err(|e| {
            GenesisError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchDecoder;
