//! Async convenience functions
//!
//! This module provides easy-to-use async functions for common decoding
//! operations. Decoding itself runs on the blocking thread pool.

#[cfg(feature = "async")]
/// Async decoding helpers
pub mod functions {
    use crate::async_batch::processor::run_blocking;
    use crate::{DecodeJob, DecodeOptions, DecompressionStats, Format, Result};
    use bytes::Bytes;
    use std::path::Path;
    use tokio::io::{AsyncRead, AsyncReadExt};

    /// Decompress everything an async reader yields
    pub async fn decompress_async<R: AsyncRead + Unpin>(
        mut reader: R,
        format: Format,
        options: DecodeOptions,
    ) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        run_blocking(move || crate::decompress(format, &data, &options)).await
    }

    /// Decompress data from bytes
    pub async fn decompress_bytes_async(
        data: Bytes,
        format: Format,
        options: DecodeOptions,
    ) -> Result<Vec<u8>> {
        run_blocking(move || crate::decompress(format, &data, &options)).await
    }

    /// Decompress a file asynchronously
    pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
        format: Format,
        options: DecodeOptions,
    ) -> Result<DecompressionStats> {
        let data = tokio::fs::read(input_path).await?;
        let input_bytes = data.len();

        let decoded = run_blocking(move || crate::decompress(format, &data, &options)).await?;
        tokio::fs::write(output_path, &decoded).await?;

        Ok(DecompressionStats {
            input_bytes,
            output_bytes: decoded.len(),
        })
    }

    /// Decode several streams from one ROM image concurrently
    pub async fn decompress_jobs(
        rom: Bytes,
        jobs: Vec<DecodeJob>,
        concurrency: Option<usize>,
    ) -> Vec<(DecodeJob, Result<Vec<u8>>)> {
        use crate::async_batch::AsyncBatchDecoder;

        let mut decoder = AsyncBatchDecoder::new();
        if let Some(limit) = concurrency {
            decoder = decoder.with_concurrency(limit);
        }

        decoder.decode_jobs(rom, jobs).await
    }
}

#[cfg(feature = "async")]
pub use functions::*;
