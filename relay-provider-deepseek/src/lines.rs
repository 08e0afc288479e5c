//! Byte-stream to line-stream adapter for SSE response bodies.
//!
//! The response body arrives as arbitrary byte chunks; SSE is line-oriented.
//! This adapter buffers partial lines across chunk boundaries and yields one
//! complete line at a time, lazily, as network data arrives. Nothing is
//! buffered beyond the current incomplete line.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use relay_types::RelayError;
use tokio_util::sync::CancellationToken;

/// A lazy stream of raw text lines from an upstream response body.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// Split a byte stream into text lines.
///
/// The cancellation token is checked between reads: once cancelled, the
/// stream ends without consuming further upstream data. Chunk boundaries
/// carry no meaning: a multibyte UTF-8 character split across two chunks is
/// held as pending bytes until its remainder arrives. A transport error or
/// a genuinely invalid UTF-8 sequence yields one final `Err` item and ends
/// the stream; a clean end of body ends the stream after flushing any
/// unterminated trailing line.
pub(crate) fn split_lines<S, E>(byte_stream: S, cancellation: CancellationToken) -> LineStream
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut pending = bytes::BytesMut::new();
        let mut line_buf = String::new();

        loop {
            let next = tokio::select! {
                biased;
                () = cancellation.cancelled() => return,
                next = byte_stream.next() => next,
            };

            let chunk = match next {
                Some(Ok(bytes)) => bytes,
                Some(Err(e)) => {
                    yield Err(RelayError::Connection(Box::new(e)));
                    return;
                }
                None => break,
            };

            pending.extend_from_slice(&chunk);

            // Decode as much of the pending bytes as form complete UTF-8;
            // an incomplete trailing sequence waits for the next chunk
            match std::str::from_utf8(&pending) {
                Ok(text) => {
                    line_buf.push_str(text);
                    pending.clear();
                }
                Err(e) if e.error_len().is_none() => {
                    let valid = e.valid_up_to();
                    line_buf.push_str(
                        std::str::from_utf8(&pending[..valid]).unwrap_or_default(),
                    );
                    let tail = pending.split_off(valid);
                    pending = tail;
                }
                Err(e) => {
                    yield Err(RelayError::Connection(Box::new(e)));
                    return;
                }
            }

            // Yield complete lines, keeping any partial line for the next chunk
            while let Some(newline_pos) = line_buf.find('\n') {
                let line = line_buf[..newline_pos].trim_end_matches('\r').to_string();
                line_buf.drain(..=newline_pos);
                yield Ok(line);
            }
        }

        // Flush a trailing line the body ended without terminating
        if !line_buf.trim().is_empty() {
            yield Ok(line_buf.trim().to_string());
        }
    })
}
