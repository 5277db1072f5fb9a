//! Upload pipeline
//!
//! Checks that a file is selected and a session token exists, streams the
//! file as a multipart body with progress reporting, and turns the storage
//! service's answer into a content hash or a generic failure.
//!
//! Progress is measured on the bytes handed to the transport, chunk by
//! chunk, as `round(bytes_sent * 100 / total_bytes)`. Progress ticks go to
//! the event bus only; the status slot is written once, at the end.

use bsx_common::api::UPLOAD_FIELD_NAME;
use bsx_common::{ClientEvent, StatusMessage};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, error, info};

use crate::api_client::UploadReceipt;
use crate::controller::ClientContext;
use crate::messages;
use crate::session::PendingFile;

/// Rounded completion percentage
///
/// An empty transfer counts as complete.
///
/// # Examples
///
/// ```
/// use bsx_client::upload::percent_complete;
///
/// assert_eq!(percent_complete(0, 200), 0);
/// assert_eq!(percent_complete(1, 200), 1); // 0.5 rounds up
/// assert_eq!(percent_complete(200, 200), 100);
/// ```
pub fn percent_complete(bytes_sent: u64, total_bytes: u64) -> u8 {
    if total_bytes == 0 {
        return 100;
    }
    let percent = (bytes_sent as f64 * 100.0 / total_bytes as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Tracks bytes handed to the transport and reports percentage changes
pub struct ProgressTracker<F> {
    total_bytes: u64,
    bytes_sent: u64,
    last_percent: Option<u8>,
    on_progress: F,
}

impl<F: FnMut(u8)> ProgressTracker<F> {
    pub fn new(total_bytes: u64, on_progress: F) -> Self {
        Self {
            total_bytes,
            bytes_sent: 0,
            last_percent: None,
            on_progress,
        }
    }

    /// Record `bytes` more sent; calls back only when the rounded
    /// percentage changes
    pub fn advance(&mut self, bytes: usize) {
        self.bytes_sent += bytes as u64;
        let percent = percent_complete(self.bytes_sent, self.total_bytes);
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            (self.on_progress)(percent);
        }
    }
}

/// Stream `file` in `chunk_size` slices of its shared buffer
///
/// `on_progress` runs as each slice is pulled. An empty file reports 100
/// straight away since no slice will ever be pulled.
pub fn build_upload_chunks<F>(
    file: &PendingFile,
    chunk_size: usize,
    on_progress: F,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    let mut tracker = ProgressTracker::new(file.len() as u64, on_progress);
    if file.is_empty() {
        tracker.advance(0);
    }

    let contents = file.contents();
    let chunk_size = chunk_size.max(1);
    let slices = (0..contents.len())
        .step_by(chunk_size)
        .map(move |start| contents.slice(start..(start + chunk_size).min(contents.len())));

    futures::stream::iter(slices).map(move |chunk| {
        tracker.advance(chunk.len());
        Ok(chunk)
    })
}

/// Build the multipart body for `file`
///
/// The file goes under the fixed field name with its original file name.
/// The body is streamed in `chunk_size` pieces; `on_progress` runs as the
/// transport pulls each piece.
pub fn build_upload_form<F>(file: &PendingFile, chunk_size: usize, on_progress: F) -> Form
where
    F: FnMut(u8) + Send + Sync + 'static,
{
    let stream = build_upload_chunks(file, chunk_size, on_progress);
    let part = Part::stream_with_length(Body::wrap_stream(stream), file.len() as u64)
        .file_name(file.name().to_string());

    Form::new().part(UPLOAD_FIELD_NAME, part)
}

/// Status text for a successful upload
pub fn upload_success_message(receipt: &UploadReceipt) -> String {
    let mut text = format!("File uploaded!\nIPFS Hash:\n{}", receipt.ipfs_hash);
    if !receipt.tags.is_empty() {
        text.push_str("\nTags: ");
        text.push_str(&receipt.tags.join(", "));
    }
    text
}

/// Upload the pending file
///
/// Preconditions, checked in order: a file is selected, a token is present.
/// Either failing short-circuits with a warning and no request. The selected
/// file stays selected after a successful upload.
pub async fn upload_pending_file(ctx: &ClientContext) -> StatusMessage {
    let (file, token, session_id) = {
        let state = ctx.read_state();
        (
            state.pending_file.clone(),
            state.session.token().map(str::to_string),
            state.session_id,
        )
    };

    let Some(file) = file else {
        debug!(%session_id, "Upload rejected: no file selected");
        return ctx.status.warning(messages::SELECT_FILE_FIRST);
    };

    let Some(token) = token else {
        debug!(%session_id, "Upload rejected: not logged in");
        return ctx.status.warning(messages::LOGIN_FIRST);
    };

    info!(
        %session_id,
        file = file.name(),
        bytes = file.len(),
        "Starting file upload"
    );

    let events = ctx.events.clone();
    let file_name = file.name().to_string();
    let form = build_upload_form(
        &file,
        ctx.backend.config().upload_chunk_size,
        move |percent| {
            debug!(file = %file_name, percent, "Upload progress");
            events.emit_lossy(ClientEvent::UploadProgress {
                file_name: file_name.clone(),
                percent,
            });
        },
    );

    match ctx.backend.upload(&token, form).await {
        Ok(receipt) => {
            info!(
                %session_id,
                file = file.name(),
                ipfs_hash = %receipt.ipfs_hash,
                "File uploaded"
            );
            ctx.status.success(upload_success_message(&receipt))
        }
        Err(err) => {
            error!(
                %session_id,
                file = file.name(),
                status = ?err.status(),
                error = %err,
                body = ?err.body(),
                "File upload failed"
            );
            ctx.status.error(messages::UPLOAD_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_complete(0, 3), 0);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(3, 3), 100);
    }

    #[test]
    fn test_percent_empty_total_is_complete() {
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn test_percent_never_exceeds_100() {
        assert_eq!(percent_complete(500, 100), 100);
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut tracker = ProgressTracker::new(1000, move |p| sink.lock().unwrap().push(p));

        tracker.advance(1); // 0.1% -> 0
        tracker.advance(1); // 0.2% -> 0 (no report)
        tracker.advance(498); // 50%
        tracker.advance(500); // 100%

        assert_eq!(*seen.lock().unwrap(), vec![0, 50, 100]);
    }

    #[test]
    fn test_form_body_is_lazy() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let file = PendingFile::new("data.bin", vec![7u8; 400]);

        let form = build_upload_form(&file, 100, move |p| sink.lock().unwrap().push(p));
        assert!(!form.boundary().is_empty());

        // Nothing is reported until the transport pulls the body
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_chunks_are_slices_of_file_buffer() {
        let file = PendingFile::new("data.bin", (0..10u8).collect());
        let base = file.contents().as_ptr() as usize;

        let chunks: Vec<Bytes> = futures::executor::block_on(
            build_upload_chunks(&file, 4, |_| {}).map(|c| c.unwrap()).collect(),
        );

        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[2][..], &[8, 9]);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.as_ptr() as usize, base + i * 4);
        }
    }

    #[test]
    fn test_empty_file_reports_complete_immediately() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let file = PendingFile::new("empty.txt", Vec::new());

        let _form = build_upload_form(&file, 100, move |p| sink.lock().unwrap().push(p));

        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }

    #[test]
    fn test_success_message_contains_hash_and_tags() {
        let receipt = UploadReceipt {
            ipfs_hash: "Qm123".to_string(),
            tags: vec!["example-tag1".to_string(), "example-tag2".to_string()],
        };
        let text = upload_success_message(&receipt);
        assert!(text.contains("Qm123"));
        assert!(text.contains("example-tag1, example-tag2"));
    }

    #[test]
    fn test_success_message_without_tags() {
        let receipt = UploadReceipt {
            ipfs_hash: "QmABC".to_string(),
            tags: Vec::new(),
        };
        assert_eq!(upload_success_message(&receipt), "File uploaded!\nIPFS Hash:\nQmABC");
    }
}
