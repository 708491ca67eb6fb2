//! broker - adapts push channels of indications into owned stream readers

use crate::errors::{Result, RsmError};
use crate::southbound::Indication;
use async_channel::Receiver;
use async_std::task;
use slog::{Logger, debug};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

/// Reading side of one subscription stream.  Dropping the reader closes the
/// stream and stops its writer task.
pub struct StreamReader {
    id: StreamId,
    rx: Receiver<Indication>,
}

impl StreamReader {
    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    /// Next indication, or an error once the stream has closed.
    pub async fn recv(&self) -> Result<Indication> {
        self.rx
            .recv()
            .await
            .map_err(|_| RsmError::Internal("indication stream closed".to_string()))
    }
}

/// Per-subscription stream fan-in.  `open_reader` pairs the channel the E2
/// client pushes into with a reader, forwarding via a writer task that
/// terminates on write error (reader dropped) or source closure.
#[derive(Clone)]
pub struct StreamBroker {
    next_id: Arc<AtomicU64>,
    logger: Logger,
}

impl StreamBroker {
    pub fn new(logger: Logger) -> Self {
        StreamBroker {
            next_id: Arc::new(AtomicU64::new(1)),
            logger,
        }
    }

    pub fn open_reader(&self, name: &str, source: Receiver<Indication>) -> StreamReader {
        let id = StreamId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = async_channel::bounded(1);
        let logger = self.logger.clone();
        let name = name.to_string();
        task::spawn(async move {
            while let Ok(indication) = source.recv().await {
                if tx.send(indication).await.is_err() {
                    break;
                }
            }
            debug!(&logger, "Stream writer for {name} ({id:?}) exiting");
        });
        StreamReader { id, rx }
    }
}
