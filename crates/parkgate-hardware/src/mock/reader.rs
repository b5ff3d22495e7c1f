//! Mock card reader implementation for testing and development.
//!
//! This module provides a simulated contactless reader that can be fed card
//! presentations and communication faults programmatically.

use crate::{
    Result,
    traits::CardReader,
    types::ReaderInfo,
};
use parkgate_core::CardUid;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock card reader for testing and development.
///
/// The reader is poll-oriented, like the real gate reader: each
/// [`try_read`](CardReader::try_read) consumes at most one queued event and
/// returns immediately.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::mock::MockCardReader;
/// use parkgate_hardware::CardReader;
/// use parkgate_core::CardUid;
///
/// #[tokio::main]
/// async fn main() -> parkgate_hardware::Result<()> {
///     let (mut reader, handle) = MockCardReader::new();
///
///     // Nothing queued: no card in field.
///     assert_eq!(reader.try_read().await?, None);
///
///     let uid = CardUid::new([0xD3, 0xA7, 0xB1, 0x28]);
///     handle.present_card(uid).await?;
///     assert_eq!(reader.try_read().await?, Some(uid));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCardReader {
    /// Channel receiver for reader events
    event_rx: mpsc::Receiver<ReaderEvent>,

    /// Device name
    name: String,
}

impl MockCardReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockCardReader, MockCardReaderHandle) where the
    /// handle can be used to simulate card presentations and faults.
    pub fn new() -> (Self, MockCardReaderHandle) {
        Self::with_name("Mock Gate Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockCardReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);

        let reader = Self {
            event_rx,
            name: name.clone(),
        };

        let handle = MockCardReaderHandle { event_tx, name };

        (reader, handle)
    }
}

impl CardReader for MockCardReader {
    async fn try_read(&mut self) -> Result<Option<CardUid>> {
        match self.event_rx.try_recv() {
            Ok(ReaderEvent::CardPresented(uid)) => Ok(Some(uid)),
            Ok(ReaderEvent::Fault(message)) => Err(crate::HardwareError::communication(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(crate::HardwareError::disconnected(self.name.clone()))
            }
        }
    }

    async fn reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(
            self.name.clone(),
            vec!["ISO14443A".to_string()],
        ))
    }
}

/// Internal event type for the mock reader.
#[derive(Debug, Clone)]
enum ReaderEvent {
    CardPresented(CardUid),
    Fault(String),
}

/// Handle for controlling a mock card reader.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::mock::MockCardReader;
/// use parkgate_core::CardUid;
///
/// #[tokio::main]
/// async fn main() -> parkgate_hardware::Result<()> {
///     let (_reader, handle) = MockCardReader::new();
///
///     handle.present_card(CardUid::new([1, 2, 3, 4])).await?;
///     handle.inject_fault("SPI transfer failed").await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockCardReaderHandle {
    /// Channel sender for reader events
    event_tx: mpsc::Sender<ReaderEvent>,

    /// Device name
    name: String,
}

impl MockCardReaderHandle {
    /// Queue a card presentation; the next `try_read` returns this UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped and the channel is
    /// closed.
    pub async fn present_card(&self, uid: CardUid) -> Result<()> {
        self.event_tx
            .send(ReaderEvent::CardPresented(uid))
            .await
            .map_err(|_| crate::HardwareError::disconnected("reader event channel closed"))
    }

    /// Queue a communication fault; the next `try_read` returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped and the channel is
    /// closed.
    pub async fn inject_fault(&self, message: impl Into<String>) -> Result<()> {
        self.event_tx
            .send(ReaderEvent::Fault(message.into()))
            .await
            .map_err(|_| crate::HardwareError::disconnected("reader event channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_reader_empty_field() {
        let (mut reader, _handle) = MockCardReader::new();
        assert_eq!(reader.try_read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_reader_present_and_read() {
        let (mut reader, handle) = MockCardReader::new();

        let uid = CardUid::new([0xD3, 0xA7, 0xB1, 0x28]);
        handle.present_card(uid).await.unwrap();

        assert_eq!(reader.try_read().await.unwrap(), Some(uid));
        // One presentation produces one read.
        assert_eq!(reader.try_read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_reader_fault() {
        let (mut reader, handle) = MockCardReader::new();

        handle.inject_fault("collision detected").await.unwrap();

        let result = reader.try_read().await;
        assert!(result.is_err());

        // Fault is transient; next poll sees an empty field again.
        assert_eq!(reader.try_read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_reader_queued_order() {
        let (mut reader, handle) = MockCardReader::new();

        let a = CardUid::new([1, 1, 1, 1]);
        let b = CardUid::new([2, 2, 2, 2]);
        handle.present_card(a).await.unwrap();
        handle.present_card(b).await.unwrap();

        assert_eq!(reader.try_read().await.unwrap(), Some(a));
        assert_eq!(reader.try_read().await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_mock_reader_disconnected() {
        let (mut reader, handle) = MockCardReader::new();
        drop(handle);

        let result = reader.try_read().await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::Disconnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_reader_info() {
        let (reader, _handle) = MockCardReader::with_name("Test Reader".to_string());

        let info = reader.reader_info().await.unwrap();
        assert_eq!(info.name, "Test Reader");
        assert!(info.protocols.contains(&"ISO14443A".to_string()));
    }
}
