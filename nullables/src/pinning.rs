//! Nullable pinner: records payloads instead of uploading them.

use agora_pinning::{Pin, Pinner, PinningError};
use async_trait::async_trait;
use std::sync::Mutex;

/// A pinner that keeps everything it is asked to pin.
///
/// Content identifiers are `null-cid-{n}`, numbered from 1 in call order.
pub struct NullPinner {
    pinned_json: Mutex<Vec<serde_json::Value>>,
    pinned_files: Mutex<Vec<(String, Vec<u8>)>>,
    failure: Mutex<Option<String>>,
}

impl NullPinner {
    pub fn new() -> Self {
        Self {
            pinned_json: Mutex::new(Vec::new()),
            pinned_files: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `PinningError::Remote(message)`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// JSON payloads pinned so far (for assertions).
    pub fn pinned_json(&self) -> Vec<serde_json::Value> {
        self.pinned_json.lock().unwrap().clone()
    }

    /// File names pinned so far (for assertions).
    pub fn pinned_file_names(&self) -> Vec<String> {
        self.pinned_files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn check(&self) -> Result<(), PinningError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(PinningError::Remote(message.clone())),
            None => Ok(()),
        }
    }

    fn next_pin(&self, size: usize) -> Pin {
        let n = self.pinned_json.lock().unwrap().len() + self.pinned_files.lock().unwrap().len();
        Pin {
            ipfs_hash: format!("null-cid-{n}"),
            pin_size: size as u64,
            timestamp: None,
            is_duplicate: false,
        }
    }
}

impl Default for NullPinner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pinner for NullPinner {
    async fn pin_json(&self, payload: &serde_json::Value) -> Result<Pin, PinningError> {
        self.check()?;
        self.pinned_json.lock().unwrap().push(payload.clone());
        Ok(self.next_pin(payload.to_string().len()))
    }

    async fn pin_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<Pin, PinningError> {
        self.check()?;
        let size = bytes.len();
        self.pinned_files
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes));
        Ok(self.next_pin(size))
    }
}
