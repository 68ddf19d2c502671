//! Read-only frame snapshots shared with request handlers.
//!
//! The render loop publishes a quantized copy of every frame it flushes.
//! Readers always get an owned copy, never a view into the live buffer.

use std::sync::{Arc, PoisonError, RwLock};

use crate::color::Rgb;

/// A published frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSnapshot {
    /// Incremented on every publish; 0 before the first frame
    pub version: u64,
    pub pixels: Vec<Rgb>,
}

/// Shared handle to the latest published frame
#[derive(Debug, Clone, Default)]
pub struct FrameHandle {
    inner: Arc<RwLock<FrameSnapshot>>,
}

impl FrameHandle {
    /// Create a handle holding a dark frame of `count` pixels
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FrameSnapshot {
                version: 0,
                pixels: vec![Rgb::default(); count],
            })),
        }
    }

    /// Replace the published frame
    pub fn publish(&self, pixels: &[Rgb]) {
        let mut snapshot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        snapshot.version += 1;
        snapshot.pixels.clear();
        snapshot.pixels.extend_from_slice(pixels);
    }

    /// Copy of the latest frame
    pub fn latest(&self) -> FrameSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn version(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }
}
