use std::sync::Arc;

use parking_lot::RwLock;

use crate::frame::PixelBuffer;

/// Shared reference to a published capture.
///
/// Cloning is cheap. A reader that needs the pixels across a swap keeps its
/// clone; the scheduler only ever drops its own reference.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    buffer: Arc<PixelBuffer>,
    generation: u64,
}

impl CaptureHandle {
    pub fn new(buffer: PixelBuffer, generation: u64) -> Self {
        Self { buffer: Arc::new(buffer), generation }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Sequence number of the capture that produced this handle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn same_capture(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Number of live references to the pixels, this one included.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.buffer)
    }
}

/// The single "current texture" register: one writer, many readers.
#[derive(Debug, Default)]
pub struct TextureSlot {
    current: RwLock<Option<CaptureHandle>>,
}

impl TextureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<CaptureHandle> {
        self.current.read().clone()
    }

    /// Install `next` and hand back the handle it replaced.
    ///
    /// The caller drops the returned handle after the swap, so readers never
    /// see the slot empty between two captures.
    #[must_use = "the replaced handle should be released after the swap"]
    pub fn replace(&self, next: CaptureHandle) -> Option<CaptureHandle> {
        self.current.write().replace(next)
    }
}
