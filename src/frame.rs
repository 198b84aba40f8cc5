use serde::{Deserialize, Serialize};

/// Physical pixel dimensions of a display surface's backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Build a size from physical pixel dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale a logical bounding box by an effective pixel ratio.
    ///
    /// The ratio is the device pixel ratio divided by the backing-store
    /// scale factor; non-finite or non-positive values fall back to `1.0`,
    /// matching an unavailable ratio query. Negative logical dimensions
    /// clamp to zero.
    pub fn from_logical(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let scale = |v: f64| (v.max(0.0) * ratio).round() as u32;
        Self {
            width: scale(width),
            height: scale(height),
        }
    }

    /// Byte length of an RGBA8 buffer at these dimensions.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// True when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A frame as straight (non-premultiplied) RGBA8 pixels.
///
/// `data` is tightly packed, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer at the given dimensions.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0; size.byte_len()],
        }
    }

    /// Resize to new dimensions, zeroing the contents.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.width = size.width;
        self.height = size.height;
        self.data.clear();
        self.data.resize(size.byte_len(), 0);
    }

    /// Dimensions of this buffer.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Number of pixels in this buffer.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }
}
