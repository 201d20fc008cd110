//! Owned raster buffers

use crate::geometry::IntSize;

const BYTES_PER_PIXEL: usize = 4;

/// Largest pixel buffer an image may own, matching tiny-skia's limit
const MAX_BYTES: usize = i32::MAX as usize;

/// Buffer length for `size`, or `None` past `MAX_BYTES`
fn byte_len(size: IntSize) -> Option<usize> {
    (size.width as usize)
        .checked_mul(size.height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
        .filter(|len| *len <= MAX_BYTES)
}

/// An owned RGBA8 image with premultiplied alpha
///
/// A zero-sized image is valid and holds no pixel data; it is what a render
/// of an unloaded document produces.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Allocate an image of `size`, cleared to fully transparent
    ///
    /// A size whose buffer would pass 2 GiB yields a null 0x0 image
    /// instead.
    pub fn new(size: IntSize) -> Self {
        match byte_len(size) {
            Some(len) => Self {
                width: size.width,
                height: size.height,
                data: vec![0; len],
            },
            None => Self {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        }
    }

    /// Wrap existing premultiplied RGBA8 pixels
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_vec(size: IntSize, data: Vec<u8>) -> Option<Self> {
        if byte_len(size) != Some(data.len()) {
            return None;
        }
        Some(Self {
            width: size.width,
            height: size.height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// True when the image has no pixels
    pub fn is_null(&self) -> bool {
        self.data.is_empty()
    }

    /// Premultiplied RGBA8 pixel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at (x, y), or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let p = &self.data[i..i + BYTES_PER_PIXEL];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Fill every pixel with a premultiplied RGBA8 value
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for chunk in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// True if every pixel is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(BYTES_PER_PIXEL).all(|p| p[3] == 0)
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
