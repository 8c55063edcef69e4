//! Packed image sample buffers.
//!
//! Image data in PDF files is stored as a continuous big-endian bitstream of
//! integer samples, one per component per pixel, row-major. The color engine
//! unpacks this stream, converts it, and repacks the result; it never owns
//! the buffer's lifecycle beyond that.

/// A packed buffer of image samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
    /// The number of bits per component, between 1 and 16.
    pub bits_per_component: u8,
    /// The number of color components per pixel.
    pub color_components: u8,
    /// An optional decode-range override, two entries per component.
    pub decode: Option<Vec<f32>>,
    /// The packed sample data.
    pub data: Vec<u8>,
    /// Optional alpha data. It is carried through conversions unchanged and
    /// never interpreted here.
    pub alpha: Option<Vec<u8>>,
}

impl Image {
    /// Create a new image without a decode override or alpha data.
    pub fn new(
        width: u32,
        height: u32,
        bits_per_component: u8,
        color_components: u8,
        data: Vec<u8>,
    ) -> Self {
        debug_assert!(
            (1..=16).contains(&bits_per_component),
            "bits per component must be between 1 and 16"
        );

        Self {
            width,
            height,
            bits_per_component,
            color_components,
            decode: None,
            data,
            alpha: None,
        }
    }

    /// Create an 8-bit, 3-component image from unpacked samples.
    pub fn rgb8(width: u32, height: u32, samples: &[u32], alpha: Option<Vec<u8>>) -> Self {
        Self {
            width,
            height,
            bits_per_component: 8,
            color_components: 3,
            decode: None,
            data: samples.iter().map(|s| *s as u8).collect(),
            alpha,
        }
    }

    /// The largest raw value a sample can take at this bit depth.
    pub fn max_value(&self) -> u32 {
        (1 << u32::from(self.bits_per_component)) - 1
    }

    /// Unpack the sample data into one integer per component per pixel.
    ///
    /// Trailing bits that do not form a whole sample are dropped.
    pub fn samples(&self) -> Vec<u32> {
        BitReader::new(&self.data, self.bits_per_component).collect()
    }

    /// Repack the given samples at the buffer's bit depth, replacing the
    /// current data.
    pub fn set_samples(&mut self, samples: &[u32]) {
        let bits = u32::from(self.bits_per_component);
        let mask = self.max_value();

        let mut data = Vec::with_capacity((samples.len() * bits as usize).div_ceil(8));
        let mut buf = 0_u32;
        let mut filled = 0_u32;

        for sample in samples {
            buf = (buf << bits) | (*sample & mask);
            filled += bits;

            while filled >= 8 {
                filled -= 8;
                data.push((buf >> filled) as u8);
            }
        }

        if filled > 0 {
            data.push((buf << (8 - filled)) as u8);
        }

        self.data = data;
    }
}

/// A reader yielding fixed-width big-endian samples from a bitstream.
struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
    bits: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8], bits: u8) -> Self {
        Self {
            data,
            bit_pos: 0,
            bits: usize::from(bits),
        }
    }
}

impl Iterator for BitReader<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 || self.bit_pos + self.bits > self.data.len() * 8 {
            return None;
        }

        // The fast path covers the byte-aligned depths used by almost all
        // real images.
        if self.bits == 8 && self.bit_pos % 8 == 0 {
            let item = u32::from(self.data[self.bit_pos / 8]);
            self.bit_pos += 8;

            return Some(item);
        }

        let mut item = 0_u32;
        for i in 0..self.bits {
            let pos = self.bit_pos + i;
            let bit = (self.data[pos / 8] >> (7 - pos % 8)) & 1;
            item = (item << 1) | u32::from(bit);
        }
        self.bit_pos += self.bits;

        Some(item)
    }
}
