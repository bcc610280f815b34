//! Framebuffer colorizing and scaling.
//!
//! The machine's 64x32 on/off grid is treated as a single-channel luminance
//! image, mapped through a two-color palette, then upscaled to the window
//! size with an area-averaging (box) filter. The result is a packed RGB24
//! frame ready for a full-window blit.

use crate::core::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FrameBuffer};

/// Window size in pixels.
pub const TARGET_SIZE: (u32, u32) = (480, 320);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(text: &str) -> Result<Self, ParseColorError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let bad = || ParseColorError(text.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());
        match digits.len() {
            3 => {
                // "#0a0" expands each digit: 0 -> 00, a -> aa.
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(bad()),
        }
    }

    fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// A color string that is not `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl std::fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid color {:?}, expected #rgb or #rrggbb", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Colors substituted for unlit and lit pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub off: Rgb,
    pub on: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            off: Rgb::new(0x11, 0x11, 0x11),
            on: Rgb::new(0x00, 0xAA, 0x00),
        }
    }
}

impl Palette {
    /// Map a luminance value onto the off..on gradient.
    pub fn colorize(&self, luminance: u8) -> Rgb {
        let lerp = |off: u8, on: u8| {
            let t = luminance as f32 / 255.0;
            (off as f32 + (on as f32 - off as f32) * t).round() as u8
        };
        Rgb::new(
            lerp(self.off.r, self.on.r),
            lerp(self.off.g, self.on.g),
            lerp(self.off.b, self.on.b),
        )
    }
}

/// Packed RGB24 image, row-major from the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let offset = ((y * self.width + x) * 3) as usize;
        Rgb::new(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        )
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.width as usize * 3
    }

    pub fn is_uniform(&self, color: Rgb) -> bool {
        self.pixels
            .chunks_exact(3)
            .all(|px| px == color.channels().as_slice())
    }
}

pub struct FrameRenderer {
    palette: Palette,
}

impl FrameRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Colorize `fb` and box-scale it to `target` (width, height).
    pub fn render(&self, fb: &FrameBuffer, target: (u32, u32)) -> Frame {
        let (dst_w, dst_h) = (target.0 as usize, target.1 as usize);

        // Colorize at native resolution.
        let mut source = Vec::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT * 3);
        for &on in fb.pixels() {
            let color = self.palette.colorize(if on { 255 } else { 0 });
            source.extend(color.channels().map(f32::from));
        }

        // Horizontal pass: DISPLAY_WIDTH -> dst_w, DISPLAY_HEIGHT rows.
        let x_weights = box_weights(DISPLAY_WIDTH, dst_w);
        let mut wide = vec![0.0f32; dst_w * DISPLAY_HEIGHT * 3];
        for y in 0..DISPLAY_HEIGHT {
            for (x, taps) in x_weights.iter().enumerate() {
                let out = (y * dst_w + x) * 3;
                for &(sx, w) in taps {
                    let src = (y * DISPLAY_WIDTH + sx) * 3;
                    for c in 0..3 {
                        wide[out + c] += source[src + c] * w;
                    }
                }
            }
        }

        // Vertical pass: DISPLAY_HEIGHT -> dst_h.
        let y_weights = box_weights(DISPLAY_HEIGHT, dst_h);
        let mut pixels = vec![0u8; dst_w * dst_h * 3];
        for (y, taps) in y_weights.iter().enumerate() {
            for x in 0..dst_w {
                let out = (y * dst_w + x) * 3;
                for c in 0..3 {
                    let sum: f32 = taps
                        .iter()
                        .map(|&(sy, w)| wide[(sy * dst_w + x) * 3 + c] * w)
                        .sum();
                    pixels[out + c] = sum.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        tracing::trace!(width = target.0, height = target.1, "rendered frame");
        Frame {
            width: target.0,
            height: target.1,
            pixels,
        }
    }
}

/// For each destination index, the source indices it covers and their
/// normalized area weights.
fn box_weights(src: usize, dst: usize) -> Vec<Vec<(usize, f32)>> {
    if src == 0 || dst == 0 {
        return vec![Vec::new(); dst];
    }
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (d + 1) as f64 * scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 0.0).then(|| (s, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}
