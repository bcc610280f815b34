pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// 64x32 grid of on/off pixels, row-major from the top-left corner.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one pixel. Coordinates wrap around the screen edges.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[Self::index(x, y)] = on;
    }

    /// XOR one pixel on. Returns true if the pixel was lit before, i.e. the
    /// write erased it (sprite collision).
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[Self::index(x, y)];
        let collided = *pixel;
        *pixel = !*pixel;
        collided
    }

    pub fn clear(&mut self) {
        self.fill(false);
    }

    pub fn fill(&mut self, on: bool) {
        self.pixels.fill(on);
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    fn index(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(DISPLAY_WIDTH) {
            for &on in row {
                f.write_str(if on { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
