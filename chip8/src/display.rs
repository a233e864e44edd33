use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub type FrameBuffer = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

pub struct Display {
    /// One byte per pixel, where each cell is either on (1) or off (0)
    pub(crate) fb: FrameBuffer,
    pub(crate) dirty: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            fb: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
            dirty: false,
        }
    }

    /// Copy out the frame buffer and mark it as seen
    pub fn fb(&mut self) -> FrameBuffer {
        self.dirty = false;
        self.fb
    }

    /// A read-only row-major view of all 2048 cells
    pub fn pixels(&self) -> &[u8] {
        self.fb.as_flattened()
    }

    /// Toggle the pixel at the coordinates and return true if it was already on
    /// Coordinates past the edge wrap around to the opposite side
    /// This function marks the display as dirty, causing it to be re-rendered on the next update
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let (x, y) = (x % SCREEN_WIDTH, y % SCREEN_HEIGHT);
        self.dirty = true;
        let prev = self.fb[y][x];
        self.fb[y][x] ^= 1;
        prev == 1
    }

    /// XOR an 8 pixel wide sprite row into the frame buffer at (x, y) and report whether any pixel was erased
    pub fn draw_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        for col in 0..8 {
            if (row >> (7 - col)) & 0x1 == 1 {
                collision |= self.toggle(x + col, y);
            }
        }
        collision
    }

    /// Clear the display contents by zeroing out the framebuffer
    /// This function marks the display as dirty, causing it to be re-rendered on the next update
    pub fn clear(&mut self) {
        self.dirty = true;
        for row in self.fb.iter_mut() {
            row.fill(0);
        }
    }

    #[cfg(test)]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.fb[y][x] == 1
    }
}
