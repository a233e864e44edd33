use crate::TIMER_HZ;

/// The delay and sound timers, both counting down towards zero at 60 Hz
pub struct Timers {
    pub(crate) dt: u8,
    pub(crate) st: u8,
    /// Fraction of a timer tick accumulated from instruction steps, in units of 1/clock_hz
    acc: u32,
}

impl Timers {
    pub fn new() -> Self {
        Self { dt: 0, st: 0, acc: 0 }
    }

    /// Decrement both timers once and return true if the sound timer just reached zero
    pub fn tick(&mut self) -> bool {
        self.dt = self.dt.saturating_sub(1);
        let beep = self.st == 1;
        self.st = self.st.saturating_sub(1);
        beep
    }

    /// Advance the 60 Hz clock by one instruction step at `clock_hz`, ticking as many times as it has elapsed
    pub fn advance(&mut self, clock_hz: u32) -> bool {
        let clock_hz = clock_hz.max(1);
        self.acc += TIMER_HZ;
        let mut beep = false;
        while self.acc >= clock_hz {
            self.acc -= clock_hz;
            beep |= self.tick();
        }
        beep
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
