use std::fmt;

/// 8-bit countdown driven once per emulation tick but decaying at a fixed
/// real-world rate. the accumulator counts in units of 1/ticks_per_second so
/// the conversion stays exact for any pair of rates
#[derive(Clone, Debug)]
pub struct Timer {
    rate_hz: u32,
    ticks_per_second: u32,
    accumulator: u32,
    value: u8,
}

impl Timer {
    pub fn new(ticks_per_second: u32, rate_hz: u32) -> Self {
        Timer {
            rate_hz,
            ticks_per_second: ticks_per_second.max(1),
            accumulator: 0,
            value: 0,
        }
    }

    pub fn set_ticks_per_second(&mut self, ticks_per_second: u32) {
        self.ticks_per_second = ticks_per_second.max(1);
        self.accumulator = 0;
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value;
        self.accumulator = 0;
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// advance by one tick
    pub fn tick(&mut self) {
        if self.value == 0 {
            return;
        }
        self.accumulator += self.rate_hz;
        while self.accumulator >= self.ticks_per_second && self.value > 0 {
            self.accumulator -= self.ticks_per_second;
            self.value -= 1;
        }
        if self.value == 0 {
            self.accumulator = 0;
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x}", self.value)
    }
}
