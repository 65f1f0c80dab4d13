//! Test doubles shared by the driver tests

use embedded_hal_async::delay::DelayNs;
use pillwheel_hal::OutputPin;

/// Mock GPIO pin that records edges
pub struct MockPin {
    pub high: bool,
    pub rising_edges: u32,
    pub writes: u32,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            high: false,
            rising_edges: 0,
            writes: 0,
        }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        self.writes += 1;
    }

    fn set_low(&mut self) {
        self.high = false;
        self.writes += 1;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Delay that yields instead of sleeping, and totals what was asked for
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        embassy_futures::yield_now().await;
    }
}
