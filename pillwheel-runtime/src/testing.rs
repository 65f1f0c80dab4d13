//! Test doubles shared by the runtime tests

use embedded_hal_async::delay::DelayNs;

/// Delay that yields once instead of sleeping
///
/// Lets a test interleave the motor task with a script deterministically
/// under `embassy_futures::block_on`.
pub struct YieldDelay;

impl DelayNs for YieldDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        embassy_futures::yield_now().await;
    }
}
