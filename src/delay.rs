use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Randomized pacing delay before each page fetch, within the configured
/// inclusive bounds. Deliberate rate-limiting policy, not incidental; a
/// `(0, 0)` range disables the delay.
pub fn random_fetch_delay(range: (u64, u64)) {
    let (min, max) = range;
    if max == 0 {
        return;
    }
    let delay_secs = rand::thread_rng().gen_range(min..=max.max(min));
    info!("Waiting for {} seconds (Fetch Delay)...", delay_secs);
    thread::sleep(Duration::from_secs(delay_secs));
}
