use std::time::{Duration, Instant};

const PROBE_ROUNDS: usize = 64;
const MAX_SPINS: usize = 1_000_000;

/// Smallest observable step of the monotonic clock, or `None` when the clock
/// never advanced during the probe.
pub fn resolution() -> Option<Duration> {
    let mut finest: Option<Duration> = None;
    for _ in 0..PROBE_ROUNDS {
        let start = Instant::now();
        let mut now = Instant::now();
        let mut spins = 0;
        while now == start && spins < MAX_SPINS {
            now = Instant::now();
            spins += 1;
        }
        let step = now.saturating_duration_since(start);
        if !step.is_zero() {
            finest = Some(finest.map_or(step, |current| current.min(step)));
        }
    }
    finest
}
