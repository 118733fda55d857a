use std::{
	sync::{Mutex, MutexGuard},
	time::Duration,
};

use tokio::time::{self, Instant};

// Floor for the refill rate; zero, negative and NaN rates would never refill.
const MIN_REFILL_PER_SECOND: f64 = 1e-6;

#[derive(Debug)]
struct BucketState {
	tokens: f64,
	last_refill: Instant,
}

/// Token bucket pacing outbound catalog calls. Starts full.
#[derive(Debug)]
pub struct RateLimiter {
	capacity: f64,
	refill_per_second: f64,
	state: Mutex<BucketState>,
}
impl RateLimiter {
	/// `refill_per_second` is clamped to a small positive minimum.
	pub fn new(capacity: u32, refill_per_second: f64) -> Self {
		let capacity = f64::from(capacity.max(1));
		let refill_per_second = if refill_per_second.is_finite() {
			refill_per_second.max(MIN_REFILL_PER_SECOND)
		} else if refill_per_second == f64::INFINITY {
			f64::MAX
		} else {
			MIN_REFILL_PER_SECOND
		};

		Self {
			capacity,
			refill_per_second,
			state: Mutex::new(BucketState { tokens: capacity, last_refill: Instant::now() }),
		}
	}

	/// Allows a burst of `calls` and refills at `calls` per minute.
	pub fn per_minute(calls: u32) -> Self {
		Self::new(calls, f64::from(calls.max(1)) / 60.0)
	}

	/// Waits until a call may be made and takes its token.
	pub async fn acquire(&self) {
		loop {
			let wait = {
				let mut state = self.lock();

				self.refill(&mut state, Instant::now());

				if state.tokens >= 1.0 {
					state.tokens -= 1.0;

					None
				} else {
					let missing = 1.0 - state.tokens;

					Some(Duration::from_secs_f64(missing / self.refill_per_second))
				}
			};

			match wait {
				None => return,
				Some(wait) => {
					tracing::debug!(wait_ms = wait.as_millis() as u64, "Waiting for catalog rate limit.");

					time::sleep(wait).await;
				},
			}
		}
	}

	fn lock(&self) -> MutexGuard<'_, BucketState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn refill(&self, state: &mut BucketState, now: Instant) {
		let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();

		if elapsed <= f64::EPSILON {
			return;
		}

		state.tokens = (state.tokens + elapsed * self.refill_per_second).min(self.capacity);
		state.last_refill = now;
	}
}
