//! Millisecond timekeeping shared by the rotary guard and the button timer.
//!
//! `Millis` is a 32-bit counter and wraps roughly every 49.7 days. Everything
//! here is a pure function of its inputs and safe to call from interrupt context.

/// Milliseconds on a free-running, wrapping counter.
pub type Millis = u32;

/// Source of the monotonic millisecond counter.
pub trait Clock {
    fn now_ms(&self) -> Millis;

    /// Reads the clock and checks it against `last` with [`enough_time_elapsed`].
    #[inline]
    fn enough_time_elapsed_since(&self, last: Millis, interval: Millis) -> bool {
        enough_time_elapsed(self.now_ms(), last, interval)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// True once `now` is at least `interval` past `last`.
///
/// A `now` that reads earlier than `last` means the counter wrapped since
/// `last` was taken; that is reported as enough time having passed.
#[inline]
pub fn enough_time_elapsed(now: Millis, last: Millis, interval: Millis) -> bool {
    now < last || now - last >= interval
}

/// Duration from `start` to `now`, correct across a single counter wrap.
#[inline]
pub fn elapsed_since(start: Millis, now: Millis) -> Millis {
    now.wrapping_sub(start)
}
