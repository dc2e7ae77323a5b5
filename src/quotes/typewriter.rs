//! # Typewriter Engine
//!
//! Drives the idle orb: a quote is revealed one character at a time, held,
//! erased, and then typed again, possibly as a different quote.
//!
//! ## Phases
//!
//! ```text
//!   ┌────────┐  full   ┌─────────┐  wait elapsed  ┌──────────┐
//!   │ Typing │ ──────▶ │ Waiting │ ─────────────▶ │ Deleting │
//!   └────────┘         └─────────┘                └──────────┘
//!        ▲                                              │ empty
//!        └──────────── rotate if interval elapsed ──────┘
//! ```
//!
//! ## Scheduling
//!
//! The engine never owns a timer. It holds at most one [`Wake`] (the instant
//! of the next step and what that step does). Every transition drops the
//! current wake before deriving the next one, so steps can never stack. The
//! event loop asks [`Typewriter::next_wake`] how long it may sleep and calls
//! [`Typewriter::tick`] with the current instant.
//!
//! While the search box is active the engine is suspended: the wake is
//! dropped and [`Typewriter::tick`] is inert. [`Typewriter::resume`] re-derives
//! the wake from the preserved phase and prefix.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use super::catalog::{random_quote, random_quote_excluding, Quote};

/// Timing constants for the animation, in wall-clock durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Mean delay before revealing the next character.
    pub typing_base: Duration,
    /// Uniform jitter applied either side of `typing_base`.
    pub typing_jitter: Duration,
    /// How long a fully revealed quote is held.
    pub wait: Duration,
    /// Delay before erasing the next character.
    pub delete: Duration,
    /// Minimum time between quote rotations.
    pub refresh_interval: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            typing_base: Duration::from_millis(200),
            typing_jitter: Duration::from_millis(50),
            wait: Duration::from_millis(8_000),
            delete: Duration::from_millis(100),
            refresh_interval: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Waiting,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeAction {
    Reveal,
    StartDeleting,
    Erase,
}

/// The single pending step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wake {
    pub at: Instant,
    pub action: WakeAction,
}

/// What a call to [`Typewriter::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The visible text or phase changed and needs a redraw.
    pub changed: bool,
    /// A new quote replaced the previous one.
    pub rotated: bool,
    /// The shell should start a background quote fetch.
    pub prefetch: bool,
}

pub struct Typewriter {
    pool: Vec<Quote>,
    quote: Quote,
    revealed: usize,
    phase: Phase,
    last_rotation: Instant,
    prefetched: Option<Quote>,
    wake: Option<Wake>,
    suspended: bool,
    timing: TypewriterTiming,
    rng: StdRng,
}

impl Typewriter {
    /// Create an engine showing `quote`, drawing later rotations from `pool`.
    pub fn new(
        quote: Quote,
        pool: Vec<Quote>,
        timing: TypewriterTiming,
        rng: StdRng,
        now: Instant,
    ) -> Self {
        let mut typewriter = Self {
            pool,
            quote,
            revealed: 0,
            phase: Phase::Typing,
            last_rotation: now,
            prefetched: None,
            wake: None,
            suspended: false,
            timing,
            rng,
        };
        typewriter.settle(now, &mut TickOutcome::default());
        typewriter
    }

    /// Create an engine starting on a random quote from `pool`.
    ///
    /// Falls back to the first built-in maxim when the pool is empty.
    pub fn with_random_quote(
        pool: Vec<Quote>,
        timing: TypewriterTiming,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let quote = random_quote(&mut rng, &pool).unwrap_or_else(|| Quote {
            text: "知行合一".to_string(),
            author: "王阳明".to_string(),
        });
        Self::new(quote, pool, timing, rng, now)
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The currently visible prefix of the quote text.
    pub fn displayed(&self) -> &str {
        match self.quote.text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &self.quote.text[..byte],
            None => &self.quote.text,
        }
    }

    /// Number of visible characters.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn last_rotation(&self) -> Instant {
        self.last_rotation
    }

    /// The pending step, if any. `None` while suspended.
    pub fn pending(&self) -> Option<Wake> {
        self.wake
    }

    /// When the event loop next needs to call [`Typewriter::tick`].
    pub fn next_wake(&self) -> Option<Instant> {
        self.wake.map(|w| w.at)
    }

    pub fn has_prefetched(&self) -> bool {
        self.prefetched.is_some()
    }

    /// Keep a remotely fetched quote for the next rotation.
    pub fn set_prefetched(&mut self, quote: Quote) {
        tracing::debug!(text = %quote.text, "cached prefetched quote");
        self.prefetched = Some(quote);
    }

    /// Stop scheduling. Phase and prefix are kept as they are.
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.wake = None;
    }

    /// Resume scheduling from the preserved phase and prefix.
    pub fn resume(&mut self, now: Instant) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        self.wake = self.next_step(now);
    }

    /// Run the pending step if it is due.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.suspended {
            return outcome;
        }
        let Some(wake) = self.wake else {
            return outcome;
        };
        if now < wake.at {
            return outcome;
        }
        self.wake = None;

        let len = self.quote.char_len();
        match (wake.action, self.phase) {
            (WakeAction::Reveal, Phase::Typing) if self.revealed < len => {
                self.revealed += 1;
                outcome.changed = true;
            }
            (WakeAction::StartDeleting, Phase::Waiting) => {
                self.phase = Phase::Deleting;
                outcome.changed = true;
            }
            (WakeAction::Erase, Phase::Deleting) if self.revealed > 0 => {
                self.revealed -= 1;
                outcome.changed = true;
            }
            (action, phase) => {
                tracing::trace!(?action, ?phase, "dropped step that no longer applies");
            }
        }

        self.settle(now, &mut outcome);
        outcome
    }

    /// Apply the transitions that happen without a delay, then derive the
    /// next wake.
    fn settle(&mut self, now: Instant, outcome: &mut TickOutcome) {
        loop {
            match self.phase {
                Phase::Typing if self.revealed >= self.quote.char_len() => {
                    self.phase = Phase::Waiting;
                    outcome.changed = true;
                }
                Phase::Deleting if self.revealed == 0 => {
                    self.finish_cycle(now, outcome);
                    if self.quote.char_len() == 0 {
                        break;
                    }
                }
                _ => break,
            }
        }
        self.wake = if self.suspended {
            None
        } else {
            self.next_step(now)
        };
    }

    fn finish_cycle(&mut self, now: Instant, outcome: &mut TickOutcome) {
        let elapsed = now.saturating_duration_since(self.last_rotation);
        if elapsed >= self.timing.refresh_interval {
            let next = match self.prefetched.take() {
                Some(quote) => Some(quote),
                None => random_quote_excluding(&mut self.rng, &self.pool, &self.quote),
            };
            if let Some(next) = next {
                tracing::debug!(from = %self.quote.text, to = %next.text, "rotated quote");
                self.quote = next;
                outcome.rotated = true;
            }
            self.last_rotation = now;
            outcome.prefetch = true;
        }
        self.phase = Phase::Typing;
        self.revealed = 0;
        outcome.changed = true;
    }

    fn next_step(&mut self, now: Instant) -> Option<Wake> {
        let len = self.quote.char_len();
        let (delay, action) = match self.phase {
            Phase::Typing if self.revealed < len => (self.typing_delay(), WakeAction::Reveal),
            Phase::Waiting => (self.timing.wait, WakeAction::StartDeleting),
            Phase::Deleting if self.revealed > 0 => (self.timing.delete, WakeAction::Erase),
            _ => return None,
        };
        Some(Wake {
            at: now + delay,
            action,
        })
    }

    fn typing_delay(&mut self) -> Duration {
        let base = self.timing.typing_base.as_millis() as u64;
        let jitter = self.timing.typing_jitter.as_millis() as u64;
        let millis = self
            .rng
            .gen_range(base.saturating_sub(jitter)..=base + jitter);
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn quote(text: &str) -> Quote {
        Quote::new(text, "测试").expect("quote")
    }

    fn pool() -> Vec<Quote> {
        vec![quote("知行合一"), quote("上善若水"), quote("道法自然")]
    }

    fn engine(start: Instant, timing: TypewriterTiming) -> Typewriter {
        Typewriter::new(
            quote("知行合一"),
            pool(),
            timing,
            StdRng::seed_from_u64(42),
            start,
        )
    }

    /// Fire the pending step at exactly its due time.
    fn step(tw: &mut Typewriter) -> (Instant, TickOutcome) {
        let at = tw.next_wake().expect("pending wake");
        (at, tw.tick(at))
    }

    /// Step until the engine is back in `Typing` with an empty prefix,
    /// checking the prefix invariant and phase order along the way.
    fn run_cycle(tw: &mut Typewriter) -> (Instant, TickOutcome) {
        let mut last = tw.phase();
        let mut merged = TickOutcome::default();
        loop {
            let text = tw.quote().text.clone();
            let (at, outcome) = step(tw);
            merged.rotated |= outcome.rotated;
            merged.prefetch |= outcome.prefetch;
            if !outcome.rotated {
                assert!(text.starts_with(tw.displayed()));
            }
            assert!(tw.quote().text.starts_with(tw.displayed()));
            let now = tw.phase();
            let allowed = match last {
                Phase::Typing => matches!(now, Phase::Typing | Phase::Waiting),
                Phase::Waiting => matches!(now, Phase::Waiting | Phase::Deleting),
                Phase::Deleting => matches!(now, Phase::Deleting | Phase::Typing),
            };
            assert!(allowed, "illegal transition {last:?} -> {now:?}");
            if last == Phase::Deleting && now == Phase::Typing {
                assert_eq!(tw.revealed(), 0);
                return (at, merged);
            }
            last = now;
        }
    }

    #[test]
    fn test_starts_typing_with_empty_prefix() {
        let start = Instant::now();
        let tw = engine(start, TypewriterTiming::default());
        assert_eq!(tw.phase(), Phase::Typing);
        assert_eq!(tw.displayed(), "");
        let wake = tw.pending().expect("wake");
        assert_eq!(wake.action, WakeAction::Reveal);
        let delay = wake.at - start;
        assert!(delay >= Duration::from_millis(150) && delay <= Duration::from_millis(250));
    }

    #[test]
    fn test_tick_before_due_is_inert() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        let outcome = tw.tick(start + Duration::from_millis(100));
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(tw.displayed(), "");
    }

    #[test]
    fn test_reveals_one_char_per_step() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        step(&mut tw);
        assert_eq!(tw.displayed(), "知");
        step(&mut tw);
        assert_eq!(tw.displayed(), "知行");
    }

    #[test]
    fn test_full_reveal_enters_waiting() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        for _ in 0..4 {
            step(&mut tw);
        }
        assert_eq!(tw.phase(), Phase::Waiting);
        assert_eq!(tw.displayed(), "知行合一");
        let wake = tw.pending().expect("wake");
        assert_eq!(wake.action, WakeAction::StartDeleting);
    }

    #[test]
    fn test_wait_has_no_jitter() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        let mut at = start;
        for _ in 0..4 {
            at = step(&mut tw).0;
        }
        let wake = tw.pending().expect("wake");
        assert_eq!(wake.at - at, Duration::from_millis(8_000));
    }

    #[test]
    fn test_deleting_uses_fixed_delay() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        for _ in 0..5 {
            step(&mut tw);
        }
        assert_eq!(tw.phase(), Phase::Deleting);
        let (at, _) = step(&mut tw);
        assert_eq!(tw.displayed(), "知行合");
        let wake = tw.pending().expect("wake");
        assert_eq!(wake.action, WakeAction::Erase);
        assert_eq!(wake.at - at, Duration::from_millis(100));
    }

    #[test]
    fn test_cycle_keeps_quote_before_interval() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        let (_, outcome) = run_cycle(&mut tw);
        assert!(!outcome.rotated);
        assert!(!outcome.prefetch);
        assert_eq!(tw.quote().text, "知行合一");
        assert_eq!(tw.last_rotation(), start);
    }

    #[test]
    fn test_cycle_rotates_after_interval() {
        let start = Instant::now();
        let timing = TypewriterTiming {
            refresh_interval: Duration::from_secs(1),
            ..TypewriterTiming::default()
        };
        let mut tw = engine(start, timing);
        let (at, outcome) = run_cycle(&mut tw);
        assert!(outcome.rotated);
        assert!(outcome.prefetch);
        assert_ne!(tw.quote().text, "知行合一");
        assert_eq!(tw.last_rotation(), at);
        assert_eq!(tw.phase(), Phase::Typing);
        assert_eq!(tw.displayed(), "");
    }

    #[test]
    fn test_rotation_prefers_prefetched_quote() {
        let start = Instant::now();
        let timing = TypewriterTiming {
            refresh_interval: Duration::ZERO,
            ..TypewriterTiming::default()
        };
        let mut tw = engine(start, timing);
        tw.set_prefetched(quote("此时无声胜有声"));
        run_cycle(&mut tw);
        assert_eq!(tw.quote().text, "此时无声胜有声");
        assert!(!tw.has_prefetched());

        // Consumed: the next rotation falls back to the pool.
        run_cycle(&mut tw);
        assert_ne!(tw.quote().text, "此时无声胜有声");
    }

    #[test]
    fn test_many_rotations_never_repeat() {
        let start = Instant::now();
        let timing = TypewriterTiming {
            refresh_interval: Duration::ZERO,
            ..TypewriterTiming::default()
        };
        let mut tw = engine(start, timing);
        for _ in 0..20 {
            let before = tw.quote().text.clone();
            run_cycle(&mut tw);
            assert_ne!(tw.quote().text, before);
        }
    }

    #[test]
    fn test_suspend_freezes_state() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        step(&mut tw);
        step(&mut tw);
        tw.suspend();
        assert!(tw.next_wake().is_none());

        let later = start + Duration::from_secs(3_600);
        assert_eq!(tw.tick(later), TickOutcome::default());
        assert_eq!(tw.displayed(), "知行");
        assert_eq!(tw.phase(), Phase::Typing);
    }

    #[test]
    fn test_resume_continues_from_prefix() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        step(&mut tw);
        tw.suspend();

        let later = start + Duration::from_secs(60);
        tw.resume(later);
        let wake = tw.pending().expect("wake");
        assert!(wake.at > later);
        assert_eq!(wake.action, WakeAction::Reveal);
        step(&mut tw);
        assert_eq!(tw.displayed(), "知行");
    }

    #[test]
    fn test_resume_in_waiting_restarts_hold() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        for _ in 0..4 {
            step(&mut tw);
        }
        tw.suspend();
        let later = start + Duration::from_secs(120);
        tw.resume(later);
        assert_eq!(tw.next_wake(), Some(later + Duration::from_millis(8_000)));
    }

    #[test]
    fn test_resume_when_running_keeps_wake() {
        let start = Instant::now();
        let mut tw = engine(start, TypewriterTiming::default());
        let before = tw.pending();
        tw.resume(start + Duration::from_secs(1));
        assert_eq!(tw.pending(), before);
    }

    #[test]
    fn test_displayed_handles_mixed_width_text() {
        let start = Instant::now();
        let mut tw = Typewriter::new(
            quote("Stay 饥饿"),
            pool(),
            TypewriterTiming::default(),
            StdRng::seed_from_u64(3),
            start,
        );
        for _ in 0..6 {
            step(&mut tw);
        }
        assert_eq!(tw.displayed(), "Stay 饥");
    }

    #[test]
    fn test_with_random_quote_empty_pool_falls_back() {
        let tw = Typewriter::with_random_quote(
            Vec::new(),
            TypewriterTiming::default(),
            StdRng::seed_from_u64(0),
            Instant::now(),
        );
        assert_eq!(tw.quote().text, "知行合一");
    }
}
