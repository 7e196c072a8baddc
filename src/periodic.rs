//! Software timer whose period can be changed from interrupt context.
//!
//! `start`, `stop`, `is_running`, `change_period` only take a short critical
//! section and raise a [`Signal`], so they are safe inside an interrupt
//! handler. The callback itself runs in [`PeriodicSignal::run`], i.e. in the
//! task that services the timer, never in the interrupt.
//!
//! Period changes restart the running period from the moment of the change;
//! firings are otherwise spaced by the period regardless of how long the
//! callback takes (deadlines are absolute).

use core::cell::Cell;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use crate::error::Error;

/// Work done on every expiry of a [`PeriodicSignal`].
pub trait TimerCallback {
    async fn on_expiry(&mut self);
}

#[derive(Clone, Copy)]
struct State {
    period: Duration,
    running: bool,
}

pub struct PeriodicSignal<M: RawMutex> {
    state: Mutex<M, Cell<State>>,
    reconfigured: Signal<M, ()>,
}

impl<M: RawMutex> PeriodicSignal<M> {
    /// Creates a dormant signal.
    pub const fn new(period: Duration) -> Self {
        Self {
            state: Mutex::new(Cell::new(State {
                period,
                running: false,
            })),
            reconfigured: Signal::new(),
        }
    }

    pub fn start(&self) {
        self.update(|state| state.running = true);
    }

    /// Stops before the next firing. A callback already running completes.
    pub fn stop(&self) {
        self.update(|state| state.running = false);
    }

    pub fn is_running(&self) -> bool {
        self.state.lock(|state| state.get().running)
    }

    pub fn period(&self) -> Duration {
        self.state.lock(|state| state.get().period)
    }

    /// Sets a new period, counted from now. Starts the signal if dormant.
    pub fn change_period(&self, period: Duration) {
        self.update(|state| {
            state.period = period;
            state.running = true;
        });
    }

    fn update(&self, f: impl FnOnce(&mut State)) {
        self.state.lock(|cell| {
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
        });
        self.reconfigured.signal(());
    }

    fn snapshot(&self) -> State {
        self.state.lock(Cell::get)
    }

    /// Timer service loop: invokes `callback` on every expiry, forever.
    pub async fn run<C: TimerCallback>(&self, callback: &mut C) -> ! {
        let mut deadline: Option<Instant> = None;
        loop {
            let state = self.snapshot();
            if !state.running {
                deadline = None;
                self.reconfigured.wait().await;
                continue;
            }

            let at = *deadline.get_or_insert_with(|| Instant::now() + state.period);
            match select(Timer::at(at), self.reconfigured.wait()).await {
                Either::First(()) => {
                    deadline = Some(at + state.period);
                    trace!("periodic signal fired");
                    callback.on_expiry().await;
                }
                // Restart the period on any change, including a start of
                // an already running signal.
                Either::Second(()) => deadline = None,
            }
        }
    }
}

/// Fixed ordered table of periods walked by the cycle button.
///
/// The index is only advanced from the edge handler and always stays inside
/// the table.
pub struct PeriodCycle<M: RawMutex> {
    periods: &'static [Duration],
    index: Mutex<M, Cell<usize>>,
}

impl<M: RawMutex> PeriodCycle<M> {
    pub fn new(periods: &'static [Duration]) -> Result<Self, Error> {
        if periods.is_empty() || periods.iter().any(|period| period.as_ticks() == 0) {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            periods,
            index: Mutex::new(Cell::new(0)),
        })
    }

    pub fn index(&self) -> usize {
        self.index.lock(Cell::get)
    }

    pub fn current(&self) -> Duration {
        self.periods[self.index()]
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Moves to the next period, wrapping from the last back to the first.
    pub fn advance(&self) -> Duration {
        self.index.lock(|index| {
            let next = (index.get() + 1) % self.periods.len();
            index.set(next);
            self.periods[next]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type TestSignal = PeriodicSignal<CriticalSectionRawMutex>;

    struct Counter<'a>(&'a AtomicU32);

    impl TimerCallback for Counter<'_> {
        async fn on_expiry(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Runs the timer service next to `body` until `body` completes.
    fn serve<T>(signal: &TestSignal, fired: &AtomicU32, body: impl Future<Output = T>) -> T {
        let mut counter = Counter(fired);
        block_on(async {
            match select(signal.run(&mut counter), body).await {
                Either::First(never) => never,
                Either::Second(out) => out,
            }
        })
    }

    #[test]
    fn dormant_signal_never_fires() {
        let signal = TestSignal::new(Duration::from_millis(10));
        let fired = AtomicU32::new(0);
        serve(&signal, &fired, Timer::after_millis(60));
        assert!(!signal.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn running_signal_fires_once_per_period() {
        let signal = TestSignal::new(Duration::from_millis(25));
        let fired = AtomicU32::new(0);
        signal.start();
        serve(&signal, &fired, Timer::after_millis(140));
        let count = fired.load(Ordering::SeqCst);
        assert!((3..=6).contains(&count), "fired {count} times");
    }

    #[test]
    fn stop_takes_effect_before_next_firing() {
        let signal = TestSignal::new(Duration::from_millis(20));
        let fired = AtomicU32::new(0);
        signal.start();
        let at_stop = serve(&signal, &fired, async {
            Timer::after_millis(50).await;
            signal.stop();
            let at_stop = fired.load(Ordering::SeqCst);
            Timer::after_millis(80).await;
            at_stop
        });
        assert!(at_stop >= 1);
        assert_eq!(fired.load(Ordering::SeqCst), at_stop);
        assert!(!signal.is_running());
    }

    #[test]
    fn change_period_restarts_from_the_change() {
        let signal = TestSignal::new(Duration::from_millis(400));
        let fired = AtomicU32::new(0);
        signal.start();
        serve(&signal, &fired, async {
            Timer::after_millis(30).await;
            signal.change_period(Duration::from_millis(20));
            Timer::after_millis(90).await;
        });
        assert_eq!(signal.period(), Duration::from_millis(20));
        assert!(fired.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn change_period_starts_a_dormant_signal() {
        let signal = TestSignal::new(Duration::from_millis(400));
        signal.change_period(Duration::from_millis(15));
        assert!(signal.is_running());
        let fired = AtomicU32::new(0);
        serve(&signal, &fired, Timer::after_millis(60));
        assert!(fired.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn slow_callback_is_not_interrupted_by_stop() {
        struct Slow<'a>(&'a AtomicU32);
        impl TimerCallback for Slow<'_> {
            async fn on_expiry(&mut self) {
                Timer::after_millis(40).await;
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let signal = TestSignal::new(Duration::from_millis(10));
        let done = AtomicU32::new(0);
        let mut slow = Slow(&done);
        signal.start();
        block_on(async {
            let body = async {
                // First firing at ~10 ms, stop while it sleeps.
                Timer::after_millis(25).await;
                signal.stop();
                Timer::after_millis(80).await;
            };
            if let Either::First(never) = select(signal.run(&mut slow), body).await {
                never
            }
        });
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cycle_wraps_around_the_table() {
        static PERIODS: [Duration; 3] = [
            Duration::from_millis(1),
            Duration::from_millis(2),
            Duration::from_millis(3),
        ];
        let cycle: PeriodCycle<CriticalSectionRawMutex> = PeriodCycle::new(&PERIODS).unwrap();
        assert_eq!(cycle.current(), PERIODS[0]);
        assert_eq!(cycle.advance(), PERIODS[1]);
        assert_eq!(cycle.advance(), PERIODS[2]);
        assert_eq!(cycle.advance(), PERIODS[0]);
        assert_eq!(cycle.index(), 0);
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn cycle_rejects_unusable_tables() {
        static ZERO: [Duration; 2] = [Duration::from_millis(5), Duration::from_ticks(0)];
        assert!(matches!(
            PeriodCycle::<CriticalSectionRawMutex>::new(&[]),
            Err(Error::InvalidConfig)
        ));
        assert!(matches!(
            PeriodCycle::<CriticalSectionRawMutex>::new(&ZERO),
            Err(Error::InvalidConfig)
        ));
    }
}
