//! # Rendezvous Barrier
//!
//! A reusable barrier for a fixed number of workers that can be torn down when one of them
//! fails.
//!
//! `std::sync::Barrier` has the right shape but no way out: if one participant dies, the
//! others wait forever. Here a failing worker calls [`Rendezvous::abort`], every current and
//! future [`Rendezvous::wait`] returns [`Aborted`], and the run unwinds through ordinary
//! `Result` propagation.
//!
//! A barrier is a meeting point, not a lock: it guards no data and has no owner. The internal
//! mutex only protects the arrival counter.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Returned by [`Rendezvous::wait`] once the rendezvous has been aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

#[derive(Debug)]
struct State {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

/// Generation-counting barrier with abort support.
#[derive(Debug)]
pub struct Rendezvous {
    parties: usize,
    state: Mutex<State>,
    released: Condvar,
}

impl Rendezvous {
    /// Barrier for `parties` workers. A barrier for zero parties behaves like one for one.
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(State {
                arrived: 0,
                generation: 0,
                aborted: false,
            }),
            released: Condvar::new(),
        }
    }

    // the counter stays consistent even if a holder panicked
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until all parties have arrived.
    ///
    /// Returns `Ok(true)` for exactly one caller per generation (the last to arrive).
    pub fn wait(&self) -> Result<bool, Aborted> {
        let mut state = self.lock();
        if state.aborted {
            return Err(Aborted);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return Ok(true);
        }

        let generation = state.generation;
        while state.generation == generation && !state.aborted {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation == generation {
            // woken by abort before the generation completed
            return Err(Aborted);
        }
        Ok(false)
    }

    /// Release every waiter with [`Aborted`] and make all later waits fail.
    pub fn abort(&self) {
        let mut state = self.lock();
        state.aborted = true;
        self.released.notify_all();
    }

    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }
}

/// Aborts the rendezvous if dropped while the owning thread is panicking.
///
/// Held by each worker for the duration of its routine so a panic in one worker cannot leave
/// the others blocked.
pub struct AbortOnUnwind<'a>(pub &'a Rendezvous);

impl Drop for AbortOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_single_party_never_blocks() {
        let rendezvous = Rendezvous::new(1);
        for _ in 0..3 {
            assert_eq!(rendezvous.wait(), Ok(true));
        }
    }

    #[test]
    fn test_all_parties_released_together() {
        let parties = 6;
        let rendezvous = Rendezvous::new(parties);
        let before = AtomicUsize::new(0);
        let leaders = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..parties {
                s.spawn(|| {
                    for round in 1..=3 {
                        before.fetch_add(1, Ordering::SeqCst);
                        if rendezvous.wait().unwrap() {
                            leaders.fetch_add(1, Ordering::SeqCst);
                        }
                        // nobody passes round N before everyone reached it
                        assert!(before.load(Ordering::SeqCst) >= round * parties);
                        rendezvous.wait().unwrap();
                    }
                });
            }
        });

        assert_eq!(leaders.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_abort_releases_waiters() {
        let rendezvous = Rendezvous::new(3);

        thread::scope(|s| {
            let a = s.spawn(|| rendezvous.wait());
            let b = s.spawn(|| rendezvous.wait());
            // the third party never arrives
            while rendezvous.lock().arrived < 2 {
                thread::yield_now();
            }
            rendezvous.abort();
            assert_eq!(a.join().unwrap(), Err(Aborted));
            assert_eq!(b.join().unwrap(), Err(Aborted));
        });

        assert!(rendezvous.is_aborted());
        assert_eq!(rendezvous.wait(), Err(Aborted));
    }

    #[test]
    fn test_panicking_worker_aborts() {
        let rendezvous = Rendezvous::new(2);

        thread::scope(|s| {
            let waiter = s.spawn(|| rendezvous.wait());
            let panicker = s.spawn(|| {
                let _guard = AbortOnUnwind(&rendezvous);
                panic!("worker failure");
            });
            assert!(panicker.join().is_err());
            assert_eq!(waiter.join().unwrap(), Err(Aborted));
        });
    }
}
