//! Monotonic time sources for the scheduler.
//!
//! Time is measured as a [`Duration`] since an arbitrary, clock-specific origin.
//! The scheduler only ever compares instants taken from the same clock.

use std::cell::Cell ;
use std::rc::Rc ;
use std::time::{ Duration, Instant };



/// A monotonic time source able to wait for a deadline.
///
/// [`Sandbox::run`]( crate::Sandbox::run ) calls [`sleep_until`]( Self::sleep_until ) when
/// nothing is ready to run and the next piece of work is a timer.
pub trait Clock {
    /// Time elapsed since this clock's origin. Never decreases.
    fn now( &self ) -> Duration ;

    /// Blocks until [`now`]( Self::now ) is at least `deadline`.
    fn sleep_until( &self, deadline: Duration );
}

/// Wall-clock backed [`Clock`] using [`Instant`].
#[derive( Debug, Clone, Copy )]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self { Self { origin: Instant::now() }}
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now( &self ) -> Duration { self.origin.elapsed() }

    fn sleep_until( &self, deadline: Duration ) {
        if let Some( remaining ) = deadline.checked_sub( self.now() ) {
            std::thread::sleep( remaining );
        }
    }
}

/// Virtual [`Clock`] that never blocks.
///
/// Sleeping jumps straight to the deadline, so timeouts fire as soon as nothing
/// else is left to run. Cloning yields a handle to the same time line, which lets
/// the host inspect or advance time from outside the [`Sandbox`]( crate::Sandbox ).
///
/// ```
/// use std::time::Duration ;
/// use sandbox_link::{ Clock, ManualClock };
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// clock.sleep_until( Duration::from_millis( 40 ));
/// assert_eq!( handle.now(), Duration::from_millis( 40 ));
/// ```
#[derive( Debug, Clone, Default )]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    /// Moves time forward by `step`.
    pub fn advance( &self, step: Duration ) {
        self.now.set( self.now.get() + step );
    }
}

impl Clock for ManualClock {
    fn now( &self ) -> Duration { self.now.get() }

    fn sleep_until( &self, deadline: Duration ) {
        if deadline > self.now.get() { self.now.set( deadline ); }
    }
}
