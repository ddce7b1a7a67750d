//! Single-threaded cooperative task queue.
//!
//! Two kinds of work are queued here:
//! - **ready tasks**, run in FIFO order on the next turn (the "after the current
//! 	synchronous burst" deferral used by the startup barrier),
//! - **timers**, run once their monotonic deadline has passed and nothing is ready.
//!
//! The scheduler never runs anything by itself; [`Sandbox`]( crate::Sandbox ) pops
//! tasks with [`Scheduler::next_task`] and runs them against itself.

use std::collections::{ BTreeMap, VecDeque };
use std::time::Duration ;

use crate::clock::Clock ;
use crate::sandbox::Task ;



/// Handle to a pending timer, used to cancel it.
///
/// Ordered by deadline first and creation order second, which is the order
/// timers fire in.
#[derive( Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub(crate) struct TimerId {
    deadline: Duration,
    seq: u64,
}

pub(crate) struct Scheduler {
    clock: Box<dyn Clock>,
    ready: VecDeque<Task>,
    timers: BTreeMap<TimerId, Task>,
    next_seq: u64,
}

impl Scheduler {

    pub fn new( clock: Box<dyn Clock> ) -> Self {
        Self { clock, ready: VecDeque::new(), timers: BTreeMap::new(), next_seq: 0 }
    }

    /// Queues `task` to run on the next turn, after everything already queued.
    pub fn schedule( &mut self, task: Task ) {
        self.ready.push_back( task );
        tracing::trace!( ready = self.ready.len(), "sandbox.scheduler.schedule" );
    }

    /// Queues `task` to run once `delay` has elapsed.
    ///
    /// A deadline past the end of the clock's range is never reached: `task` is
    /// dropped and `None` returned.
    pub fn set_timeout( &mut self, delay: Duration, task: Task ) -> Option<TimerId> {
        let Some( deadline ) = self.clock.now().checked_add( delay ) else {
            tracing::trace!( ?delay, "sandbox.scheduler.no_deadline" );
            return None ;
        };
        let id = TimerId { deadline, seq: self.next_seq };
        self.next_seq += 1 ;
        self.timers.insert( id, task );
        tracing::trace!( deadline = ?id.deadline, "sandbox.scheduler.set_timeout" );
        Some( id )
    }

    /// Cancels a timer. Cancelling a timer that already fired is a no-op.
    pub fn clear_timeout( &mut self, id: Option<TimerId> ) {
        let Some( id ) = id else { return };
        if self.timers.remove( &id ).is_some() {
            tracing::trace!( deadline = ?id.deadline, "sandbox.scheduler.clear_timeout" );
        }
    }

    /// Pops the next ready task without looking at timers.
    pub fn next_ready( &mut self ) -> Option<Task> {
        self.ready.pop_front()
    }

    /// Pops the next task to run.
    ///
    /// Ready tasks always come first. Otherwise the earliest timer is popped,
    /// waiting on the clock until its deadline. Returns `None` once both queues
    /// are empty.
    pub fn next_task( &mut self ) -> Option<Task> {
        if let Some( task ) = self.ready.pop_front() { return Some( task ); }
        let ( id, task ) = self.timers.pop_first()?;
        self.clock.sleep_until( id.deadline );
        Some( task )
    }

    /// Drops every queued task and timer. The clock is kept.
    pub fn clear( &mut self ) {
        self.ready.clear();
        self.timers.clear();
    }

    pub fn is_idle( &self ) -> bool { self.ready.is_empty() && self.timers.is_empty() }

}

impl std::fmt::Debug for Scheduler {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Scheduler" )
            .field( "now", &self.clock.now() )
            .field( "ready", &self.ready.len() )
            .field( "timers", &self.timers.keys().collect::<Vec<_>>() )
            .finish_non_exhaustive()
    }
}
