use std::collections::VecDeque ;

use crate::config::StartupMode ;
use crate::scheduler::Scheduler ;
use crate::sandbox::Task ;



/// Holds deferred invocation work back until the host says go.
///
/// In [`StartupMode::Immediate`] work goes straight onto the scheduler's ready
/// queue. In [`StartupMode::Buffered`] it is kept here, in order, until popped.
#[derive( Default )]
pub(crate) struct StartupBarrier {
    buffered: VecDeque<Task>,
}

impl StartupBarrier {

    pub fn defer( &mut self, mode: StartupMode, scheduler: &mut Scheduler, task: Task ) {
        match mode {
            StartupMode::Immediate => scheduler.schedule( task ),
            StartupMode::Buffered => {
                self.buffered.push_back( task );
                tracing::trace!( buffered = self.buffered.len(), "sandbox.barrier.buffer" );
            },
        }
    }

    pub fn pop_front( &mut self ) -> Option<Task> {
        self.buffered.pop_front()
    }

    pub fn len( &self ) -> usize { self.buffered.len() }

    pub fn clear( &mut self ) {
        self.buffered.clear();
    }

}

impl std::fmt::Debug for StartupBarrier {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "StartupBarrier" ).field( "buffered", &self.buffered.len() ).finish()
    }
}
