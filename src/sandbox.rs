use std::collections::VecDeque ;
use serde_json::Value ;

use crate::barrier::StartupBarrier ;
use crate::clock::{ Clock, SystemClock };
use crate::config::SandboxConfig ;
use crate::error::SandboxError ;
use crate::registry::Registry ;
use crate::scheduler::Scheduler ;



/// A unit of deferred work, run against the sandbox that queued it.
pub(crate) type Task = Box<dyn FnOnce( &mut Sandbox )> ;

/// An order-independent module registry with its own scheduler.
///
/// Code declares what it produces and what it needs through
/// [`invoke`]( Self::invoke ); nothing runs until the host drives the sandbox
/// with [`run`]( Self::run ) (or [`startup`]( Self::startup ) in buffered mode). Every
/// invocation made before that point can see every other one, whatever order they
/// were made in.
///
/// A sandbox is single-threaded and owns all of its state; independent sandboxes
/// do not share anything.
pub struct Sandbox {
    pub(crate) config: SandboxConfig,
    pub(crate) registry: Registry,
    pub(crate) scheduler: Scheduler,
    pub(crate) barrier: StartupBarrier,
    /// Waiters released by a merge, not yet fired.
    pub(crate) released: VecDeque<Task>,
    pub(crate) draining: bool,
    faults: VecDeque<SandboxError>,
}

impl Default for Sandbox {
    fn default() -> Self { Self::new() }
}

impl Sandbox {

    /// Creates a sandbox with default settings on the system clock.
    pub fn new() -> Self { Self::with_config( SandboxConfig::default() )}

    pub fn with_config( config: SandboxConfig ) -> Self { Self::with_clock( config, SystemClock::new() )}

    /// Creates a sandbox whose timers run on `clock`.
    ///
    /// Pass a [`ManualClock`]( crate::ManualClock ) to make timeouts fire without
    /// actually waiting.
    pub fn with_clock( config: SandboxConfig, clock: impl Clock + 'static ) -> Self {
        Self {
            config,
            registry: Registry::default(),
            scheduler: Scheduler::new( Box::new( clock )),
            barrier: StartupBarrier::default(),
            released: VecDeque::new(),
            draining: false,
            faults: VecDeque::new(),
        }
    }

    /// Replaces the configuration.
    ///
    /// Applies to work deferred and watchers started from now on; anything
    /// already buffered stays buffered until [`startup`]( Self::startup ).
    pub fn configure( &mut self, config: SandboxConfig ) {
        tracing::debug!( timeout = ?config.timeout(), startup = %config.startup(), "sandbox.configure" );
        self.config = config ;
    }

    #[inline] pub fn config( &self ) -> &SandboxConfig { &self.config }

    /// Runs queued work until nothing is left, waiting on timers as needed.
    ///
    /// # Errors
    /// Returns the first resolution error that reached a body unable to handle it.
    /// Work still queued at that point stays queued; calling `run` again resumes it.
    pub fn run( &mut self ) -> Result<(), SandboxError> {
        loop {
            self.take_fault()?;
            let Some( task ) = self.scheduler.next_task() else { return Ok(()) };
            task( self );
        }
    }

    /// Runs work that is ready now, without waiting for any timer.
    ///
    /// # Errors
    /// Same as [`run`]( Self::run ).
    pub fn run_ready( &mut self ) -> Result<(), SandboxError> {
        loop {
            self.take_fault()?;
            let Some( task ) = self.scheduler.next_ready() else { return Ok(()) };
            task( self );
        }
    }

    /// Runs everything held back by the buffered startup barrier.
    ///
    /// Work buffered while this runs is run as well, so the buffer is empty
    /// afterwards. The module registry is left as is. Does nothing if nothing was
    /// buffered.
    ///
    /// Timers started during startup only fire once the host calls [`run`]( Self::run ).
    ///
    /// # Errors
    /// Same as [`run`]( Self::run ). Buffered work not yet run stays buffered.
    pub fn startup( &mut self ) -> Result<(), SandboxError> {
        tracing::debug!( buffered = self.barrier.len(), "sandbox.startup" );
        loop {
            self.take_fault()?;
            let Some( task ) = self.barrier.pop_front() else { return Ok(()) };
            task( self );
        }
    }

    /// Discards every module, queued task, timer, buffered invocation and pending
    /// fault, and restores the default configuration. The clock is kept.
    ///
    /// Must not be called from inside a body.
    pub fn reset( &mut self ) {
        tracing::debug!( "sandbox.reset" );
        self.registry.clear();
        self.scheduler.clear();
        self.barrier.clear();
        self.released.clear();
        self.draining = false ;
        self.faults.clear();
        self.config = SandboxConfig::default();
    }

    /// The merged value of `module`, if any producer has contributed yet.
    ///
    /// A module may have a value without being available while further
    /// producers are outstanding.
    pub fn module( &self, module: &str ) -> Option<&Value> { self.registry.value( module )}

    /// Whether `module` has a value and no outstanding producer.
    pub fn is_available( &self, module: &str ) -> bool { self.registry.is_available( module )}

    /// Registered module names nested under `module` by whole dot segments.
    pub fn children( &self, module: &str ) -> Vec<String> { self.registry.list_children( module )}

    /// Number of invocations waiting on [`startup`]( Self::startup ).
    pub fn buffered( &self ) -> usize { self.barrier.len() }

    /// Whether no task or timer is queued.
    pub fn is_idle( &self ) -> bool { self.scheduler.is_idle() }

    pub(crate) fn escalate( &mut self, error: SandboxError ) {
        tracing::error!( module = %error.module(), %error, "sandbox.fault" );
        self.faults.push_back( error );
    }

    fn take_fault( &mut self ) -> Result<(), SandboxError> {
        match self.faults.pop_front() {
            Some( fault ) => Err( fault ),
            None => Ok(()),
        }
    }

}

impl std::fmt::Debug for Sandbox {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Sandbox" )
            .field( "config", &self.config )
            .field( "registry", &self.registry )
            .field( "scheduler", &self.scheduler )
            .field( "barrier", &self.barrier )
            .field( "released", &self.released.len() )
            .field( "faults", &self.faults )
            .finish()
    }
}
