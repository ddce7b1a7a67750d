//! Waiting for modules to become available.
//!
//! [`Sandbox::on_loaded`] watches a single module and is the only place a
//! dependency cycle is ever noticed: modules on a cycle never become available,
//! so each of their watchers times out on its own. [`Sandbox::on_ready`] folds
//! several watchers into one callback.

use std::cell::RefCell ;
use std::rc::Rc ;
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use pipe_trait::Pipe ;

use crate::error::SandboxError ;
use crate::registry::validate_name ;
use crate::sandbox::Sandbox ;



type Callback = Box<dyn FnOnce( &mut Sandbox, Result<(), SandboxError> )> ;

/// Shared between every watcher of one [`Sandbox::on_ready`] call.
struct ReadyState {
    remaining: usize,
    callback: Option<Callback>,
}

impl ReadyState {
    /// Records one watcher's outcome, handing back the callback once it is due.
    fn settle( &mut self, result: Result<(), SandboxError> ) -> Option<( Callback, Result<(), SandboxError> )> {
        match result {
            Err( err ) => self.callback.take().map(| callback | ( callback, Err( err ))),
            Ok(()) => {
                self.remaining = self.remaining.saturating_sub( 1 );
                match self.remaining {
                    0 => self.callback.take().map(| callback | ( callback, Ok(()) )),
                    _ => None,
                }
            },
        }
    }
}

impl Sandbox {

    /// Calls `callback` once `module` is available.
    ///
    /// If it already is, `callback` runs immediately. Otherwise a timer is started
    /// and `callback` runs with either `Ok` when the module becomes available or
    /// [`SandboxError::Timeout`] when the configured timeout elapses first, whichever
    /// comes first. It never runs twice.
    ///
    /// The watcher stays queued on the module after a timeout; if the module turns
    /// up later, the stale watcher does nothing. A timeout too large for the clock
    /// to ever reach means the watcher waits indefinitely.
    ///
    /// An invalid `module` name settles `callback` at once with
    /// [`SandboxError::InvalidModuleName`], without touching the registry.
    pub fn on_loaded(
        &mut self,
        module: &str,
        callback: impl FnOnce( &mut Sandbox, Result<(), SandboxError> ) + 'static,
    ) {

        if let Err( err ) = validate_name( module ) {
            callback( self, Err( err ));
            return ;
        }

        if self.registry.get_or_create( module ).is_available() {
            callback( self, Ok(()) );
            return ;
        }

        let slot: Rc<RefCell<Option<Callback>>> = Rc::new( RefCell::new( Some( Box::new( callback ))));
        let timeout = self.config.timeout();

        let timed_out = Rc::clone( &slot );
        let name = module.to_string();
        let timer = self.scheduler.set_timeout( timeout, Box::new( move | sandbox | {
            let Some( callback ) = timed_out.borrow_mut().take() else { return };
            tracing::warn!( module = %name, ?timeout, "sandbox.watch.timeout" );
            callback( sandbox, Err( SandboxError::Timeout { name, timeout }));
        }));

        self.registry.get_or_create( module ).waiters.push( Box::new( move | sandbox | {
            sandbox.scheduler.clear_timeout( timer );
            let Some( callback ) = slot.borrow_mut().take() else { return };
            callback( sandbox, Ok(()) );
        }));

    }

    /// Calls `callback` once every module in `modules` is available.
    ///
    /// Duplicate names are watched once. With no names, `callback` runs immediately.
    /// The first watcher to fail settles the call with its error; outcomes of the
    /// remaining watchers are then ignored. `callback` runs exactly once.
    ///
    /// If any name is invalid, `callback` gets [`SandboxError::InvalidModuleName`]
    /// straight away and nothing is watched.
    pub fn on_ready(
        &mut self,
        modules: impl IntoIterator<Item = impl Into<String>>,
        callback: impl FnOnce( &mut Sandbox, Result<(), SandboxError> ) + 'static,
    ) {

        let modules = modules.into_iter()
            .map( Into::into )
            .unique()
            .collect::<Vec<String>>();
        let remaining = modules.len();

        if let Err( err ) = modules.iter().try_for_each(| module | validate_name( module )) {
            callback( self, Err( err ));
            return ;
        }

        match modules.pipe( NEVec::try_from_vec ) {
            None => callback( self, Ok(()) ),
            Some( modules ) => self.watch_all( modules, ReadyState { remaining, callback: Some( Box::new( callback )) }),
        }

    }

    fn watch_all( &mut self, modules: NEVec<String>, state: ReadyState ) {
        let state = Rc::new( RefCell::new( state ));
        for module in modules {
            let state = Rc::clone( &state );
            self.on_loaded( &module, move | sandbox, result | {
                let settled = state.borrow_mut().settle( result );
                if let Some(( callback, result )) = settled { callback( sandbox, result ); }
            });
        }
    }

}
