//! Turning an [`Invocation`] into a resolved, executed and merged contribution.
//!
//! Per invocation:
//! 1. names are validated and a producer reserves its module, synchronously;
//! 2. the rest is deferred through the startup barrier;
//! 3. declared dependencies are checked and expanded with their children;
//! 4. the sandbox waits for all of them;
//! 5. the body runs on a [`Context`] and its contribution is merged.
//!
//! The reservation in step 1 is what makes registration order irrelevant: a
//! consumer resolving in step 3 sees every producer invoked in the same burst,
//! even the ones invoked after it.

use itertools::Itertools ;
use serde_json::Value ;

use crate::context::Context ;
use crate::error::SandboxError ;
use crate::invocation::{ Body, Invocation };
use crate::registry::validate_name ;
use crate::sandbox::{ Sandbox, Task };



impl Sandbox {

    /// Declares an invocation.
    ///
    /// Nothing runs here besides validation and, for a producer, reserving its
    /// module so that consumers cannot mistake it for missing. Resolution and the
    /// body run later, when the host drives the sandbox.
    ///
    /// # Errors
    /// Returns [`SandboxError::InvalidModuleName`] if the produced module or any
    /// dependency is empty or has an empty dot segment. Nothing is reserved or
    /// deferred in that case.
    pub fn invoke( &mut self, invocation: Invocation ) -> Result<(), SandboxError> {

        let Invocation { produces, dependencies, body } = invocation ;
        produces.iter().chain( &dependencies ).try_for_each(| name | validate_name( name ))?;

        if let Some( module ) = &produces {
            self.registry.reserve_producer( module );
        }
        tracing::trace!( module = ?produces, ?dependencies, handles_errors = body.handles_errors(), "sandbox.invoke" );

        let task: Task = Box::new( move | sandbox | sandbox.resolve( produces, dependencies, body ));
        self.barrier.defer( self.config.startup(), &mut self.scheduler, task );
        Ok(())

    }

    fn resolve( &mut self, produces: Option<String>, declared: Vec<String>, body: Body ) {

        let mut dependencies = Vec::with_capacity( declared.len() );

        for dependency in declared {
            let record = self.registry.get_or_create( &dependency );
            let expected = record.value.is_some() || record.pending_producers > 0 ;
            let children = self.registry.list_children( &dependency );

            match ( expected, children.is_empty() ) {
                ( true, _ ) => dependencies.push( dependency ),
                ( false, true ) => return self.fail( produces, body, SandboxError::MissingModule { name: dependency }),
                // A parent nobody produces still resolves through its children.
                ( false, false ) => tracing::debug!( module = %dependency, children = children.len(), "sandbox.dispatch.children_only" ),
            }
            dependencies.extend( children );
        }

        let watched = dependencies.clone();
        self.on_ready( watched, move | sandbox, result | match result {
            Ok(()) => sandbox.execute( produces, &dependencies, body ),
            Err( err ) => sandbox.fail( produces, body, err ),
        });

    }

    fn execute( &mut self, produces: Option<String>, dependencies: &[String], body: Body ) {

        let context = Context::assemble( dependencies.iter().unique().map(| name | (
            name.as_str(),
            self.registry.value( name ).cloned().unwrap_or( Value::Null ),
        )));

        let contribution = match body {
            Body::ErrorUnaware( body ) => body( &context ),
            Body::ErrorAware( body ) => body( Ok( &context )),
        };

        if let Some( module ) = produces {
            self.complete( &module, contribution.into_value() );
        }

    }

    fn fail( &mut self, produces: Option<String>, body: Body, error: SandboxError ) {

        tracing::debug!( module = ?produces, %error, "sandbox.dispatch.failed" );
        match body {
            Body::ErrorAware( body ) => { body( Err( &error )); },
            Body::ErrorUnaware( _ ) => self.escalate( error ),
        }

        // The failed producer contributes nothing but must not hold its module back.
        if let Some( module ) = produces {
            self.complete( &module, None );
        }

    }

    /// Merges a contribution and fires the waiters it releases.
    ///
    /// Waiters run from a worklist, never nested inside each other: a `complete`
    /// reached from a waiter only queues, and the outermost call drains in release
    /// order. Stack depth stays flat however long a chain of dependants is.
    fn complete( &mut self, module: &str, contribution: Option<Value> ) {
        let waiters = self.registry.merge( module, contribution );
        self.released.extend( waiters );
        if self.draining { return }

        self.draining = true ;
        while let Some( waiter ) = self.released.pop_front() { waiter( self ); }
        self.draining = false ;
    }

}
