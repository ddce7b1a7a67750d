//! An order-independent module registry for building modular applications.
//!
//! Pieces of code declare which module they **produce** and which modules they
//! **depend on**, by name, in whatever order they happen to be loaded. `sandbox_link`
//! defers every piece until its dependencies are available, runs it, and merges what
//! it returns into the module it produces. Only the declared dependency edges decide
//! what runs when; registration order never does.
//!
//! # Core Concepts
//!
//! - [`Sandbox`]: Owns the module registry and a single-threaded scheduler. Nothing
//! 	runs until the host drives it with [`Sandbox::run`] (or [`Sandbox::startup`] in
//! 	buffered mode), so every invocation made in one burst can see every other one.
//!
//! - [`Invocation`]: A declaration of an optional produced module, zero or more
//! 	dependencies and a [`Body`].
//!
//! - [`Body`]: The code to run. [`Body::ErrorUnaware`] only ever sees a successful
//! 	resolution; [`Body::ErrorAware`] is also told when resolution fails.
//!
//! - [`Context`]: What a body sees of its dependencies. Values are laid out by the dot
//! 	segments of their names: a dependency on `db.pool` is found at
//! 	`context["db"]["pool"]`.
//!
//! - **Module**: A named value, a [`serde_json::Value`]. It may be produced by any
//! 	number of invocations; object contributions are merged field by field, later
//! 	ones winning. A module is **available** once it has a value and no producer
//! 	that declared it is still outstanding.
//!
//! - **Child module**: `db.pool` is a child of `db`. Depending on `db` also waits for
//! 	all of its children, and a `db` that nobody produces still resolves as long as
//! 	it has children. Nesting is by whole segments; `dbAdmin` is not a child of `db`.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell ;
//! use std::rc::Rc ;
//! use serde_json::json ;
//! use sandbox_link::{ Invocation, Sandbox };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sandbox = Sandbox::new();
//! let seen = Rc::new( RefCell::new( None ));
//!
//! // The consumer is declared first, yet still sees the producer declared after it.
//! let observed = Rc::clone( &seen );
//! sandbox.invoke( Invocation::consumer([ "db" ], move | context | {
//! 	*observed.borrow_mut() = Some( context["db"]["driver"].clone() );
//! }))?;
//! sandbox.invoke( Invocation::producer( "db", | _ | json!({ "driver": "pg" })))?;
//!
//! // Nothing has run yet.
//! assert!( seen.borrow().is_none() );
//!
//! sandbox.run()?;
//! assert_eq!( *seen.borrow(), Some( json!( "pg" )));
//! # Ok(())
//! # }
//! ```
//!
//! # Producing and Consuming at Once
//!
//! An invocation may produce one module while depending on others. Several
//! invocations may contribute to the same module; consumers only see it once all of
//! them have finished.
//!
//! ```
//! # use serde_json::json ;
//! # use sandbox_link::{ Body, Invocation, Sandbox };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sandbox = Sandbox::new();
//!
//! sandbox.invoke( Invocation::new( Body::new(| context | json!({
//! 	"url": format!( "{}/users", context["config"]["base"].as_str().unwrap_or_default() ),
//! }))).produces( "api" ).depends_on([ "config" ]))?;
//!
//! sandbox.invoke( Invocation::producer( "config", | _ | json!({ "base": "https://example.org" })))?;
//! sandbox.invoke( Invocation::producer( "config", | _ | json!({ "retries": 3 })))?;
//!
//! sandbox.run()?;
//! assert_eq!( sandbox.module( "config" ), Some( &json!({ "base": "https://example.org", "retries": 3 })));
//! assert_eq!( sandbox.module( "api" ), Some( &json!({ "url": "https://example.org/users" })));
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! A dependency that has no value, no producer and no children is reported as
//! [`SandboxError::MissingModule`]. A dependency that never becomes available (it is
//! part of a cycle, or its producers all failed) is reported as
//! [`SandboxError::Timeout`] once [`SandboxConfig::timeout`] has passed; that timeout
//! is the only way cycles are detected.
//!
//! An [`Body::ErrorAware`] body receives the error. For an [`Body::ErrorUnaware`] body
//! the error is escalated and returned from the [`Sandbox::run`] call.
//!
//! ```
//! # use sandbox_link::{ Body, Invocation, Sandbox, SandboxError };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sandbox = Sandbox::new();
//!
//! sandbox.invoke( Invocation::new( Body::error_aware(| resolution | {
//! 	assert!( matches!( resolution, Err( SandboxError::MissingModule { .. })));
//! })).depends_on([ "nowhere" ]))?;
//! sandbox.run()?;
//!
//! sandbox.invoke( Invocation::consumer([ "nowhere" ], | _ | {} ))?;
//! assert_eq!( sandbox.run(), Err( SandboxError::MissingModule { name: "nowhere".into() }));
//! # Ok(())
//! # }
//! ```
//!
//! # Timers and Clocks
//!
//! Timeouts run on a [`Clock`]. [`SystemClock`] waits in real time; [`ManualClock`]
//! jumps straight to the next deadline once nothing else is left to run, which keeps
//! hosts and tests deterministic.
//!
//! ```
//! # use std::time::Duration ;
//! # use std::rc::Rc ;
//! # use std::cell::Cell ;
//! # use sandbox_link::{ Body, Clock, Invocation, ManualClock, Sandbox, SandboxConfig, SandboxError };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = ManualClock::new();
//! let config = SandboxConfig::default().with_timeout( Duration::from_secs( 5 ));
//! let mut sandbox = Sandbox::with_clock( config, clock.clone() );
//!
//! // `a` and `b` wait on each other and can never load.
//! let timeouts = Rc::new( Cell::new( 0 ));
//! for ( module, dependency ) in [( "a", "b" ), ( "b", "a" )] {
//! 	let timeouts = Rc::clone( &timeouts );
//! 	sandbox.invoke( Invocation::new( Body::error_aware( move | resolution | {
//! 		if let Err( SandboxError::Timeout { .. }) = resolution { timeouts.set( timeouts.get() + 1 ); }
//! 	})).produces( module ).depends_on([ dependency ]))?;
//! }
//!
//! sandbox.run()?;
//! assert_eq!( timeouts.get(), 2 );
//! assert_eq!( clock.now(), Duration::from_secs( 5 ));
//! # Ok(())
//! # }
//! ```
//!
//! # Buffered Startup
//!
//! With [`StartupMode::Buffered`], invocations are held back until
//! [`Sandbox::startup`], letting a host finish every registration, including ones
//! made by code that is itself being registered, before anything resolves.
//!
//! ```
//! # use serde_json::json ;
//! # use sandbox_link::{ Invocation, Sandbox, SandboxConfig, StartupMode };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sandbox = Sandbox::with_config( SandboxConfig::default().with_startup( StartupMode::Buffered ));
//!
//! sandbox.invoke( Invocation::producer( "greeting", | _ | json!({ "hello": "world" })))?;
//! assert_eq!( sandbox.buffered(), 1 );
//!
//! sandbox.startup()?;
//! assert_eq!( sandbox.module( "greeting" ), Some( &json!({ "hello": "world" })));
//! # Ok(())
//! # }
//! ```

mod barrier ;
mod clock ;
mod config ;
mod context ;
mod dispatch ;
mod error ;
mod invocation ;
mod registry ;
mod sandbox ;
mod scheduler ;
mod watch ;

pub use clock::{ Clock, SystemClock, ManualClock };
pub use config::{ SandboxConfig, StartupMode, DEFAULT_TIMEOUT };
pub use context::Context ;
pub use error::SandboxError ;
pub use invocation::{ Invocation, Body, Contribution, UnawareFn, AwareFn };
pub use sandbox::Sandbox ;
