//! Invocation declarations.
//!
//! An [`Invocation`] bundles the three things a call into the [`Sandbox`]( crate::Sandbox )
//! may carry: the module it produces (optional), the modules it depends on (possibly
//! none) and the [`Body`] to run once those dependencies are available.

use serde_json::Value ;

use crate::context::Context ;
use crate::error::SandboxError ;



/// A body that only ever sees a successful resolution.
pub type UnawareFn = Box<dyn FnOnce( &Context ) -> Contribution> ;

/// A body that is also told when resolution fails.
pub type AwareFn = Box<dyn FnOnce( Result<&Context, &SandboxError> ) -> Contribution> ;

/// The code run by an [`Invocation`], tagged with whether it handles resolution errors.
///
/// Bodies are `FnOnce`: each one runs at most once, through exactly one path.
pub enum Body {
    /// Receives the context on success. If resolution fails there is nobody to
    /// tell, so the error is escalated out of the [`Sandbox`]( crate::Sandbox ).
    ErrorUnaware( UnawareFn ),
    /// Receives `Ok( context )` on success or `Err( error )` if resolution fails.
    /// The return value is discarded on failure.
    ErrorAware( AwareFn ),
}

impl Body {

    /// Wraps a body that does not handle resolution errors.
    pub fn new<R: Into<Contribution>>( body: impl FnOnce( &Context ) -> R + 'static ) -> Self {
        Self::ErrorUnaware( Box::new( move | context | body( context ).into() ))
    }

    /// Wraps a body that handles resolution errors itself.
    pub fn error_aware<R: Into<Contribution>>(
        body: impl FnOnce( Result<&Context, &SandboxError> ) -> R + 'static,
    ) -> Self {
        Self::ErrorAware( Box::new( move | resolution | body( resolution ).into() ))
    }

    pub fn handles_errors( &self ) -> bool { matches!( self, Self::ErrorAware( _ )) }

}

impl std::fmt::Debug for Body {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        match self {
            Self::ErrorUnaware( _ ) => f.write_str( "ErrorUnaware(<closure>)" ),
            Self::ErrorAware( _ ) => f.write_str( "ErrorAware(<closure>)" ),
        }
    }
}

/// What a body hands back to be merged into the module it produces.
///
/// `()` and [`Value::Null`] contribute nothing; any other [`Value`] is merged.
/// The contribution of a body that produces no module is dropped.
#[derive( Debug, Clone, Default, PartialEq )]
pub struct Contribution( Option<Value> );

impl Contribution {
    pub fn none() -> Self { Self( None ) }
    pub fn into_value( self ) -> Option<Value> { self.0 }
}

impl From<()> for Contribution {
    fn from(_: () ) -> Self { Self( None ) }
}

impl From<Value> for Contribution {
    fn from( value: Value ) -> Self {
        match value {
            Value::Null => Self( None ),
            value => Self( Some( value )),
        }
    }
}

impl From<Option<Value>> for Contribution {
    fn from( value: Option<Value> ) -> Self { value.map_or_else( Self::none, Self::from )}
}

/// A declaration of what a piece of code produces and consumes.
///
/// # Example
///
/// ```
/// use serde_json::json ;
/// use sandbox_link::{ Body, Invocation };
///
/// // Produces `db.pool`, needs `config` first.
/// let invocation = Invocation::new( Body::new(| context | json!({ "size": context["config"]["pool_size"] })))
/// 	.produces( "db.pool" )
/// 	.depends_on([ "config" ]);
///
/// assert_eq!( invocation.module(), Some( "db.pool" ));
/// assert_eq!( invocation.dependencies(), [ "config".to_string() ]);
/// ```
#[derive( Debug )]
#[must_use = "pass the invocation to Sandbox::invoke"]
pub struct Invocation {
    pub(crate) produces: Option<String>,
    pub(crate) dependencies: Vec<String>,
    pub(crate) body: Body,
}

impl Invocation {

    /// Creates an invocation that neither produces nor depends on anything.
    pub fn new( body: Body ) -> Self {
        Self { produces: None, dependencies: Vec::with_capacity( 0 ), body }
    }

    /// Shorthand for an invocation producing `module` from `body`.
    pub fn producer<R: Into<Contribution>>(
        module: impl Into<String>,
        body: impl FnOnce( &Context ) -> R + 'static,
    ) -> Self {
        Self::new( Body::new( body )).produces( module )
    }

    /// Shorthand for an invocation consuming `dependencies` in `body`.
    pub fn consumer<R: Into<Contribution>>(
        dependencies: impl IntoIterator<Item = impl Into<String>>,
        body: impl FnOnce( &Context ) -> R + 'static,
    ) -> Self {
        Self::new( Body::new( body )).depends_on( dependencies )
    }

    /// Names the module this invocation contributes to.
    pub fn produces( mut self, module: impl Into<String> ) -> Self {
        self.produces = Some( module.into() );
        self
    }

    /// Appends to the modules this invocation waits for.
    pub fn depends_on( mut self, dependencies: impl IntoIterator<Item = impl Into<String>> ) -> Self {
        self.dependencies.extend( dependencies.into_iter().map( Into::into ));
        self
    }

    pub fn module( &self ) -> Option<&str> { self.produces.as_deref() }

    pub fn dependencies( &self ) -> &[String] { &self.dependencies }

    pub fn body( &self ) -> &Body { &self.body }

}
