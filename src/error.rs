use std::time::Duration ;
use thiserror::Error ;



/// Errors produced while resolving an invocation's dependencies.
///
/// Resolution errors are delivered to [`Body::ErrorAware`]( crate::Body::ErrorAware )
/// bodies. For [`Body::ErrorUnaware`]( crate::Body::ErrorUnaware ) bodies there is no one
/// to deliver them to, so they are escalated and returned from whichever of
/// [`Sandbox::run`]( crate::Sandbox::run ), [`Sandbox::run_ready`]( crate::Sandbox::run_ready )
/// or [`Sandbox::startup`]( crate::Sandbox::startup ) was driving work at the time.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum SandboxError {

    /// A declared dependency has no value, no pending producer and no children.
    #[error( "Module '{name}' does not exist" )]
    MissingModule { name: String },

    /// A module did not become available within the configured timeout.
    ///
    /// Either the module is never produced, or it takes part in a circular dependency.
    /// Cycles are only ever detected this way.
    #[error( "Module '{name}' has not loaded within {timeout:?}, check for missing modules or circular dependencies" )]
    Timeout { name: String, timeout: Duration },

    /// A module name is empty or contains an empty dot-separated segment.
    #[error( "Invalid module name: '{name}'" )]
    InvalidModuleName { name: String },

}

impl SandboxError {
    /// The module name the error is about.
    pub fn module( &self ) -> &str {
        match self {
            Self::MissingModule { name }
            | Self::Timeout { name, .. }
            | Self::InvalidModuleName { name } => name,
        }
    }
}
