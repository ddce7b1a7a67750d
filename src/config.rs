use std::time::Duration ;
use serde::{ Deserialize, Deserializer };



/// How long a load watcher waits before giving up, unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis( 100 );

/// When deferred invocation work is allowed to run.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize )]
#[serde( rename_all = "lowercase" )]
pub enum StartupMode {
    /// Each invocation resolves on the next scheduler turn.
    #[default] Immediate,
    /// Invocations accumulate until [`Sandbox::startup`]( crate::Sandbox::startup ) is called.
    Buffered,
}

impl std::fmt::Display for StartupMode {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

/// Settings of a [`Sandbox`]( crate::Sandbox ).
///
/// Can be deserialised from a host's own configuration, every field optional:
///
/// ```
/// # use std::time::Duration ;
/// # use sandbox_link::{ SandboxConfig, StartupMode };
/// let config: SandboxConfig = serde_json::from_str( r#"{ "timeout_ms": 250, "startup": "buffered" }"# ).unwrap();
/// assert_eq!( config, SandboxConfig::default()
/// 	.with_timeout( Duration::from_millis( 250 ))
/// 	.with_startup( StartupMode::Buffered ));
/// ```
#[derive( Debug, Clone, Copy, PartialEq, Eq, Deserialize )]
#[serde( default )]
pub struct SandboxConfig {
    /// Load watcher timeout.
    #[serde( rename = "timeout_ms", deserialize_with = "millis" )]
    timeout: Duration,
    /// Startup barrier mode.
    startup: StartupMode,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, startup: StartupMode::default() }
    }
}

impl SandboxConfig {

    /// Sets how long a load watcher waits for its module.
    ///
    /// Every member of a dependency cycle fails after this long, so it bounds
    /// how long a cycle can go unnoticed.
    pub fn with_timeout( mut self, timeout: Duration ) -> Self {
        self.timeout = timeout ;
        self
    }

    /// Sets the startup barrier mode.
    pub fn with_startup( mut self, startup: StartupMode ) -> Self {
        self.startup = startup ;
        self
    }

    #[inline] pub fn timeout( &self ) -> Duration { self.timeout }

    #[inline] pub fn startup( &self ) -> StartupMode { self.startup }

}

fn millis<'de, D: Deserializer<'de>>( deserializer: D ) -> Result<Duration, D::Error> {
    u64::deserialize( deserializer ).map( Duration::from_millis )
}
