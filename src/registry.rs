//! Module records and the merge/availability bookkeeping.
//!
//! A module is **available** once some producer has contributed a value and no
//! producer that reserved the name is still outstanding. Waiters queued on a
//! record are handed back to the caller exactly once, on the transition to
//! available, in the order they were queued.

use std::collections::BTreeMap ;
use std::ops::Bound ;
use serde_json::Value ;

use crate::error::SandboxError ;
use crate::sandbox::Task ;



#[derive( Default )]
pub(crate) struct ModuleRecord {
    /// Merged contributions, absent until the first one lands.
    pub value: Option<Value>,
    /// Producers that reserved this name and have not finished yet.
    pub pending_producers: usize,
    /// Fired once on the transition to available.
    pub waiters: Vec<Task>,
}

impl ModuleRecord {
    pub fn is_available( &self ) -> bool {
        self.value.is_some() && self.pending_producers == 0
    }
}

impl std::fmt::Debug for ModuleRecord {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "ModuleRecord" )
            .field( "value", &self.value )
            .field( "pending_producers", &self.pending_producers )
            .field( "waiters", &self.waiters.len() )
            .finish()
    }
}

/// Module records keyed by name.
///
/// Names are kept sorted so that every child of `name` (anything starting with
/// `name.`) sits in one contiguous range.
#[derive( Debug, Default )]
pub(crate) struct Registry {
    modules: BTreeMap<String, ModuleRecord>,
}

impl Registry {

    pub fn get_or_create( &mut self, name: &str ) -> &mut ModuleRecord {
        self.modules.entry( name.to_string() ).or_default()
    }

    pub fn reserve_producer( &mut self, name: &str ) {
        let record = self.get_or_create( name );
        record.pending_producers += 1 ;
        tracing::debug!( module = %name, pending = record.pending_producers, "sandbox.registry.reserve" );
    }

    /// Folds `contribution` into the module and releases one producer reservation.
    ///
    /// Object contributions are merged field by field into an object value, later
    /// fields winning. Any other combination replaces the value outright. A `None`
    /// contribution only releases the reservation.
    ///
    /// Returns the waiters to fire if the module just became available.
    #[must_use = "returned waiters have to be fired"]
    pub fn merge( &mut self, name: &str, contribution: Option<Value> ) -> Vec<Task> {

        let record = self.get_or_create( name );
        let was_available = record.is_available();

        match ( &mut record.value, contribution ) {
            ( _, None ) => {},
            ( Some( Value::Object( fields )), Some( Value::Object( extension ))) => fields.extend( extension ),
            ( value, Some( contribution )) => *value = Some( contribution ),
        }

        debug_assert!( record.pending_producers > 0, "merge into '{}' without a reserved producer", name );
        record.pending_producers = record.pending_producers.saturating_sub( 1 );
        tracing::debug!( module = %name, pending = record.pending_producers, "sandbox.registry.merge" );

        match !was_available && record.is_available() {
            true => {
                tracing::debug!( module = %name, waiters = record.waiters.len(), "sandbox.registry.available" );
                std::mem::take( &mut record.waiters )
            },
            false => Vec::with_capacity( 0 ),
        }

    }

    /// Every registered name nested under `name`, in lexical order.
    ///
    /// Nesting is by whole dot-separated segments: `db.pool` is a child of `db`,
    /// `dbAdmin` is not.
    pub fn list_children( &self, name: &str ) -> Vec<String> {
        let prefix = format!( "{}.", name );
        self.modules
            .range::<str, _>(( Bound::Excluded( prefix.as_str() ), Bound::Unbounded ))
            .map(|( child, _ )| child )
            .take_while(| child | child.starts_with( &prefix ))
            .cloned()
            .collect()
    }

    pub fn value( &self, name: &str ) -> Option<&Value> {
        self.modules.get( name ).and_then(| record | record.value.as_ref() )
    }

    pub fn is_available( &self, name: &str ) -> bool {
        self.modules.get( name ).is_some_and( ModuleRecord::is_available )
    }

    pub fn clear( &mut self ) {
        self.modules.clear();
    }

}

/// Rejects names that are empty or have an empty dot segment.
pub(crate) fn validate_name( name: &str ) -> Result<(), SandboxError> {
    match name.split( '.' ).any( str::is_empty ) {
        true => Err( SandboxError::InvalidModuleName { name: name.to_string() }),
        false => Ok(()),
    }
}
