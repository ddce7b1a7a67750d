//! The read-only view a body gets of its dependencies.

use std::ops::Index ;
use serde_json::{ Map, Value };



/// Dependency values laid out by the dot segments of their module names.
///
/// A dependency on `db` appears as `context["db"]`; a dependency on `db.pool`
/// appears as `context["db"]["pool"]`. When both a parent and its children are
/// present, the children are written into the parent's object, overlaying any
/// field of the same name.
///
/// Values are copies; nothing a body does to its context reaches the registry.
#[derive( Debug, Clone, Default, PartialEq )]
pub struct Context {
    root: Map<String, Value>,
}

static NULL: Value = Value::Null ;

impl Context {

    /// Builds a context from `(module name, value)` pairs.
    ///
    /// Shallower names are written first so a parent never overwrites its children.
    /// A non-object value sitting on the path to a child is replaced by an object.
    pub(crate) fn assemble<'a>( entries: impl IntoIterator<Item = ( &'a str, Value )> ) -> Self {
        let mut entries = entries.into_iter().collect::<Vec<_>>();
        entries.sort_by_key(|( name, _ )| name.split( '.' ).count() );
        let mut root = Map::new();
        entries.into_iter().for_each(|( name, value )| insert_path( &mut root, name, value ));
        Self { root }
    }

    /// Looks up a dot-separated path, e.g. `"db.pool.size"`.
    pub fn get( &self, path: &str ) -> Option<&Value> {
        let mut segments = path.split( '.' );
        let first = self.root.get( segments.next()? )?;
        segments.try_fold( first, | value, segment | value.get( segment ))
    }

    /// Top-level entries, one per root segment of the dependency names.
    pub fn as_map( &self ) -> &Map<String, Value> { &self.root }

    pub fn is_empty( &self ) -> bool { self.root.is_empty() }

    pub fn into_value( self ) -> Value { Value::Object( self.root ) }

}

impl Index<&str> for Context {
    type Output = Value ;

    /// Indexes the top level only, returning `Null` for absent keys like [`Value`] does.
    fn index( &self, key: &str ) -> &Value {
        self.root.get( key ).unwrap_or( &NULL )
    }
}

fn insert_path( map: &mut Map<String, Value>, path: &str, value: Value ) {
    match path.split_once( '.' ) {
        None => { map.insert( path.to_string(), value ); },
        Some(( head, rest )) => {
            let slot = map.entry( head ).or_insert_with(|| Value::Object( Map::new() ));
            if !slot.is_object() { *slot = Value::Object( Map::new() ); }
            if let Value::Object( child ) = slot { insert_path( child, rest, value ); }
        },
    }
}
