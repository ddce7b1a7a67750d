use std::time::Duration ;
use serde_json::json ;
use sandbox_link::{ Clock, Invocation, SandboxConfig, SandboxError };

use crate::probe::Probe ;
use crate::manual_sandbox::{ sandbox, TIMEOUT };

#[test]
fn on_loaded_available_runs_immediately() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<Result<(), SandboxError>>::new();

    sandbox.invoke( Invocation::producer( "db", | _ | json!( 1 ))).unwrap();
    sandbox.run().unwrap();

    let observed = probe.clone();
    sandbox.on_loaded( "db", move | _, result | observed.record( result ));

    assert_eq!( probe.only(), Ok(()) );
    assert!( sandbox.is_idle() );

}

#[test]
fn on_loaded_waits_for_every_producer() {

    let ( mut sandbox, clock ) = sandbox();
    let probe = Probe::<Option<serde_json::Value>>::new();

    sandbox.invoke( Invocation::producer( "db", | _ | json!({ "a": 1 }))).unwrap();
    sandbox.invoke( Invocation::producer( "db", | _ | json!({ "b": 2 }))).unwrap();

    let observed = probe.clone();
    sandbox.on_loaded( "db", move | sandbox, result | {
        assert_eq!( result, Ok(()) );
        observed.record( sandbox.module( "db" ).cloned() );
    });

    sandbox.run().unwrap();
    assert_eq!( probe.only(), Some( json!({ "a": 1, "b": 2 })));
    assert_eq!( clock.now(), Duration::ZERO );

}

#[test]
fn on_loaded_timeout_carries_name_and_duration() {

    let ( mut sandbox, clock ) = sandbox();
    let probe = Probe::<Result<(), SandboxError>>::new();

    let observed = probe.clone();
    sandbox.on_loaded( "nothing", move | _, result | observed.record( result ));

    sandbox.run().unwrap();
    let error = probe.only().unwrap_err();
    assert_eq!( error, SandboxError::Timeout { name: "nothing".into(), timeout: TIMEOUT });
    assert_eq!( error.to_string(), "Module 'nothing' has not loaded within 100ms, check for missing modules or circular dependencies" );
    assert_eq!( clock.now(), TIMEOUT );

}

#[test]
fn on_loaded_timeout_read_when_watching() {

    let ( mut sandbox, clock ) = sandbox();
    let probe = Probe::<SandboxError>::new();

    let observed = probe.clone();
    sandbox.on_loaded( "short", move | _, result | if let Err( err ) = result { observed.record( err ) });

    let long = Duration::from_millis( 300 );
    sandbox.configure( SandboxConfig::default().with_timeout( long ));

    let observed = probe.clone();
    sandbox.on_loaded( "long", move | _, result | if let Err( err ) = result { observed.record( err ) });

    sandbox.run().unwrap();
    assert_eq!( probe.all(), [
        SandboxError::Timeout { name: "short".into(), timeout: TIMEOUT },
        SandboxError::Timeout { name: "long".into(), timeout: long },
    ]);
    assert_eq!( clock.now(), long );

}

#[test]
fn on_loaded_partial_value_is_not_available() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<Result<(), SandboxError>>::new();

    sandbox.invoke( Invocation::producer( "db", | _ | json!( 1 ))).unwrap();
    sandbox.invoke( Invocation::producer( "db", | _ | json!( 2 )).depends_on([ "db.never" ])).unwrap();
    sandbox.invoke( Invocation::producer( "db.never", | _ | {} ).depends_on([ "db.never" ])).unwrap();

    let observed = probe.clone();
    sandbox.on_loaded( "db", move | _, result | observed.record( result ));

    sandbox.run_ready().unwrap();
    assert_eq!( sandbox.module( "db" ), Some( &json!( 1 )));
    assert!( !sandbox.is_available( "db" ));
    assert_fired!( probe, 0 );

}

#[test]
fn on_loaded_unbounded_timeout() {

    let ( mut sandbox, clock ) = sandbox();
    clock.advance( Duration::from_millis( 1 ));
    sandbox.configure( SandboxConfig::default().with_timeout( Duration::MAX ));

    let probe = Probe::<serde_json::Value>::new();
    let observed = probe.clone();
    sandbox.invoke( Invocation::consumer([ "db" ], move | context | observed.record( context["db"].clone() ))).unwrap();
    sandbox.invoke( Invocation::producer( "db", | _ | json!({ "driver": "pg" }))).unwrap();

    sandbox.run().unwrap();
    assert_eq!( probe.only(), json!({ "driver": "pg" }));

}

#[test]
fn on_loaded_unbounded_timeout_never_fires() {

    let ( mut sandbox, clock ) = sandbox();
    clock.advance( Duration::from_millis( 1 ));
    sandbox.configure( SandboxConfig::default().with_timeout( Duration::MAX ));

    let probe = Probe::<Result<(), SandboxError>>::new();
    let observed = probe.clone();
    sandbox.on_loaded( "nothing", move | _, result | observed.record( result ));

    sandbox.run().unwrap();
    assert_fired!( probe, 0 );
    assert!( sandbox.is_idle() );
    assert_eq!( clock.now(), Duration::from_millis( 1 ));

    // The watcher is still there and fires once the module turns up.
    sandbox.invoke( Invocation::producer( "nothing", | _ | json!( "after all" ))).unwrap();
    sandbox.run().unwrap();
    assert_eq!( probe.only(), Ok(()) );

}
