use serde_json::json ;
use sandbox_link::{ Invocation, SandboxError };

use crate::probe::Probe ;
use crate::manual_sandbox::sandbox ;

#[test]
fn escalation_run_resumes() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<&'static str>::new();

    sandbox.invoke( Invocation::consumer([ "missing1" ], | _ | {} )).unwrap();
    sandbox.invoke( Invocation::consumer([ "missing2" ], | _ | {} )).unwrap();

    let observed = probe.clone();
    sandbox.invoke( Invocation::producer( "fine", move | _ | {
        observed.record( "fine" );
        json!( true )
    })).unwrap();

    assert_eq!( sandbox.run(), Err( SandboxError::MissingModule { name: "missing1".into() }));
    assert_fired!( probe, 0 );

    assert_eq!( sandbox.run(), Err( SandboxError::MissingModule { name: "missing2".into() }));
    assert_fired!( probe, 0 );

    sandbox.run().unwrap();
    assert_eq!( probe.only(), "fine" );
    assert!( sandbox.is_idle() );

}

#[test]
fn escalation_from_run_ready() {

    let ( mut sandbox, _ ) = sandbox();

    sandbox.invoke( Invocation::consumer([ "missing" ], | _ | {} )).unwrap();
    assert_eq!( sandbox.run_ready(), Err( SandboxError::MissingModule { name: "missing".into() }));
    sandbox.run_ready().unwrap();

}

#[test]
fn escalation_error_message() {

    let missing = SandboxError::MissingModule { name: "db".into() };
    assert_eq!( missing.to_string(), "Module 'db' does not exist" );

    let invalid = SandboxError::InvalidModuleName { name: "db..pool".into() };
    assert_eq!( invalid.module(), "db..pool" );

}
