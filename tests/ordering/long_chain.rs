use serde_json::json ;
use sandbox_link::{ Body, Invocation, SandboxConfig, StartupMode };

use crate::manual_sandbox::{ sandbox, sandbox_with, TIMEOUT };

const LENGTH: usize = 10_000 ;

fn link( index: usize ) -> Invocation {
    let previous = format!( "m{}", index - 1 );
    Invocation::new( Body::new( move | context | json!( context[ previous.as_str() ].as_u64().unwrap_or_default() + 1 )))
        .produces( format!( "m{}", index ))
        .depends_on([ format!( "m{}", index - 1 ) ])
}

#[test]
fn ordering_long_chain() {

    let ( mut sandbox, _ ) = sandbox();

    // Dependants first, so each one loads only once the one before it has.
    for index in ( 1..LENGTH ).rev() {
        sandbox.invoke( link( index )).unwrap();
    }
    sandbox.invoke( Invocation::producer( "m0", | _ | json!( 0 ))).unwrap();

    sandbox.run().unwrap();

    let last = format!( "m{}", LENGTH - 1 );
    assert_eq!( sandbox.module( &last ), Some( &json!( LENGTH - 1 )));
    assert!( sandbox.is_idle() );

}

#[test]
fn ordering_long_chain_buffered() {

    let ( mut sandbox, _ ) = sandbox_with( SandboxConfig::default()
        .with_timeout( TIMEOUT )
        .with_startup( StartupMode::Buffered ));

    for index in ( 1..LENGTH ).rev() {
        sandbox.invoke( link( index )).unwrap();
    }
    sandbox.invoke( Invocation::producer( "m0", | _ | json!( 0 ))).unwrap();

    sandbox.startup().unwrap();

    let last = format!( "m{}", LENGTH - 1 );
    assert!( sandbox.is_available( &last ));
    assert_eq!( sandbox.module( &last ), Some( &json!( LENGTH - 1 )));

}
