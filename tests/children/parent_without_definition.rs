use serde_json::{ json, Value };
use sandbox_link::{ Body, Invocation };

use crate::probe::Probe ;
use crate::manual_sandbox::sandbox ;

#[test]
fn children_parent_without_definition() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<Value>::new();

    sandbox.invoke( Invocation::producer( "module1.func", | _ | json!( "fn" ))).unwrap();
    sandbox.invoke( Invocation::producer( "module1.obj", | _ | json!({ "some": "obj" }))).unwrap();

    let observed = probe.clone();
    sandbox.invoke( Invocation::consumer([ "module1" ], move | context | observed.record( context["module1"].clone() ))).unwrap();
    sandbox.run().unwrap();

    assert_eq!( probe.only(), json!({ "func": "fn", "obj": { "some": "obj" }}));
    assert_eq!( sandbox.module( "module1" ), None );

}

#[test]
fn children_parent_without_definition_error_aware() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<Result<Value, String>>::new();

    let observed = probe.clone();
    sandbox.invoke( Invocation::new( Body::error_aware( move | resolution | observed.record(
        resolution.map(| context | context.clone().into_value() ).map_err( ToString::to_string )
    ))).depends_on([ "services" ])).unwrap();
    sandbox.invoke( Invocation::producer( "services.mail", | _ | json!({ "host": "smtp" }))).unwrap();

    sandbox.run().unwrap();
    assert_eq!( probe.only(), Ok( json!({ "services": { "mail": { "host": "smtp" }}})));

}

#[test]
fn children_grandchildren_only() {

    let ( mut sandbox, _ ) = sandbox();
    let probe = Probe::<Value>::new();

    sandbox.invoke( Invocation::producer( "a.b.c", | _ | json!( 1 ))).unwrap();

    let observed = probe.clone();
    sandbox.invoke( Invocation::consumer([ "a" ], move | context | observed.record( context.clone().into_value() ))).unwrap();
    sandbox.run().unwrap();

    assert_eq!( probe.only(), json!({ "a": { "b": { "c": 1 }}}));

}
