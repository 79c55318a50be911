//! Envelope codec vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use mudbridge_core::protocol::{decode, encode, encode_for_wire, KwargValue, MessageEnvelope};

use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "text_look.json",
        "client_options.json",
        "nested_kwargs.json",
        "not_json.json",
        "two_elements.json",
        "four_elements.json",
        "arg_not_string.json",
        "kwargs_not_object.json",
        "empty_command.json",
        "object_frame.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.command(), ex["command"].as_str().unwrap(), "vector={}", v.description);
        let args: Vec<&str> = ex["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect();
        assert_eq!(env.args(), args.as_slice(), "vector={}", v.description);
        assert_eq!(
            serde_json::to_value(env.kwargs()).unwrap(),
            ex["kwargs"],
            "vector={}",
            v.description
        );

        // decoding what we encode gives the same envelope back
        let again = decode(&encode(&env).unwrap()).unwrap();
        assert_eq!(again, env, "vector={}", v.description);
    }
}

#[test]
fn decode_error_keeps_raw_frame() {
    let err = decode("not-json").unwrap_err();
    match err {
        mudbridge_core::BridgeError::ProtocolDecode { raw, .. } => assert_eq!(raw, "not-json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn encode_shape_is_three_element_array() {
    let env = MessageEnvelope::new("text").with_arg("look");
    assert_eq!(encode(&env).unwrap(), r#"["text",["look"],{}]"#);

    let hello = MessageEnvelope::new("hello").with_kwarg("get", true);
    assert_eq!(encode(&hello).unwrap(), r#"["hello",[],{"get":true}]"#);
}

#[test]
fn encode_rejects_empty_command() {
    let err = encode(&MessageEnvelope::default()).unwrap_err();
    assert_eq!(err.code().as_str(), "ENCODE");
}

#[test]
fn wire_encoding_strips_zero_width_space() {
    let env = MessageEnvelope::new("text").with_arg("lo\u{200B}ok\u{200B}");
    assert_eq!(encode_for_wire(&env).unwrap(), r#"["text",["look"],{}]"#);
    // the plain codec leaves payloads untouched
    assert!(encode(&env).unwrap().contains('\u{200B}'));
}

#[test]
fn args_keep_their_order() {
    let env = MessageEnvelope::new("say")
        .with_arg("c")
        .with_arg("a")
        .with_arg("b");
    let back = decode(&encode(&env).unwrap()).unwrap();
    assert_eq!(back.args(), ["c", "a", "b"]);
    assert_eq!(back.arg(1), Some("a"));
    assert_eq!(back.arg(3), None);
}

#[test]
fn incrementally_built_envelope_round_trips() {
    let mut env = MessageEnvelope::default();
    env.set_command("say");
    env.set_args(vec!["hello".into()]);
    env.push_arg("there");
    env.set_kwarg("loud", true);
    env.kwargs_mut().set("times", 2_i64);
    env.set_kwarg("loud", false);

    let text = encode(&env).unwrap();
    assert_eq!(text, r#"["say",["hello","there"],{"loud":false,"times":2}]"#);

    let back = decode(&text).unwrap();
    assert_eq!(back, env);
    assert_eq!(back.kwargs().raw("loud"), Some(&KwargValue::Bool(false)));
    assert_eq!(back.kwargs().raw("missing"), None);

    let keys: Vec<&str> = back.kwargs().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["loud", "times"]);
}
