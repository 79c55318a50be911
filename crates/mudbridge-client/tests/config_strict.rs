#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use mudbridge_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  host: "localhost"
  prot: 4008 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.endpoint(), "ws://localhost:4008");
    assert!(cfg.session.auto_connect);
    assert_eq!(cfg.session.max_outbound_queue, 256);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  host: "mud.example.org"
  port: 4002
session:
  connect_timeout_ms: 2000
  handshake_timeout_ms: 5000
  tick_interval_ms: 100
  auto_connect: false
  max_outbound_queue: 16
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.endpoint(), "ws://mud.example.org:4002");
    assert_eq!(cfg.session.connect_timeout().as_millis(), 2000);
    assert!(!cfg.session.auto_connect);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn host_must_be_bare() {
    let bad = r#"
version: 1
server:
  host: "ws://localhost"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn out_of_range_values() {
    for bad in [
        "version: 1\nserver: { port: 0 }\n",
        "version: 1\nsession: { connect_timeout_ms: 10 }\n",
        "version: 1\nsession: { handshake_timeout_ms: 999999 }\n",
        "version: 1\nsession: { tick_interval_ms: 0 }\n",
        "version: 1\nsession: { max_outbound_queue: 0 }\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "CONFIG", "config={bad}");
    }
}
