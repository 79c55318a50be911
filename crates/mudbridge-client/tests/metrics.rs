#![allow(clippy::unwrap_used)]

use mudbridge_client::obs::ClientMetrics;

#[test]
fn counters_are_keyed_by_label_set() {
    let m = ClientMetrics::new();
    m.frames_in.inc(&[("command", "text")]);
    m.frames_in.inc(&[("command", "text")]);
    m.frames_in.add(&[("command", "client_options")], 3);

    assert_eq!(m.frames_in.get(&[("command", "text")]), 2);
    assert_eq!(m.frames_in.get(&[("command", "hello")]), 0);
    assert_eq!(m.frames_in.total(), 5);
}

#[test]
fn render_uses_prometheus_text_format() {
    let m = ClientMetrics::new();
    m.decode_errors.inc(&[]);
    m.connects.inc(&[("result", "timeout")]);
    m.dropped_sends.inc(&[("command", "say \"hi\"")]);

    let out = m.render();
    assert!(out.contains("# TYPE mudbridge_decode_errors_total counter\n"));
    assert!(out.contains("mudbridge_decode_errors_total 1\n"));
    assert!(out.contains("mudbridge_connects_total{result=\"timeout\"} 1\n"));
    assert!(out.contains("mudbridge_dropped_sends_total{command=\"say \\\"hi\\\"\"} 1\n"));
}
