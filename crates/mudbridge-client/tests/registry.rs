#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use mudbridge_client::dispatch::{Listener, ListenerRegistry};
use mudbridge_client::services::TextConsole;
use mudbridge_core::error::{BridgeError, Result};
use mudbridge_core::protocol::{commands, MessageEnvelope};

/// Records `name:command` for every delivery into a shared log.
struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Listener for Recorder {
    fn on_message(&self, env: &MessageEnvelope) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, env.command()));
        Ok(())
    }
}

fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Listener> {
    Arc::new(Recorder {
        name,
        log: Arc::clone(log),
    })
}

#[test]
fn duplicate_registration_dispatches_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = recorder("a", &log);

    let mut reg = ListenerRegistry::new();
    assert!(reg.register(Arc::clone(&a), "text"));
    assert!(!reg.register(Arc::clone(&a), "text"));
    assert_eq!(reg.len(), 1);

    let report = reg.dispatch(&commands::text("look"));
    assert_eq!(report.delivered, 1);
    assert_eq!(*log.lock().unwrap(), vec!["a:text"]);
}

#[test]
fn same_listener_on_two_commands_is_two_registrations() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = recorder("a", &log);

    let mut reg = ListenerRegistry::new();
    assert!(reg.register(Arc::clone(&a), "text"));
    assert!(reg.register(Arc::clone(&a), "prompt"));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.listeners_for("text"), 1);
}

#[test]
fn dispatch_is_selective_and_ordered() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut reg = ListenerRegistry::new();
    reg.register(recorder("first", &log), "text");
    reg.register(recorder("options", &log), "client_options");
    reg.register(recorder("second", &log), "text");

    let report = reg.dispatch(&commands::text("look"));
    assert_eq!(report.delivered, 2);
    assert_eq!(*log.lock().unwrap(), vec!["first:text", "second:text"]);

    let report = reg.dispatch(&MessageEnvelope::new("unknown"));
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 0);
}

#[test]
fn failing_listener_does_not_block_others() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut reg = ListenerRegistry::new();
    let failing: Arc<dyn Listener> =
        Arc::new(|_: &MessageEnvelope| -> Result<()> { Err(BridgeError::KwargMissing("x".into())) });
    let panicking: Arc<dyn Listener> =
        Arc::new(|_: &MessageEnvelope| -> Result<()> { panic!("listener bug") });
    reg.register(failing, "text");
    reg.register(panicking, "text");
    reg.register(recorder("after", &log), "text");

    let report = reg.dispatch(&commands::text("look"));
    assert_eq!(report.failed, 2);
    assert_eq!(report.delivered, 1);
    assert_eq!(*log.lock().unwrap(), vec!["after:text"]);
}

#[test]
fn console_prints_text_payload() {
    let console = Arc::new(TextConsole::new(Vec::new()));
    let mut reg = ListenerRegistry::new();
    reg.register(Arc::clone(&console) as Arc<dyn Listener>, commands::TEXT);

    reg.dispatch(&commands::text("You see a dusty room."));
    assert_eq!(console.contents(), "You see a dusty room.\n");

    // `text` without a payload is reported, not printed
    let report = reg.dispatch(&MessageEnvelope::new(commands::TEXT));
    assert_eq!(report.failed, 1);
    assert_eq!(console.contents(), "You see a dusty room.\n");
}
