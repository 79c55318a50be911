use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use mudbridge_core::error::Result;
use mudbridge_core::protocol::MessageEnvelope;

/// Subscriber for inbound envelopes of one or more commands.
pub trait Listener: Send + Sync {
    fn on_message(&self, env: &MessageEnvelope) -> Result<()>;
}

impl<F> Listener for F
where
    F: Fn(&MessageEnvelope) -> Result<()> + Send + Sync,
{
    fn on_message(&self, env: &MessageEnvelope) -> Result<()> {
        self(env)
    }
}

struct Registration {
    listener: Arc<dyn Listener>,
    command: String,
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Command name -> subscribers, in registration order.
///
/// There is no unregister: a registration lives as long as the registry.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `(listener, command)`. Registering the same pair again is a no-op
    /// and returns false.
    pub fn register(&mut self, listener: Arc<dyn Listener>, command: &str) -> bool {
        let exists = self
            .entries
            .iter()
            .any(|r| r.command == command && same_listener(&r.listener, &listener));
        if exists {
            return false;
        }
        self.entries.push(Registration {
            listener,
            command: command.to_owned(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn listeners_for(&self, command: &str) -> usize {
        self.entries.iter().filter(|r| r.command == command).count()
    }

    /// Deliver `env` to every listener registered for its command.
    ///
    /// A listener that fails (or panics) is logged and skipped; the remaining
    /// listeners still receive the envelope.
    pub fn dispatch(&self, env: &MessageEnvelope) -> DispatchReport {
        let mut report = DispatchReport::default();
        for r in self.entries.iter().filter(|r| r.command == env.command()) {
            match catch_unwind(AssertUnwindSafe(|| r.listener.on_message(env))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    tracing::warn!(command = %r.command, error = %e, code = e.code().as_str(), "listener failed");
                }
                Err(payload) => {
                    report.failed += 1;
                    tracing::warn!(command = %r.command, panic = %panic_message(payload.as_ref()), "listener panicked");
                }
            }
        }
        report
    }
}

// Compare data pointers only; vtable pointers are not unique per type.
fn same_listener(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else {
        "non-string panic payload"
    }
}
