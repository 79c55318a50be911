//! Well-known commands and their builders.

use crate::protocol::envelope::MessageEnvelope;

/// Free text input/output. `args[0]` carries the payload.
pub const TEXT: &str = "text";
/// Session greeting; `{"get": true}` asks the server for its options.
pub const HELLO: &str = "hello";
/// Server reply carrying the negotiated option set.
pub const CLIENT_OPTIONS: &str = "client_options";

/// Option keys carried by `client_options`.
pub mod option_keys {
    pub const ENCODING: &str = "ENCODING";
    pub const NOCOLOR: &str = "NOCOLOR";
    pub const UTF8: &str = "UTF-8";
    pub const INPUTDEBUG: &str = "INPUTDEBUG";
}

/// `["text", [line], {}]`
pub fn text(line: impl Into<String>) -> MessageEnvelope {
    MessageEnvelope::new(TEXT).with_arg(line)
}

/// `["hello", [], {"get": true}]`
pub fn hello_get_options() -> MessageEnvelope {
    MessageEnvelope::new(HELLO).with_kwarg("get", true)
}
