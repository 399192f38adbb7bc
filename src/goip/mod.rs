//! GoIP device text protocol
//!
//! GoIP GSM gateways talk to their server over UDP with short text lines.
//! Only two kinds are handled here:
//!
//! - `RECEIVE:id:..;password:..;srcnum:..;msg:..` — an SMS arrived on the device
//! - `req:<id>:...` — periodic keep-alive, answered with `reg:<id>;status:200;`
//!
//! Anything else is logged on receipt and otherwise ignored.

pub mod keepalive;
pub mod receive;

pub use keepalive::KeepAliveRequest;
pub use receive::ReceiveMessage;

/// Marker that opens an SMS delivery notification
pub const RECEIVE_PREFIX: &str = "RECEIVE:";

/// Marker that opens a keep-alive request
pub const KEEPALIVE_PREFIX: &str = "req";

/// Kind of an inbound datagram, decided by prefix alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Receive,
    KeepAlive,
    Unrecognized,
}

impl MessageKind {
    /// Case-sensitive prefix match; `RECEIVE:` is checked before `req`.
    pub fn classify(text: &str) -> Self {
        if text.starts_with(RECEIVE_PREFIX) {
            MessageKind::Receive
        } else if text.starts_with(KEEPALIVE_PREFIX) {
            MessageKind::KeepAlive
        } else {
            MessageKind::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_receive() {
        assert_eq!(
            MessageKind::classify("RECEIVE:id:42;msg:Hi"),
            MessageKind::Receive
        );
    }

    #[test]
    fn test_classify_keepalive() {
        assert_eq!(MessageKind::classify("req:42:online"), MessageKind::KeepAlive);
        assert_eq!(MessageKind::classify("req"), MessageKind::KeepAlive);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(MessageKind::classify("receive:id:1"), MessageKind::Unrecognized);
        assert_eq!(MessageKind::classify("REQ:1"), MessageKind::Unrecognized);
    }

    #[test]
    fn test_receive_marker_needs_colon() {
        assert_eq!(MessageKind::classify("RECEIVEX:id:1"), MessageKind::Unrecognized);
        assert_eq!(MessageKind::classify("RECEIVE"), MessageKind::Unrecognized);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(MessageKind::classify("hello world"), MessageKind::Unrecognized);
        assert_eq!(MessageKind::classify(""), MessageKind::Unrecognized);
        // Prefix must be at the very start
        assert_eq!(MessageKind::classify(" req:1"), MessageKind::Unrecognized);
    }
}
