//! RECEIVE (incoming SMS) notifications
//!
//! Wire form: `RECEIVE:key:value;key:value;...`. Keys are `id`, `password`,
//! `srcnum` and `msg`; unknown keys and fields that are not exactly one
//! `key:value` pair are skipped.

use super::RECEIVE_PREFIX;
use crate::error::{GoipError, Result};

/// SMS delivery notification reported by a device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveMessage {
    /// Device identifier
    pub id: String,
    /// Shared secret configured on the device (not verified)
    pub password: String,
    /// Originating phone number
    pub source_number: String,
    /// SMS text
    pub message_body: String,
    /// Transport address the datagram came from
    pub remote_addr: String,
}

impl ReceiveMessage {
    /// Parse a raw RECEIVE datagram.
    ///
    /// Fails only when the `RECEIVE:` marker is missing. Every field after it
    /// is applied independently; absent keys leave empty strings.
    pub fn parse(raw: &str, remote_addr: &str) -> Result<Self> {
        let (_, data) = raw
            .split_once(RECEIVE_PREFIX)
            .ok_or_else(|| GoipError::format("invalid message format"))?;

        let mut message = ReceiveMessage {
            remote_addr: remote_addr.to_string(),
            ..Default::default()
        };

        for field in data.split(';') {
            let mut parts = field.split(':');
            let (key, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => (key.trim(), value.trim()),
                _ => continue,
            };

            match key {
                "id" => message.id = value.to_string(),
                "password" => message.password = value.to_string(),
                "srcnum" => message.source_number = value.to_string(),
                "msg" => message.message_body = value.to_string(),
                _ => {}
            }
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_message() {
        let msg = ReceiveMessage::parse(
            "RECEIVE:id:42;password:secret;srcnum:15551234567;msg:Hello World",
            "1.2.3.4:5000",
        )
        .unwrap();

        assert_eq!(
            msg,
            ReceiveMessage {
                id: "42".to_string(),
                password: "secret".to_string(),
                source_number: "15551234567".to_string(),
                message_body: "Hello World".to_string(),
                remote_addr: "1.2.3.4:5000".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_field_is_skipped() {
        let msg = ReceiveMessage::parse("RECEIVE:id:42;badfield;msg:Hi", "1.2.3.4:5000").unwrap();
        assert_eq!(msg.id, "42");
        assert_eq!(msg.password, "");
        assert_eq!(msg.source_number, "");
        assert_eq!(msg.message_body, "Hi");
        assert_eq!(msg.remote_addr, "1.2.3.4:5000");
    }

    #[test]
    fn test_field_with_extra_colon_is_skipped() {
        let msg =
            ReceiveMessage::parse("RECEIVE:id:7;msg:time is 12:30;srcnum:555", "h:1").unwrap();
        assert_eq!(msg.id, "7");
        assert_eq!(msg.message_body, "");
        assert_eq!(msg.source_number, "555");
    }

    #[test]
    fn test_missing_marker_fails() {
        let err = ReceiveMessage::parse("RECEIVEX:id:1", "1.2.3.4:5000").unwrap_err();
        assert!(matches!(err, GoipError::Format(_)));
        assert_eq!(err.to_string(), "invalid message format");
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let a = ReceiveMessage::parse("RECEIVE:id:1;password:pw;srcnum:100;msg:yo", "x").unwrap();
        let b = ReceiveMessage::parse("RECEIVE:msg:yo;srcnum:100;id:1;password:pw", "x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let msg = ReceiveMessage::parse("RECEIVE: id : 9 ; msg :  hi there \n", "x").unwrap();
        assert_eq!(msg.id, "9");
        assert_eq!(msg.message_body, "hi there");
    }

    #[test]
    fn test_unknown_and_miscased_keys_are_ignored() {
        let msg = ReceiveMessage::parse("RECEIVE:ID:1;foo:bar;id:2", "x").unwrap();
        assert_eq!(
            msg,
            ReceiveMessage {
                id: "2".into(),
                remote_addr: "x".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_body_yields_defaults() {
        let msg = ReceiveMessage::parse("RECEIVE:", "1.2.3.4:5000").unwrap();
        assert_eq!(msg.id, "");
        assert_eq!(msg.message_body, "");
        assert_eq!(msg.remote_addr, "1.2.3.4:5000");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let msg = ReceiveMessage::parse("RECEIVE:msg:first;msg:second", "x").unwrap();
        assert_eq!(msg.message_body, "second");
    }
}
