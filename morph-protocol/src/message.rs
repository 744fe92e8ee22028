//! Request payloads and the action vocabulary.

use crate::error::ProtocolError;
use crate::frame::SEPARATOR;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::str::FromStr;

/// Transformations a morph server applies to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Uppercase,
    Lowercase,
    Reverse,
    Shuffle,
    Random,
}

impl Action {
    /// Every known action, in wire spelling order.
    pub const ALL: [Action; 5] = [
        Action::Uppercase,
        Action::Lowercase,
        Action::Reverse,
        Action::Shuffle,
        Action::Random,
    ];

    /// Wire spelling of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Uppercase => "uppercase",
            Action::Lowercase => "lowercase",
            Action::Reverse => "reverse",
            Action::Shuffle => "shuffle",
            Action::Random => "random",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uppercase" => Ok(Action::Uppercase),
            "lowercase" => Ok(Action::Lowercase),
            "reverse" => Ok(Action::Reverse),
            "shuffle" => Ok(Action::Shuffle),
            "random" => Ok(Action::Random),
            _ => Err(ProtocolError::UnknownAction(s.to_string())),
        }
    }
}

/// A single action/message request.
///
/// On the wire a request is itself a frame payload:
/// `<action> <decimal-length-of-message> <message>`. The message text is
/// transmitted verbatim, embedded spaces and newlines included; its
/// declared length keeps the fields self-delimiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    action: String,
    message: String,
}

impl Request {
    /// Creates a request, validating the action field.
    ///
    /// The action must be non-empty and free of whitespace. It need not
    /// be one of [`Action::ALL`]; servers may extend the vocabulary.
    pub fn new(
        action: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let action = action.into();
        if action.is_empty() || action.contains(|c: char| c.is_whitespace()) {
            return Err(ProtocolError::InvalidAction(action));
        }
        Ok(Self {
            action,
            message: message.into(),
        })
    }

    /// Creates a request from a known action.
    pub fn from_action(action: Action, message: impl Into<String>) -> Self {
        Self {
            action: action.as_str().to_string(),
            message: message.into(),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the nested `action length message` payload.
    pub fn to_payload(&self) -> Bytes {
        let length = self.message.len().to_string();
        let mut buf = BytesMut::with_capacity(
            self.action.len() + length.len() + 2 + self.message.len(),
        );
        buf.put_slice(self.action.as_bytes());
        buf.put_u8(SEPARATOR);
        buf.put_slice(length.as_bytes());
        buf.put_u8(SEPARATOR);
        buf.put_slice(self.message.as_bytes());
        buf.freeze()
    }

    /// Parses a request back out of a frame payload.
    pub fn parse(payload: &[u8]) -> Result<Self, ProtocolError> {
        let sep = payload
            .iter()
            .position(|&b| b == SEPARATOR)
            .ok_or(ProtocolError::MissingField("length"))?;
        let action =
            std::str::from_utf8(&payload[..sep]).map_err(|_| ProtocolError::InvalidUtf8)?;

        let rest = &payload[sep + 1..];
        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return match rest.first() {
                None => Err(ProtocolError::MissingField("length")),
                Some(&byte) => Err(ProtocolError::MalformedLength { byte }),
            };
        }
        match rest.get(digits) {
            None => return Err(ProtocolError::MissingField("message")),
            Some(&SEPARATOR) => {}
            Some(&byte) => return Err(ProtocolError::MalformedLength { byte }),
        }

        let message_bytes = &rest[digits + 1..];
        // A parse failure here can only be overflow, which certainly
        // mismatches the bytes actually present.
        let declared = std::str::from_utf8(&rest[..digits])
            .unwrap()
            .parse::<u64>()
            .unwrap_or(u64::MAX);
        if declared != message_bytes.len() as u64 {
            return Err(ProtocolError::LengthMismatch {
                declared,
                available: message_bytes.len(),
            });
        }

        let message =
            std::str::from_utf8(message_bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
        Self::new(action, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display_and_parse() {
        for action in Action::ALL {
            let parsed: Action = action.as_str().parse().unwrap();
            assert_eq!(parsed, action);
        }
        assert_eq!(Action::Uppercase.to_string(), "uppercase");
    }

    #[test]
    fn test_unknown_action() {
        let result: Result<Action, _> = "frobnicate".parse();
        assert!(matches!(result, Err(ProtocolError::UnknownAction(_))));
    }

    #[test]
    fn test_request_payload_exact_bytes() {
        let request = Request::from_action(Action::Uppercase, "abc");
        assert_eq!(&request.to_payload()[..], b"uppercase 3 abc");
    }

    #[test]
    fn test_empty_message_payload() {
        let request = Request::new("reverse", "").unwrap();
        assert_eq!(&request.to_payload()[..], b"reverse 0 ");
    }

    #[test]
    fn test_action_validation() {
        assert!(matches!(
            Request::new("", "hi"),
            Err(ProtocolError::InvalidAction(_))
        ));
        assert!(matches!(
            Request::new("upper case", "hi"),
            Err(ProtocolError::InvalidAction(_))
        ));
        assert!(matches!(
            Request::new("upper\tcase", "hi"),
            Err(ProtocolError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_parse_roundtrip() {
        let request = Request::new("reverse", "hello world\nsecond line").unwrap();
        let parsed = Request::parse(&request.to_payload()).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_parse_message_with_trailing_spaces() {
        let request = Request::new("shuffle", "  padded  ").unwrap();
        let parsed = Request::parse(&request.to_payload()).unwrap();
        assert_eq!(parsed.message(), "  padded  ");
    }

    #[test]
    fn test_parse_length_mismatch() {
        let result = Request::parse(b"uppercase 5 abc");
        assert!(matches!(
            result,
            Err(ProtocolError::LengthMismatch {
                declared: 5,
                available: 3
            })
        ));
    }

    #[test]
    fn test_parse_missing_length() {
        let result = Request::parse(b"uppercase");
        assert!(matches!(result, Err(ProtocolError::MissingField("length"))));
    }

    #[test]
    fn test_parse_missing_message() {
        // Length run present but never terminated by a separator.
        let result = Request::parse(b"uppercase 3");
        assert!(matches!(
            result,
            Err(ProtocolError::MissingField("message"))
        ));
    }

    #[test]
    fn test_parse_bad_length_byte() {
        let result = Request::parse(b"uppercase x3 abc");
        assert!(matches!(
            result,
            Err(ProtocolError::MalformedLength { byte: b'x' })
        ));
    }
}
