//! Defines error types and codes.

use enum_primitive_derive::Primitive;
use thiserror::Error;

/// A generic protocol error: the Codec or Framer could not make sense of the bytes on the wire.
///
/// These are fatal to the connection; see `ClientError` for the facade-level wrapping.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The handshake literal the debuggee sent didn't match `DWP-Handshake`.
    #[error("handshake mismatch")]
    HandshakeMismatch,
    /// A frame header declared an invalid `flags` byte (neither 0x00 nor 0x80).
    #[error("invalid frame flags: {0:#x}")]
    InvalidFlags(u8),
    /// A reply header's error code exceeded the valid `u8` range.
    #[error("invalid error code: {0}")]
    InvalidErrorCode(u16),
    /// A command header named command set 0, which no command uses.
    #[error("invalid command set: 0")]
    InvalidCommandSet,
    /// An inbound command arrived on a command set other than EVENT (64).
    #[error("unexpected inbound command set: {0}")]
    UnexpectedCommandSet(u8),
    /// The error code in a reply isn't one of the closed set in the protocol.
    #[error("unrecognized error code: {0}")]
    UnrecognizedErrorCode(u16),
    /// A value tag is recognized by the wire format but this library doesn't decode it.
    #[error("unsupported value tag: {0:#x}")]
    UnsupportedValueTag(u8),
    /// A byte appeared as a value tag that isn't in the protocol's tag table at all.
    #[error("invalid value tag: {0:#x}")]
    InvalidValueTag(u8),
    /// An event code isn't one this library recognizes.
    #[error("invalid event code: {0}")]
    InvalidEventCode(u8),
    /// A length-prefixed field demanded more bytes than were available.
    #[error("short read: wanted {wanted} bytes")]
    ShortRead {
        /// The number of bytes the field declared.
        wanted: usize,
    },
    /// The message is invalid for some reason not covered by a more specific variant.
    #[error("invalid message: {0}")]
    Invalid(String),
    /// An I/O error occurred reading or writing the socket.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An error code understood by the wire protocol.
///
/// Sent back verbatim in a reply header when a request fails remotely.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Primitive)]
pub enum ErrorCode {
    /// No error.
    None = 0,
    /// The object id in the request doesn't refer to a live object.
    InvalidObject = 20,
    /// The field id in the request is invalid.
    InvalidFieldId = 25,
    /// The frame id in the request doesn't refer to a live stack frame.
    InvalidFrameId = 30,
    /// The debuggee doesn't implement this command.
    NotImplemented = 100,
    /// The operation requires the VM to be suspended, and it isn't.
    NotSuspended = 101,
    /// One of the request's arguments is invalid.
    InvalidArgument = 102,
    /// The referenced assembly, appdomain, or type has been unloaded.
    Unloaded = 103,
    /// No method invocation is in progress on the given thread.
    NoInvocation = 104,
    /// The requested debug information isn't available (e.g. no symbols).
    AbsentInformation = 105,
    /// No sequence point exists at the requested IL offset.
    NoSeqPointAtIlOffset = 106,
    /// The runtime's class loader failed.
    LoaderError = 200,
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn error_code_roundtrip() {
        assert_eq!(ErrorCode::from_u16(105), Some(ErrorCode::AbsentInformation));
        assert_eq!(ErrorCode::from_u16(199), None);
    }
}
