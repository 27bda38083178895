//! The byte-stream framing state machine: handshake, header, body, dispatch.
//!
//! [`Framer`] is transport-agnostic — it only ever sees byte slices fed to it by whichever I/O
//! role owns the socket, which is what makes it unit-testable without a real connection.

use super::ProtocolError;

/// The 13-byte ASCII literal the debuggee sends to open a session, echoed back verbatim.
pub const HANDSHAKE: &[u8; 13] = b"DWP-Handshake";

const HEADER_LEN: usize = 11;

/// Where the framing state machine currently is.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectionState {
    /// Waiting for the 13-byte handshake literal.
    WaitHandshake,
    /// Waiting for an 11-byte frame header.
    WaitHeader,
    /// Waiting for a frame body of a known length.
    WaitData,
    /// Terminal: the connection is unrecoverable.
    ProtocolError,
}

/// What a parsed frame header means, depending on its `flags` byte.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FrameKind {
    /// `flags == 0x00`: an inbound or outbound request.
    Command {
        /// The command-set byte.
        cmd_set: u8,
        /// The command byte within that set.
        cmd: u8,
    },
    /// `flags == 0x80`: a reply to a previously sent request.
    Reply {
        /// The error code, `0` on success.
        error_code: u8,
    },
}

/// One fully-framed message: header plus body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Frame {
    /// The request id this frame correlates to.
    pub id: u32,
    /// The parsed meaning of the header's trailing bytes.
    pub kind: FrameKind,
    /// The frame body, empty if the header declared zero-length.
    pub payload: Vec<u8>,
}

/// What [`Framer::feed`] produced from one chunk of inbound bytes.
#[derive(Debug, Default)]
pub struct FeedResult {
    /// Set once, the first time the handshake literal is recognized: the bytes to echo back.
    pub handshake_echo: Option<Vec<u8>>,
    /// Zero or more frames completed by this chunk, in wire order.
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone)]
struct PendingHeader {
    id: u32,
    kind: FrameKind,
    body_len: usize,
}

/// Incremental parser for the frame stream. Owns no socket; feed it bytes as they arrive.
#[derive(Debug)]
pub struct Framer {
    state: ConnectionState,
    buf: Vec<u8>,
    pending: Option<PendingHeader>,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    /// Creates a framer starting in `WaitHandshake`.
    pub fn new() -> Self {
        Framer {
            state: ConnectionState::WaitHandshake,
            buf: Vec::new(),
            pending: None,
        }
    }

    /// The current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Feeds a chunk of inbound bytes, advancing the state machine as far as the buffered data
    /// allows. Tolerates any split of the underlying byte stream into chunks, including
    /// one-byte-at-a-time delivery.
    pub fn feed(&mut self, data: &[u8]) -> Result<FeedResult, ProtocolError> {
        self.buf.extend_from_slice(data);
        let mut result = FeedResult::default();

        loop {
            match self.state {
                ConnectionState::WaitHandshake => {
                    if self.buf.len() < HANDSHAKE.len() {
                        break;
                    }
                    let received: Vec<u8> = self.buf.drain(..HANDSHAKE.len()).collect();
                    if received != HANDSHAKE {
                        self.state = ConnectionState::ProtocolError;
                        return Err(ProtocolError::HandshakeMismatch);
                    }
                    result.handshake_echo = Some(received);
                    self.state = ConnectionState::WaitHeader;
                }
                ConnectionState::WaitHeader => {
                    if self.buf.len() < HEADER_LEN {
                        break;
                    }
                    let hdr: Vec<u8> = self.buf.drain(..HEADER_LEN).collect();
                    let length = u32::from_be_bytes([hdr[0], hdr[1], hdr[2], hdr[3]]);
                    let id = u32::from_be_bytes([hdr[4], hdr[5], hdr[6], hdr[7]]);
                    let flags = hdr[8];

                    let kind = match flags {
                        0x80 => {
                            let err = u16::from_be_bytes([hdr[9], hdr[10]]);
                            if err > 255 {
                                self.state = ConnectionState::ProtocolError;
                                return Err(ProtocolError::InvalidErrorCode(err));
                            }
                            FrameKind::Reply {
                                error_code: err as u8,
                            }
                        }
                        0x00 => {
                            let cmd_set = hdr[9];
                            let cmd = hdr[10];
                            if cmd_set == 0 {
                                self.state = ConnectionState::ProtocolError;
                                return Err(ProtocolError::InvalidCommandSet);
                            }
                            FrameKind::Command { cmd_set, cmd }
                        }
                        other => {
                            self.state = ConnectionState::ProtocolError;
                            return Err(ProtocolError::InvalidFlags(other));
                        }
                    };

                    let body_len = (length as usize).checked_sub(HEADER_LEN).ok_or_else(|| {
                        ProtocolError::Invalid(format!(
                            "frame length {} shorter than the header itself",
                            length
                        ))
                    })?;

                    if body_len == 0 {
                        result.frames.push(Frame {
                            id,
                            kind,
                            payload: Vec::new(),
                        });
                    } else {
                        self.pending = Some(PendingHeader {
                            id,
                            kind,
                            body_len,
                        });
                        self.state = ConnectionState::WaitData;
                    }
                }
                ConnectionState::WaitData => {
                    let pending = self
                        .pending
                        .clone()
                        .expect("WaitData is only entered with a pending header");
                    if self.buf.len() < pending.body_len {
                        break;
                    }
                    let payload: Vec<u8> = self.buf.drain(..pending.body_len).collect();
                    result.frames.push(Frame {
                        id: pending.id,
                        kind: pending.kind,
                        payload,
                    });
                    self.pending = None;
                    self.state = ConnectionState::WaitHeader;
                }
                ConnectionState::ProtocolError => break,
            }
        }

        Ok(result)
    }
}

/// Encodes a command frame header (11 bytes) followed by `payload`.
pub fn encode_command(id: u32, cmd_set: u8, cmd: u8, payload: &[u8]) -> Vec<u8> {
    let length = (HEADER_LEN + payload.len()) as u32;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(0x00);
    buf.push(cmd_set);
    buf.push(cmd);
    buf.extend_from_slice(payload);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vm_version_request() -> Vec<u8> {
        encode_command(1, 1, 1, &[])
    }

    #[test]
    fn handshake_then_trivial_reply() {
        let mut f = Framer::new();

        let r = f.feed(HANDSHAKE).unwrap();
        assert_eq!(r.handshake_echo.as_deref(), Some(&HANDSHAKE[..]));
        assert_eq!(f.state(), ConnectionState::WaitHeader);

        let reply_payload = b"mono 2.38";
        let mut reply = vec![];
        reply.extend_from_slice(&((HEADER_LEN + reply_payload.len()) as u32).to_be_bytes());
        reply.extend_from_slice(&1u32.to_be_bytes());
        reply.push(0x80);
        reply.push(0x00);
        reply.push(0x00);
        reply.extend_from_slice(reply_payload);

        let r = f.feed(&reply).unwrap();
        assert_eq!(r.frames.len(), 1);
        assert_eq!(r.frames[0].id, 1);
        assert_eq!(r.frames[0].kind, FrameKind::Reply { error_code: 0 });
        assert_eq!(r.frames[0].payload, reply_payload);
    }

    #[test]
    fn handshake_mismatch_is_fatal() {
        let mut f = Framer::new();
        let err = f.feed(b"not-a-handshake!!").unwrap_err();
        assert!(matches!(err, ProtocolError::HandshakeMismatch));
        assert_eq!(f.state(), ConnectionState::ProtocolError);
    }

    #[test]
    fn arbitrary_byte_splitting_reconstructs_the_same_frame() {
        let mut whole = HANDSHAKE.to_vec();
        whole.extend_from_slice(&vm_version_request());

        for chunk_size in 1..=whole.len() {
            let mut f = Framer::new();
            let mut echoes = Vec::new();
            let mut frames = Vec::new();
            for chunk in whole.chunks(chunk_size) {
                let r = f.feed(chunk).unwrap();
                echoes.extend(r.handshake_echo);
                frames.extend(r.frames);
            }
            assert_eq!(echoes, vec![HANDSHAKE.to_vec()], "chunk_size={chunk_size}");
            assert_eq!(frames.len(), 1, "chunk_size={chunk_size}");
            assert_eq!(
                frames[0].kind,
                FrameKind::Command { cmd_set: 1, cmd: 1 },
                "chunk_size={chunk_size}"
            );
        }
    }

    #[test]
    fn zero_length_body_dispatches_without_waiting() {
        let mut f = Framer::new();
        f.feed(HANDSHAKE).unwrap();
        let r = f.feed(&vm_version_request()).unwrap();
        assert_eq!(r.frames.len(), 1);
        assert!(r.frames[0].payload.is_empty());
        assert_eq!(f.state(), ConnectionState::WaitHeader);
    }

    #[test]
    fn invalid_command_set_zero_is_fatal() {
        let mut f = Framer::new();
        f.feed(HANDSHAKE).unwrap();
        let bad = encode_command(1, 0, 1, &[]);
        let err = f.feed(&bad).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidCommandSet));
    }

    #[test]
    fn error_code_over_255_is_fatal() {
        let mut f = Framer::new();
        f.feed(HANDSHAKE).unwrap();
        let mut bad = vec![];
        bad.extend_from_slice(&(HEADER_LEN as u32).to_be_bytes());
        bad.extend_from_slice(&1u32.to_be_bytes());
        bad.push(0x80);
        bad.extend_from_slice(&300u16.to_be_bytes());
        let err = f.feed(&bad).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidErrorCode(300)));
    }
}
