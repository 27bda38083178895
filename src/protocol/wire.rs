//! Primitive big-endian codec for the wire protocol.
//!
//! Every multi-byte field on the wire is big-endian; strings are length-prefixed with no
//! terminator. These are plain functions rather than a reader/writer type because request and
//! reply bodies are fixed-position, not self-describing like a tagstruct.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use super::ProtocolError;

/// Reads a big-endian `u16`.
pub fn read_u16(r: &mut impl Read) -> Result<u16, ProtocolError> {
    Ok(r.read_u16::<BigEndian>()?)
}

/// Reads a big-endian `u32`.
pub fn read_u32(r: &mut impl Read) -> Result<u32, ProtocolError> {
    Ok(r.read_u32::<BigEndian>()?)
}

/// Reads a big-endian `u64`.
pub fn read_u64(r: &mut impl Read) -> Result<u64, ProtocolError> {
    Ok(r.read_u64::<BigEndian>()?)
}

/// Reads a single byte.
pub fn read_u8(r: &mut impl Read) -> Result<u8, ProtocolError> {
    Ok(r.read_u8()?)
}

/// Reads a length-prefixed, unterminated byte string.
///
/// The debuggee's native string encoding isn't specified by the protocol; callers decide whether
/// and how to interpret the bytes as text.
pub fn read_string(r: &mut impl Read) -> Result<Vec<u8>, ProtocolError> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)
        .map_err(|e| short_read(e, len))?;
    Ok(buf)
}

fn short_read(e: io::Error, wanted: usize) -> ProtocolError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        ProtocolError::ShortRead { wanted }
    } else {
        ProtocolError::Io(e)
    }
}

/// Writes a big-endian `u16`.
pub fn write_u16(w: &mut impl Write, v: u16) -> Result<(), ProtocolError> {
    w.write_u16::<BigEndian>(v)?;
    Ok(())
}

/// Writes a big-endian `u32`.
pub fn write_u32(w: &mut impl Write, v: u32) -> Result<(), ProtocolError> {
    w.write_u32::<BigEndian>(v)?;
    Ok(())
}

/// Writes a big-endian `u64`.
pub fn write_u64(w: &mut impl Write, v: u64) -> Result<(), ProtocolError> {
    w.write_u64::<BigEndian>(v)?;
    Ok(())
}

/// Writes a single byte.
pub fn write_u8(w: &mut impl Write, v: u8) -> Result<(), ProtocolError> {
    w.write_u8(v)?;
    Ok(())
}

/// Writes a length-prefixed, unterminated byte string.
pub fn write_string(w: &mut impl Write, s: impl AsRef<[u8]>) -> Result<(), ProtocolError> {
    let s = s.as_ref();
    write_u32(w, s.len() as u32)?;
    w.write_all(s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn integer_roundtrip() {
        let mut buf = Vec::new();
        write_u16(&mut buf, 0x1234).unwrap();
        write_u32(&mut buf, 0xdead_beef).unwrap();
        write_u64(&mut buf, 0x0102_0304_0506_0708).unwrap();
        write_u8(&mut buf, 0xab).unwrap();

        let mut c = Cursor::new(buf);
        assert_eq!(read_u16(&mut c).unwrap(), 0x1234);
        assert_eq!(read_u32(&mut c).unwrap(), 0xdead_beef);
        assert_eq!(read_u64(&mut c).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(read_u8(&mut c).unwrap(), 0xab);
    }

    #[test]
    fn string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, b"mono 2.38").unwrap();

        let mut c = Cursor::new(buf);
        assert_eq!(read_string(&mut c).unwrap(), b"mono 2.38");
    }

    #[test]
    fn short_buffer_is_a_distinct_error() {
        let mut c = Cursor::new(vec![0u8; 2]);
        assert!(matches!(read_u32(&mut c), Err(ProtocolError::Io(_))));
    }

    #[test]
    fn short_string_body_is_a_short_read() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 100).unwrap();
        buf.extend_from_slice(b"short");

        let mut c = Cursor::new(buf);
        assert!(matches!(
            read_string(&mut c),
            Err(ProtocolError::ShortRead { wanted: 100 })
        ));
    }
}
