//! Payload encoders and reply decoders for every request the facade issues.
//!
//! One function per `sendReceive`-style call site: build the body bytes for a command, and/or
//! decode the body bytes of its reply. These are pure functions over byte buffers; the facade
//! supplies the bytes by round-tripping through the transaction table.

use std::io::Cursor;

use super::event::SuspendPolicy;
use super::value::{decode_value, Value};
use super::wire;
use super::ProtocolError;

/// `ModifierKind::MOD_KIND_STEP`.
pub const MOD_KIND_STEP: u8 = 10;
/// `ModifierKind::MOD_KIND_LOCATION_ONLY`.
pub const MOD_KIND_LOCATION_ONLY: u8 = 7;

/// Step granularity: one IL instruction, or one source line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepSize {
    /// `STEP_SIZE_MIN`.
    Instruction,
    /// `STEP_SIZE_LINE`.
    Line,
}

/// Step direction relative to the current frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepDepth {
    /// `STEP_DEPTH_INTO`.
    Into,
    /// `STEP_DEPTH_OVER`.
    Over,
    /// `STEP_DEPTH_OUT`.
    Out,
}

fn step_size_code(s: StepSize) -> u32 {
    match s {
        StepSize::Instruction => 0,
        StepSize::Line => 1,
    }
}

fn step_depth_code(d: StepDepth) -> u32 {
    match d {
        StepDepth::Into => 0,
        StepDepth::Over => 1,
        StepDepth::Out => 2,
    }
}

/// Builds the `EVENT_REQUEST.SET` body for a STEP modifier.
///
/// `[event_code=STEP, suspend_policy=ALL, modifier_count=1, MOD_KIND_STEP, thread_id, size,
/// depth, filter=0]` — 20 bytes total.
pub fn encode_set_step(thread_id: u32, size: StepSize, depth: StepDepth) -> Vec<u8> {
    let mut buf = Vec::with_capacity(20);
    buf.push(super::event::EventCode::Step as u8);
    buf.push(SuspendPolicy::All as u8);
    buf.push(1);
    buf.push(MOD_KIND_STEP);
    buf.extend_from_slice(&thread_id.to_be_bytes());
    buf.extend_from_slice(&step_size_code(size).to_be_bytes());
    buf.extend_from_slice(&step_depth_code(depth).to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes());
    buf
}

/// Builds the `EVENT_REQUEST.CLEAR` body for the currently active STEP request.
pub fn encode_clear_step(request_id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5);
    buf.push(super::event::EventCode::Step as u8);
    buf.extend_from_slice(&request_id.to_be_bytes());
    buf
}

/// Builds the `EVENT_REQUEST.SET` body for a BREAKPOINT modifier.
///
/// `[event_code=BREAKPOINT, suspend_policy=ALL, modifier_count=1, MOD_KIND_LOCATION_ONLY,
/// method_id, il_offset(u64)]` — 16 bytes total.
pub fn encode_set_breakpoint(method_id: u32, il_offset: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16);
    buf.push(super::event::EventCode::Breakpoint as u8);
    buf.push(SuspendPolicy::All as u8);
    buf.push(1);
    buf.push(MOD_KIND_LOCATION_ONLY);
    buf.extend_from_slice(&method_id.to_be_bytes());
    buf.extend_from_slice(&il_offset.to_be_bytes());
    buf
}

/// Builds the `EVENT_REQUEST.CLEAR` body for a BREAKPOINT request.
pub fn encode_clear_breakpoint(request_id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5);
    buf.push(super::event::EventCode::Breakpoint as u8);
    buf.extend_from_slice(&request_id.to_be_bytes());
    buf
}

/// Builds the `EVENT_REQUEST.SET` body for subscribing to ASSEMBLY_LOAD with no suspension,
/// issued once during initial setup.
pub fn encode_set_assembly_load_subscription() -> Vec<u8> {
    vec![
        super::event::EventCode::AssemblyLoad as u8,
        SuspendPolicy::None as u8,
        0,
    ]
}

/// Builds the `EVENT_REQUEST.SET` body for USER_BREAK, suspend_policy=ALL, no modifiers.
pub fn encode_set_user_break_subscription() -> Vec<u8> {
    vec![
        super::event::EventCode::UserBreak as u8,
        SuspendPolicy::All as u8,
        0,
    ]
}

/// Decodes the reply to `EVENT_REQUEST.SET`: a single `u32` request id.
pub fn decode_request_id(payload: &[u8]) -> Result<u32, ProtocolError> {
    wire::read_u32(&mut Cursor::new(payload))
}

/// Builds the `VM.SET_PROTOCOL_VERSION` body.
pub fn encode_set_protocol_version(major: u32, minor: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8);
    buf.extend_from_slice(&major.to_be_bytes());
    buf.extend_from_slice(&minor.to_be_bytes());
    buf
}

/// Decodes the `VM.VERSION` reply: `(name, major, minor)`. Only the numeric version is used.
pub fn decode_vm_version(payload: &[u8]) -> Result<(u32, u32), ProtocolError> {
    let mut c = Cursor::new(payload);
    let _name = wire::read_string(&mut c)?;
    let major = wire::read_u32(&mut c)?;
    let minor = wire::read_u32(&mut c)?;
    Ok((major, minor))
}

/// Builds the `VM.EXIT` body: a 32-bit exit code.
pub fn encode_vm_exit(code: u32) -> Vec<u8> {
    code.to_be_bytes().to_vec()
}

/// Decodes the `VM.ALL_THREADS` reply: a count followed by that many thread ids.
pub fn decode_all_threads(payload: &[u8]) -> Result<Vec<u32>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let count = wire::read_u32(&mut c)?;
    (0..count).map(|_| wire::read_u32(&mut c)).collect()
}

/// Builds a request body that's just a single `u32` id (the overwhelming majority of requests
/// in this protocol: thread id, method id, type id, object id, assembly id...).
pub fn encode_id(id: u32) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

/// Decodes a reply body that's just a single `u32`.
pub fn decode_u32(payload: &[u8]) -> Result<u32, ProtocolError> {
    wire::read_u32(&mut Cursor::new(payload))
}

/// Decodes a reply body that's just a length-prefixed string.
pub fn decode_string(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    wire::read_string(&mut Cursor::new(payload))
}

/// Decodes a reply body that's a count followed by that many `u32` ids (`VM.GET_TYPES`,
/// `VM.GET_TYPES_FOR_SOURCE_FILE`, `TYPE.GET_METHODS`).
pub fn decode_id_list(payload: &[u8]) -> Result<Vec<u32>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let count = wire::read_u32(&mut c)?;
    (0..count).map(|_| wire::read_u32(&mut c)).collect()
}

/// Builds the `VM.GET_TYPES` / `VM.GET_TYPES_FOR_SOURCE_FILE` body: a NUL-terminated
/// length-prefixed name.
pub fn encode_name_query(name: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(name.len() + 5);
    wire::write_string(&mut buf, name).expect("writing to a Vec never fails");
    buf.push(0);
    buf
}

/// Builds the `ASSEMBLY.GET_TYPE` body: assembly id plus a NUL-terminated name.
pub fn encode_find_type(assembly_id: u32, name: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + name.len() + 5);
    buf.extend_from_slice(&assembly_id.to_be_bytes());
    wire::write_string(&mut buf, name).expect("writing to a Vec never fails");
    buf.push(0);
    buf
}

/// Builds the `THREAD.GET_FRAME_INFO` body: `thread_id, start=0, len=-1`.
pub fn encode_get_stack(thread_id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(12);
    buf.extend_from_slice(&thread_id.to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes());
    buf.extend_from_slice(&(-1i32).to_be_bytes());
    buf
}

/// One stack frame as reported by `THREAD.GET_FRAME_INFO`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StackFrame {
    /// The frame id, used to scope subsequent `STACK_FRAME.*` requests.
    pub id: u32,
    /// The method executing in this frame.
    pub method_id: u32,
    /// The current IL offset within that method.
    pub il_offset: u32,
    /// Raw `StackFrameFlags` bits (e.g. debugger-invoked, native transition).
    pub flags: u8,
}

/// Decodes the `THREAD.GET_FRAME_INFO` reply: a count, then that many 13-byte frame records, top
/// of stack first.
pub fn decode_stack(payload: &[u8]) -> Result<Vec<StackFrame>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let count = wire::read_u32(&mut c)?;
    (0..count)
        .map(|_| {
            Ok(StackFrame {
                id: wire::read_u32(&mut c)?,
                method_id: wire::read_u32(&mut c)?,
                il_offset: wire::read_u32(&mut c)?,
                flags: wire::read_u8(&mut c)?,
            })
        })
        .collect()
}

/// Builds the `STACK_FRAME.GET_THIS` / the first half of the params protocol:
/// `thread_id, frame_id`.
pub fn encode_frame_scope(thread_id: u32, frame_id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8);
    buf.extend_from_slice(&thread_id.to_be_bytes());
    buf.extend_from_slice(&frame_id.to_be_bytes());
    buf
}

/// Builds the `STACK_FRAME.GET_VALUES` body requesting `indexes`: the parameter/local indexes
/// defined by the locals/params protocol (negative for params, natural for locals).
pub fn encode_frame_get_values(thread_id: u32, frame_id: u32, indexes: &[i32]) -> Vec<u8> {
    let mut buf = encode_frame_scope(thread_id, frame_id);
    buf.extend_from_slice(&(indexes.len() as u32).to_be_bytes());
    for &i in indexes {
        buf.extend_from_slice(&i.to_be_bytes());
    }
    buf
}

/// Decodes a `STACK_FRAME.GET_THIS` reply: `None` if the tag is `Null` (the original also only
/// ever surfaces a non-null `this`).
pub fn decode_this(payload: &[u8]) -> Result<Option<Value>, ProtocolError> {
    let value = decode_value(&mut Cursor::new(payload))?;
    match value {
        Value::ObjectRef(obj) if obj.kind == super::value::ObjectRefKind::Nil => Ok(None),
        other => Ok(Some(other)),
    }
}

/// Decodes a flat sequence of `count` [`Value`]s, as returned by `STACK_FRAME.GET_VALUES`,
/// `ARRAY_REF.GET_VALUES`, `TYPE.GET_VALUES` and `OBJECT_REF.GET_VALUES`.
pub fn decode_values(payload: &[u8], count: usize) -> Result<Vec<Value>, ProtocolError> {
    let mut c = Cursor::new(payload);
    (0..count).map(|_| decode_value(&mut c)).collect()
}

/// Builds the `ARRAY_REF.GET_LENGTH` body.
pub fn encode_array_length(array_id: u32) -> Vec<u8> {
    encode_id(array_id)
}

/// Decodes the `ARRAY_REF.GET_LENGTH` reply: only the first dimension's length is surfaced, read
/// from offset 4 (the original skips the rank count at offset 0).
pub fn decode_array_length(payload: &[u8]) -> Result<u32, ProtocolError> {
    let mut c = Cursor::new(payload);
    let _rank_count = wire::read_u32(&mut c)?;
    wire::read_u32(&mut c)
}

/// Builds the `ARRAY_REF.GET_VALUES` body: `array_id, index=0, len`.
pub fn encode_array_values(array_id: u32, len: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(12);
    buf.extend_from_slice(&array_id.to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes());
    buf.extend_from_slice(&len.to_be_bytes());
    buf
}

/// One source line entry in a method's debug info.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LineEntry {
    /// IL offset this line begins at.
    pub il_offset: u32,
    /// 1-based source line.
    pub row: u32,
    /// Column, may be negative on the wire hence signed here.
    pub col: i32,
}

/// A method's debug info: code size, primary source file, and its line table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDebugInfo {
    /// Total IL code size in bytes.
    pub code_size: u32,
    /// The (first) source file backing this method, if any.
    pub source_file: Option<Vec<u8>>,
    /// Line table, sorted by `il_offset` ascending.
    pub lines: Vec<LineEntry>,
}

impl MethodDebugInfo {
    /// Returns the first line entry whose `il_offset >= query`.
    ///
    /// This is a linear forward scan, not a greatest-predecessor search: a query strictly
    /// between two entries returns the later one. That's how the source behaves; callers
    /// shouldn't assume "nearest preceding line" semantics.
    pub fn find(&self, query: u32) -> Option<&LineEntry> {
        self.lines.iter().find(|l| l.il_offset >= query)
    }
}

/// Decodes the `METHOD.GET_DEBUG_INFO` reply.
pub fn decode_method_debug_info(payload: &[u8]) -> Result<MethodDebugInfo, ProtocolError> {
    let mut c = Cursor::new(payload);
    let code_size = wire::read_u32(&mut c)?;
    let file_count = wire::read_u32(&mut c)?;
    let mut source_file = None;
    for i in 0..file_count {
        let name = wire::read_string(&mut c)?;
        let mut hash = [0u8; 16];
        std::io::Read::read_exact(&mut c, &mut hash)?;
        if i == 0 {
            source_file = Some(name);
        }
    }
    if file_count == 0 {
        return Ok(MethodDebugInfo {
            code_size,
            source_file: None,
            lines: Vec::new(),
        });
    }

    let line_count = wire::read_u32(&mut c)?;
    let mut lines = Vec::with_capacity(line_count as usize);
    for _ in 0..line_count {
        let il_offset = wire::read_u32(&mut c)?;
        let row = wire::read_u32(&mut c)?;
        let _source = wire::read_u32(&mut c)?;
        let col = wire::read_u32(&mut c)? as i32;
        let _end_line = wire::read_u32(&mut c)?;
        let _end_col = wire::read_u32(&mut c)?;
        lines.push(LineEntry {
            il_offset,
            row,
            col,
        });
    }

    Ok(MethodDebugInfo {
        code_size,
        source_file,
        lines,
    })
}

/// Decodes the `METHOD.GET_BODY` reply: a length-prefixed IL byte buffer.
pub fn decode_method_body(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let len = wire::read_u32(&mut c)? as usize;
    let mut buf = vec![0u8; len];
    std::io::Read::read_exact(&mut c, &mut buf)?;
    Ok(buf)
}

/// How a method is implemented, from the low two bits of its implementation flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MethodKind {
    /// Backed by IL bytecode.
    Il,
    /// An internal call implemented natively.
    Native,
    /// Implemented directly by the runtime.
    Runtime,
}

/// A method's attribute flags, decoded from `METHOD.GET_INFO`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MethodFlags {
    /// Raw CLR method attribute bits.
    pub attributes: u32,
    /// Raw CLR method implementation attribute bits.
    pub impl_attributes: u32,
}

const METHOD_ATTRIBUTE_STATIC: u32 = 0x0010;

impl MethodFlags {
    /// Whether the method is static.
    pub fn is_static(&self) -> bool {
        self.attributes & METHOD_ATTRIBUTE_STATIC != 0
    }

    /// How the method is implemented.
    pub fn kind(&self) -> MethodKind {
        match self.impl_attributes & 3 {
            1 => MethodKind::Native,
            3 => MethodKind::Runtime,
            _ => MethodKind::Il,
        }
    }
}

/// Decodes the `METHOD.GET_INFO` reply: `(attributes, impl_attributes)`.
pub fn decode_method_flags(payload: &[u8]) -> Result<MethodFlags, ProtocolError> {
    let mut c = Cursor::new(payload);
    let attributes = wire::read_u32(&mut c)?;
    let impl_attributes = wire::read_u32(&mut c)?;
    Ok(MethodFlags {
        attributes,
        impl_attributes,
    })
}

/// Decodes only the parameter count out of a `METHOD.GET_PARAM_INFO` reply (the count sits at
/// offset 4, after the calling-convention field at offset 0).
pub fn decode_param_count(payload: &[u8]) -> Result<u32, ProtocolError> {
    let mut c = Cursor::new(payload);
    let _calling_convention = wire::read_u32(&mut c)?;
    wire::read_u32(&mut c)
}

/// Decodes the parameter names out of a `METHOD.GET_PARAM_INFO` reply, skipping the fixed header
/// (calling convention, param count, generic param count, return type id) and the per-parameter
/// type ids ahead of the names.
pub fn decode_param_names(payload: &[u8]) -> Result<Vec<Vec<u8>>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let _calling_convention = wire::read_u32(&mut c)?;
    let count = wire::read_u32(&mut c)?;
    let skip = 4 + 4 + count as u64 * 4; // generic param count + return type id + per-param type ids
    std::io::Seek::seek(&mut c, std::io::SeekFrom::Current(skip as i64))?;
    (0..count).map(|_| wire::read_string(&mut c)).collect()
}

/// Decodes only the local count out of a `METHOD.GET_LOCALS_INFO` reply.
pub fn decode_locals_count(payload: &[u8]) -> Result<u32, ProtocolError> {
    wire::read_u32(&mut Cursor::new(payload))
}

/// Decodes the local names out of a `METHOD.GET_LOCALS_INFO` reply, skipping the count and the
/// per-local leading type ids ahead of the names.
pub fn decode_local_names(payload: &[u8]) -> Result<Vec<Vec<u8>>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let count = wire::read_u32(&mut c)?;
    let skip = count as u64 * 4;
    std::io::Seek::seek(&mut c, std::io::SeekFrom::Current(skip as i64))?;
    (0..count).map(|_| wire::read_string(&mut c)).collect()
}

/// A type's identifying info, as reported by `TYPE.GET_INFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Namespace, empty for the global namespace.
    pub namespace: Vec<u8>,
    /// Bare type name.
    pub name: Vec<u8>,
    /// Assembly-qualified full name.
    pub full_name: Vec<u8>,
    /// Owning assembly id.
    pub assembly_id: u32,
    /// Owning module id.
    pub module_id: u32,
    /// The type id itself, echoed back.
    pub type_id: u32,
}

/// Decodes the `TYPE.GET_INFO` reply.
pub fn decode_type_info(payload: &[u8]) -> Result<TypeInfo, ProtocolError> {
    let mut c = Cursor::new(payload);
    Ok(TypeInfo {
        namespace: wire::read_string(&mut c)?,
        name: wire::read_string(&mut c)?,
        full_name: wire::read_string(&mut c)?,
        assembly_id: wire::read_u32(&mut c)?,
        module_id: wire::read_u32(&mut c)?,
        type_id: wire::read_u32(&mut c)?,
    })
}

const FIELD_ATTRIBUTE_STATIC: u32 = 0x0010;

/// A field's id and name, as reported by `TYPE.GET_FIELDS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// The field id, usable with `TYPE.GET_VALUES`/`OBJECT_REF.GET_VALUES`.
    pub id: u32,
    /// The field name.
    pub name: Vec<u8>,
}

/// Decodes the `TYPE.GET_FIELDS` reply, filtering by the `FIELD_ATTRIBUTE_STATIC` bit against
/// the caller's `instance_level`/`class_level` selection.
pub fn decode_fields(
    payload: &[u8],
    instance_level: bool,
    class_level: bool,
) -> Result<Vec<FieldInfo>, ProtocolError> {
    let mut c = Cursor::new(payload);
    let count = wire::read_u32(&mut c)?;
    let mut res = Vec::new();
    for _ in 0..count {
        let id = wire::read_u32(&mut c)?;
        let name = wire::read_string(&mut c)?;
        let _type_id = wire::read_u32(&mut c)?;
        let attrs = wire::read_u32(&mut c)?;
        let is_static = attrs & FIELD_ATTRIBUTE_STATIC != 0;
        if (instance_level && !is_static) || (class_level && is_static) {
            res.push(FieldInfo { id, name });
        }
    }
    Ok(res)
}

/// Builds the `TYPE.GET_VALUES` / `OBJECT_REF.GET_VALUES` body: `id, field_count, field_ids...`.
pub fn encode_get_values(id: u32, field_ids: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + field_ids.len() * 4);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&(field_ids.len() as u32).to_be_bytes());
    for &f in field_ids {
        buf.extend_from_slice(&f.to_be_bytes());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn step_payload_matches_the_documented_layout() {
        let payload = encode_set_step(3, StepSize::Line, StepDepth::Into);
        assert_eq!(payload.len(), 20);
        assert_eq!(payload[0], super::super::event::EventCode::Step as u8);
        assert_eq!(payload[1], SuspendPolicy::All as u8);
        assert_eq!(payload[2], 1);
        assert_eq!(payload[3], MOD_KIND_STEP);
        assert_eq!(&payload[4..8], &3u32.to_be_bytes());
        assert_eq!(&payload[8..12], &1u32.to_be_bytes()); // LINE
        assert_eq!(&payload[12..16], &0u32.to_be_bytes()); // INTO
        assert_eq!(&payload[16..20], &0u32.to_be_bytes()); // filter
    }

    #[test]
    fn breakpoint_payload_matches_the_documented_layout() {
        let payload = encode_set_breakpoint(77, 0x10);
        assert_eq!(payload.len(), 16);
        assert_eq!(payload[3], MOD_KIND_LOCATION_ONLY);
        assert_eq!(&payload[4..8], &77u32.to_be_bytes());
        assert_eq!(&payload[8..16], &0x10u64.to_be_bytes());
    }

    #[test]
    fn vm_version_reply_decode() {
        let mut payload = vec![];
        wire::write_string(&mut payload, b"mono 2.38").unwrap();
        payload.extend_from_slice(&2u32.to_be_bytes());
        payload.extend_from_slice(&38u32.to_be_bytes());

        assert_eq!(decode_vm_version(&payload).unwrap(), (2, 38));
    }

    #[test]
    fn method_debug_info_find_returns_first_ge_entry_not_predecessor() {
        let info = MethodDebugInfo {
            code_size: 100,
            source_file: None,
            lines: vec![
                LineEntry {
                    il_offset: 0,
                    row: 1,
                    col: 1,
                },
                LineEntry {
                    il_offset: 10,
                    row: 2,
                    col: 1,
                },
                LineEntry {
                    il_offset: 20,
                    row: 3,
                    col: 1,
                },
            ],
        };

        // strictly between two entries: returns the later one.
        let found = info.find(5).unwrap();
        assert_eq!(found.il_offset, 10);
        assert_eq!(found.row, 2);

        // exact match returns that entry.
        assert_eq!(info.find(10).unwrap().row, 2);

        // past the last entry: nothing found.
        assert!(info.find(21).is_none());
    }

    #[test]
    fn array_length_reads_past_the_rank_count() {
        let mut payload = vec![];
        payload.extend_from_slice(&1u32.to_be_bytes()); // rank count
        payload.extend_from_slice(&42u32.to_be_bytes()); // first dim length
        assert_eq!(decode_array_length(&payload).unwrap(), 42);
    }
}
