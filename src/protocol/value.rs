//! The tagged-value wire format used for parameters, locals, fields and return values.

use std::io::Read;

use enum_primitive_derive::Primitive;
use num_traits::FromPrimitive;

use super::wire;
use super::ProtocolError;

/// A one-byte value-type tag, as read off the wire ahead of every encoded [`Value`].
///
/// Tags not represented here fail decoding with [`ProtocolError::InvalidValueTag`]; tags present
/// here but not implemented by [`decode_value`] fail with [`ProtocolError::UnsupportedValueTag`].
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Primitive)]
#[allow(missing_docs)]
pub enum ValueTag {
    Void = 0x01,
    Bool = 0x02,
    Char = 0x03,
    I1 = 0x04,
    U1 = 0x05,
    I2 = 0x06,
    U2 = 0x07,
    I4 = 0x08,
    U4 = 0x09,
    I8 = 0x0a,
    U8 = 0x0b,
    R4 = 0x0c,
    R8 = 0x0d,
    String = 0x0e,
    IntPtr = 0x0f,
    ByRef = 0x10,
    ValueType = 0x11,
    Class = 0x12,
    Var = 0x13,
    Array = 0x14,
    GenericInst = 0x15,
    TypedByRef = 0x16,
    I = 0x18,
    U = 0x19,
    FnPtr = 0x1b,
    Object = 0x1c,
    SzArray = 0x1d,
    MVar = 0x1e,
    CModReqD = 0x1f,
    CModOpt = 0x20,
    Internal = 0x21,
    Modifier = 0x40,
    Sentinel = 0x41,
    Pinned = 0x45,
    TypeMeta = 0x50,
    Boxed = 0x51,
    Enum = 0x55,
    Type = 0xf1,
    ParentVType = 0xf2,
    Null = 0xf0,
}

impl ValueTag {
    fn is_supported(self) -> bool {
        !matches!(
            self,
            ValueTag::ByRef
                | ValueTag::Var
                | ValueTag::GenericInst
                | ValueTag::TypedByRef
                | ValueTag::FnPtr
                | ValueTag::MVar
                | ValueTag::CModReqD
                | ValueTag::CModOpt
                | ValueTag::Internal
                | ValueTag::Modifier
                | ValueTag::Sentinel
                | ValueTag::Pinned
                | ValueTag::TypeMeta
                | ValueTag::Boxed
                | ValueTag::Enum
        )
    }
}

/// The kind of object an [`ObjectRef`] handle identifies.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum ObjectRefKind {
    Nil,
    String,
    SzArray,
    Class,
    Array,
    Object,
    Type,
}

/// A handle to a debuggee-side object, string, array, class or type.
///
/// `id == 0` and `kind == Nil` together mean a null reference; most handle kinds also treat
/// `id == 0` as null, but the kind is preserved as reported on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ObjectRef {
    /// Which kind of handle this is.
    pub kind: ObjectRefKind,
    /// The debuggee-assigned id, or 0 for null.
    pub id: u32,
}

/// A decoded parameter, local, field, or return value.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Value {
    Void,
    Bool(bool),
    Char(u16),
    I1(i8),
    U1(u8),
    I2(i16),
    U2(u16),
    I4(i32),
    U4(u32),
    I8(i64),
    U8(u64),
    F32(f32),
    F64(f64),
    IntPtr(u64),
    NativeInt(NativeInt),
    ObjectRef(ObjectRef),
    ValueType(ValueType),
    ParentVType(u32),
}

/// A native-sized integer, signed (`I`) or unsigned (`U`) on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum NativeInt {
    I(i64),
    U(u64),
}

/// A decoded struct value: a class id and its field values in declaration order.
///
/// The wire form carries an `is_enum` byte ahead of the class id; it's consumed to keep the byte
/// count right but not retained here, matching the original decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueType {
    /// The debuggee-assigned class id.
    pub class_id: u32,
    /// Field values, in declaration order.
    pub fields: Vec<Value>,
}

fn ref_kind(tag: ValueTag) -> ObjectRefKind {
    match tag {
        ValueTag::String => ObjectRefKind::String,
        ValueTag::Class => ObjectRefKind::Class,
        ValueTag::Array => ObjectRefKind::Array,
        ValueTag::Object => ObjectRefKind::Object,
        ValueTag::SzArray => ObjectRefKind::SzArray,
        ValueTag::Type => ObjectRefKind::Type,
        _ => ObjectRefKind::Nil,
    }
}

/// Decodes one [`Value`] from `r`, starting at a type tag.
///
/// Callers that need the number of bytes consumed (e.g. for testing against a fixed buffer) can
/// wrap `r` in a `Cursor` and compare positions before and after the call.
pub fn decode_value(r: &mut impl Read) -> Result<Value, ProtocolError> {
    let tag_byte = wire::read_u8(r)?;
    let tag =
        ValueTag::from_u8(tag_byte).ok_or(ProtocolError::InvalidValueTag(tag_byte))?;
    if !tag.is_supported() {
        return Err(ProtocolError::UnsupportedValueTag(tag_byte));
    }

    Ok(match tag {
        ValueTag::Void => Value::Void,
        ValueTag::Null => Value::ObjectRef(ObjectRef {
            kind: ObjectRefKind::Nil,
            id: 0,
        }),
        ValueTag::Bool => Value::Bool(wire::read_u32(r)? != 0),
        ValueTag::Char => Value::Char(wire::read_u32(r)? as u16),
        ValueTag::I1 => Value::I1(wire::read_u32(r)? as i8),
        ValueTag::U1 => Value::U1(wire::read_u32(r)? as u8),
        ValueTag::I2 => Value::I2(wire::read_u32(r)? as i16),
        ValueTag::U2 => Value::U2(wire::read_u32(r)? as u16),
        ValueTag::I4 => Value::I4(wire::read_u32(r)? as i32),
        ValueTag::U4 => Value::U4(wire::read_u32(r)?),
        ValueTag::R4 => Value::F32(f32::from_bits(wire::read_u32(r)?)),
        ValueTag::String
        | ValueTag::Class
        | ValueTag::Array
        | ValueTag::Object
        | ValueTag::SzArray
        | ValueTag::Type => Value::ObjectRef(ObjectRef {
            kind: ref_kind(tag),
            id: wire::read_u32(r)?,
        }),
        ValueTag::I8 => Value::I8(wire::read_u64(r)? as i64),
        ValueTag::U8 => Value::U8(wire::read_u64(r)?),
        ValueTag::R8 => Value::F64(f64::from_bits(wire::read_u64(r)?)),
        ValueTag::IntPtr => Value::IntPtr(wire::read_u64(r)?),
        ValueTag::I => Value::NativeInt(NativeInt::I(wire::read_u64(r)? as i64)),
        ValueTag::U => Value::NativeInt(NativeInt::U(wire::read_u64(r)?)),
        ValueTag::ValueType => {
            let _is_enum = wire::read_u8(r)?;
            let class_id = wire::read_u32(r)?;
            let field_count = wire::read_u32(r)?;
            let mut fields = Vec::with_capacity(field_count as usize);
            for _ in 0..field_count {
                fields.push(decode_value(r)?);
            }
            Value::ValueType(ValueType { class_id, fields })
        }
        ValueTag::ParentVType => Value::ParentVType(wire::read_u32(r)?),
        _ => unreachable!("unsupported tags are rejected above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn decodes_value_type_with_two_i4_fields() {
        let bytes: &[u8] = &[
            0x11, 0x00, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x00, 0x00, 0x02, 0x08, 0x00, 0x00, 0x00,
            0x07, 0x08, 0x00, 0x00, 0x00, 0x04,
        ];
        let mut c = Cursor::new(bytes);
        let value = decode_value(&mut c).unwrap();

        assert_eq!(
            value,
            Value::ValueType(ValueType {
                class_id: 42,
                fields: vec![Value::I4(7), Value::I4(4)],
            })
        );
        assert_eq!(c.position(), 20);
    }

    #[test]
    fn decodes_object_ref() {
        let bytes: &[u8] = &[0x1c, 0x00, 0x00, 0x00, 0x07];
        let mut c = Cursor::new(bytes);
        let value = decode_value(&mut c).unwrap();
        assert_eq!(
            value,
            Value::ObjectRef(ObjectRef {
                kind: ObjectRefKind::Object,
                id: 7,
            })
        );
        assert_eq!(c.position(), 5);
    }

    #[test]
    fn decodes_wide_integers() {
        let bytes: &[u8] = &[0x0a, 0, 0, 0, 0, 0, 0, 0, 9];
        let mut c = Cursor::new(bytes);
        assert_eq!(decode_value(&mut c).unwrap(), Value::I8(9));
        assert_eq!(c.position(), 9);
    }

    #[test]
    fn unsupported_tag_is_distinguished_from_invalid_tag() {
        let mut c = Cursor::new([0x10u8]);
        assert!(matches!(
            decode_value(&mut c),
            Err(ProtocolError::UnsupportedValueTag(0x10))
        ));

        let mut c = Cursor::new([0x99u8]);
        assert!(matches!(
            decode_value(&mut c),
            Err(ProtocolError::InvalidValueTag(0x99))
        ));
    }
}
