//! An implementation of the Mono Soft Debugger Wire Protocol.

pub mod event;
mod error;
pub mod frame;
pub mod requests;
pub mod thread_state;
pub mod value;
pub mod wire;

pub use error::*;
pub use event::{EventCode, EventRecord, SuspendPolicy};
pub use frame::{ConnectionState, Frame, FrameKind, Framer, HANDSHAKE};
pub use thread_state::{ThreadState, ThreadStateFlags};
pub use value::{NativeInt, ObjectRef, ObjectRefKind, Value, ValueType};

/// Protocol major version this library speaks.
pub const MAJOR_VERSION: u32 = 2;

/// Protocol minor version this library speaks.
pub const MINOR_VERSION: u32 = 38;

/// Command set: virtual machine control.
pub const CMD_SET_VM: u8 = 1;
/// Command set: heap object references.
pub const CMD_SET_OBJECT_REF: u8 = 9;
/// Command set: interned strings.
pub const CMD_SET_STRING_REF: u8 = 10;
/// Command set: per-thread operations.
pub const CMD_SET_THREAD: u8 = 11;
/// Command set: array references.
pub const CMD_SET_ARRAY_REF: u8 = 13;
/// Command set: event subscription management.
pub const CMD_SET_EVENT_REQUEST: u8 = 15;
/// Command set: stack frame introspection.
pub const CMD_SET_STACK_FRAME: u8 = 16;
/// Command set: app domains.
pub const CMD_SET_APPDOMAIN: u8 = 20;
/// Command set: assemblies.
pub const CMD_SET_ASSEMBLY: u8 = 21;
/// Command set: methods.
pub const CMD_SET_METHOD: u8 = 22;
/// Command set: types.
pub const CMD_SET_TYPE: u8 = 23;
/// Command set: modules.
pub const CMD_SET_MODULE: u8 = 24;
/// Command set: fields.
pub const CMD_SET_FIELD: u8 = 25;
/// Command set: inbound event notifications.
pub const CMD_SET_EVENT: u8 = 64;

/// `VM.VERSION`.
pub const CMD_VM_VERSION: u8 = 1;
/// `VM.ALL_THREADS`.
pub const CMD_VM_ALL_THREADS: u8 = 2;
/// `VM.SUSPEND`.
pub const CMD_VM_SUSPEND: u8 = 3;
/// `VM.RESUME`.
pub const CMD_VM_RESUME: u8 = 4;
/// `VM.EXIT`.
pub const CMD_VM_EXIT: u8 = 5;
/// `VM.DISPOSE`.
pub const CMD_VM_DISPOSE: u8 = 6;
/// `VM.INVOKE_METHOD`.
pub const CMD_VM_INVOKE_METHOD: u8 = 7;
/// `VM.SET_PROTOCOL_VERSION`.
pub const CMD_VM_SET_PROTOCOL_VERSION: u8 = 8;
/// `VM.ABORT_INVOKE`.
pub const CMD_VM_ABORT_INVOKE: u8 = 9;
/// `VM.SET_KEEPALIVE`.
pub const CMD_VM_SET_KEEPALIVE: u8 = 10;
/// `VM.GET_TYPES_FOR_SOURCE_FILE`.
pub const CMD_VM_GET_TYPES_FOR_SOURCE_FILE: u8 = 11;
/// `VM.GET_TYPES`.
pub const CMD_VM_GET_TYPES: u8 = 12;

/// `EVENT_REQUEST.SET`.
pub const CMD_EVENT_REQUEST_SET: u8 = 1;
/// `EVENT_REQUEST.CLEAR`.
pub const CMD_EVENT_REQUEST_CLEAR: u8 = 2;
/// `EVENT_REQUEST.CLEAR_ALL_BREAKPOINTS`.
pub const CMD_EVENT_REQUEST_CLEAR_ALL_BREAKPOINTS: u8 = 3;

/// `THREAD.GET_FRAME_INFO`.
pub const CMD_THREAD_GET_FRAME_INFO: u8 = 1;
/// `THREAD.GET_NAME`.
pub const CMD_THREAD_GET_NAME: u8 = 2;
/// `THREAD.GET_STATE`.
pub const CMD_THREAD_GET_STATE: u8 = 3;
/// `THREAD.GET_INFO`.
pub const CMD_THREAD_GET_INFO: u8 = 4;

/// `STACK_FRAME.GET_VALUES`.
pub const CMD_STACK_FRAME_GET_VALUES: u8 = 1;
/// `STACK_FRAME.GET_THIS`.
pub const CMD_STACK_FRAME_GET_THIS: u8 = 2;
/// `STACK_FRAME.SET_VALUES`.
pub const CMD_STACK_FRAME_SET_VALUES: u8 = 3;

/// `APPDOMAIN.GET_ROOT_DOMAIN`.
pub const CMD_APPDOMAIN_GET_ROOT_DOMAIN: u8 = 1;
/// `APPDOMAIN.GET_FRIENDLY_NAME`.
pub const CMD_APPDOMAIN_GET_FRIENDLY_NAME: u8 = 2;
/// `APPDOMAIN.GET_ASSEMBLIES`.
pub const CMD_APPDOMAIN_GET_ASSEMBLIES: u8 = 3;
/// `APPDOMAIN.GET_ENTRY_ASSEMBLY`.
pub const CMD_APPDOMAIN_GET_ENTRY_ASSEMBLY: u8 = 4;
/// `APPDOMAIN.CREATE_STRING`.
pub const CMD_APPDOMAIN_CREATE_STRING: u8 = 5;
/// `APPDOMAIN.GET_CORLIB`.
pub const CMD_APPDOMAIN_GET_CORLIB: u8 = 6;
/// `APPDOMAIN.CREATE_BOXED_VALUE`.
pub const CMD_APPDOMAIN_CREATE_BOXED_VALUE: u8 = 7;

/// `ASSEMBLY.GET_LOCATION`.
pub const CMD_ASSEMBLY_GET_LOCATION: u8 = 1;
/// `ASSEMBLY.GET_ENTRY_POINT`.
pub const CMD_ASSEMBLY_GET_ENTRY_POINT: u8 = 2;
/// `ASSEMBLY.GET_MANIFEST_MODULE`.
pub const CMD_ASSEMBLY_GET_MANIFEST_MODULE: u8 = 3;
/// `ASSEMBLY.GET_OBJECT`.
pub const CMD_ASSEMBLY_GET_OBJECT: u8 = 4;
/// `ASSEMBLY.GET_TYPE`.
pub const CMD_ASSEMBLY_GET_TYPE: u8 = 5;
/// `ASSEMBLY.GET_NAME`.
pub const CMD_ASSEMBLY_GET_NAME: u8 = 6;

/// `METHOD.GET_NAME`.
pub const CMD_METHOD_GET_NAME: u8 = 1;
/// `METHOD.GET_DECLARING_TYPE`.
pub const CMD_METHOD_GET_DECLARING_TYPE: u8 = 2;
/// `METHOD.GET_DEBUG_INFO`.
pub const CMD_METHOD_GET_DEBUG_INFO: u8 = 3;
/// `METHOD.GET_PARAM_INFO`.
pub const CMD_METHOD_GET_PARAM_INFO: u8 = 4;
/// `METHOD.GET_LOCALS_INFO`.
pub const CMD_METHOD_GET_LOCALS_INFO: u8 = 5;
/// `METHOD.GET_INFO`.
pub const CMD_METHOD_GET_INFO: u8 = 6;
/// `METHOD.GET_BODY`.
pub const CMD_METHOD_GET_BODY: u8 = 7;
/// `METHOD.RESOLVE_TOKEN`.
pub const CMD_METHOD_RESOLVE_TOKEN: u8 = 8;

/// `TYPE.GET_INFO`.
pub const CMD_TYPE_GET_INFO: u8 = 1;
/// `TYPE.GET_METHODS`.
pub const CMD_TYPE_GET_METHODS: u8 = 2;
/// `TYPE.GET_FIELDS`.
pub const CMD_TYPE_GET_FIELDS: u8 = 3;
/// `TYPE.GET_VALUES`.
pub const CMD_TYPE_GET_VALUES: u8 = 4;
/// `TYPE.GET_OBJECT`.
pub const CMD_TYPE_GET_OBJECT: u8 = 5;
/// `TYPE.GET_SOURCE_FILES`.
pub const CMD_TYPE_GET_SOURCE_FILES: u8 = 6;
/// `TYPE.SET_VALUES`.
pub const CMD_TYPE_SET_VALUES: u8 = 7;
/// `TYPE.IS_ASSIGNABLE_FROM`.
pub const CMD_TYPE_IS_ASSIGNABLE_FROM: u8 = 8;

/// `OBJECT_REF.GET_TYPE`.
pub const CMD_OBJECT_REF_GET_TYPE: u8 = 1;
/// `OBJECT_REF.GET_VALUES`.
pub const CMD_OBJECT_REF_GET_VALUES: u8 = 2;
/// `OBJECT_REF.IS_COLLECTED`.
pub const CMD_OBJECT_REF_IS_COLLECTED: u8 = 3;
/// `OBJECT_REF.GET_ADDRESS`.
pub const CMD_OBJECT_REF_GET_ADDRESS: u8 = 4;
/// `OBJECT_REF.GET_DOMAIN`.
pub const CMD_OBJECT_REF_GET_DOMAIN: u8 = 5;
/// `OBJECT_REF.SET_VALUES`.
pub const CMD_OBJECT_REF_SET_VALUES: u8 = 6;

/// `STRING_REF.GET_VALUE`.
pub const CMD_STRING_REF_GET_VALUE: u8 = 1;

/// `ARRAY_REF.GET_LENGTH`.
pub const CMD_ARRAY_REF_GET_LENGTH: u8 = 1;
/// `ARRAY_REF.GET_VALUES`.
pub const CMD_ARRAY_REF_GET_VALUES: u8 = 2;
/// `ARRAY_REF.SET_VALUES`.
pub const CMD_ARRAY_REF_SET_VALUES: u8 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_sets_are_distinct() {
        let sets = [
            CMD_SET_VM,
            CMD_SET_OBJECT_REF,
            CMD_SET_STRING_REF,
            CMD_SET_THREAD,
            CMD_SET_ARRAY_REF,
            CMD_SET_EVENT_REQUEST,
            CMD_SET_STACK_FRAME,
            CMD_SET_APPDOMAIN,
            CMD_SET_ASSEMBLY,
            CMD_SET_METHOD,
            CMD_SET_TYPE,
            CMD_SET_MODULE,
            CMD_SET_FIELD,
            CMD_SET_EVENT,
        ];
        for (i, a) in sets.iter().enumerate() {
            for b in &sets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
