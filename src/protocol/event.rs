//! Parses inbound EVENT-set (64) packets into [`EventRecord`]s, including composite packets.

use std::io::Read;

use enum_primitive_derive::Primitive;
use num_traits::FromPrimitive;

use super::wire;
use super::ProtocolError;

/// The EVENT command set's own "command" codes: each names an event kind, except 100, which
/// bundles several of them into one packet.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Primitive)]
#[allow(missing_docs)]
pub enum EventCode {
    VmStart = 0,
    VmDeath = 1,
    ThreadStart = 2,
    ThreadDeath = 3,
    AppDomainCreate = 4,
    AppDomainUnload = 5,
    MethodEntry = 6,
    MethodExit = 7,
    AssemblyLoad = 8,
    AssemblyUnload = 9,
    Breakpoint = 10,
    Step = 11,
    TypeLoad = 12,
    Exception = 13,
    KeepAlive = 14,
    UserBreak = 15,
    UserLog = 16,
    Composite = 100,
}

/// How many threads the debuggee froze when the event fired.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Primitive)]
#[allow(missing_docs)]
pub enum SuspendPolicy {
    None = 0,
    EventThread = 1,
    All = 2,
}

/// A decoded event, normalized from whatever shape it had on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EventRecord {
    VmStart {
        thread_id: u32,
        object_id: u32,
    },
    VmDeath {
        thread_id: u32,
        exit_code: u32,
    },
    ThreadStart {
        thread_id: u32,
        object_id: u32,
    },
    ThreadDeath {
        thread_id: u32,
        object_id: u32,
    },
    AppDomainCreate {
        thread_id: u32,
        object_id: u32,
    },
    AppDomainUnload {
        thread_id: u32,
        object_id: u32,
    },
    MethodEntry {
        thread_id: u32,
        object_id: u32,
    },
    MethodExit {
        thread_id: u32,
        object_id: u32,
    },
    AssemblyLoad {
        thread_id: u32,
        object_id: u32,
    },
    AssemblyUnload {
        thread_id: u32,
        object_id: u32,
    },
    /// `offset` is a u32 because the wire's u64 IL offset is coerced to 0 when it exceeds
    /// `u32::MAX` (some runtimes send an all-ones sentinel there). Don't rely on this field.
    Breakpoint {
        thread_id: u32,
        method_id: u32,
        offset: u32,
    },
    /// See the caveat on [`EventRecord::Breakpoint`]'s `offset`.
    Step {
        thread_id: u32,
        method_id: u32,
        offset: u32,
    },
    TypeLoad {
        thread_id: u32,
        object_id: u32,
    },
    Exception {
        thread_id: u32,
        object_id: u32,
    },
    KeepAlive {
        thread_id: u32,
    },
    UserBreak {
        thread_id: u32,
    },
    /// `category` and `message` are kept as the two separate fields the wire sends. The
    /// original surfaces them joined as a single `msg = category + "\n" + message`; callers
    /// that want that form need to join them themselves.
    UserLog {
        thread_id: u32,
        level: u32,
        category: Vec<u8>,
        message: Vec<u8>,
    },
}

impl EventRecord {
    /// The thread the event is attributed to. `0` only ever occurs for malformed input, since
    /// every event body starts with a thread id.
    pub fn thread_id(&self) -> u32 {
        match self {
            EventRecord::VmStart { thread_id, .. }
            | EventRecord::VmDeath { thread_id, .. }
            | EventRecord::ThreadStart { thread_id, .. }
            | EventRecord::ThreadDeath { thread_id, .. }
            | EventRecord::AppDomainCreate { thread_id, .. }
            | EventRecord::AppDomainUnload { thread_id, .. }
            | EventRecord::MethodEntry { thread_id, .. }
            | EventRecord::MethodExit { thread_id, .. }
            | EventRecord::AssemblyLoad { thread_id, .. }
            | EventRecord::AssemblyUnload { thread_id, .. }
            | EventRecord::Breakpoint { thread_id, .. }
            | EventRecord::Step { thread_id, .. }
            | EventRecord::TypeLoad { thread_id, .. }
            | EventRecord::Exception { thread_id, .. }
            | EventRecord::KeepAlive { thread_id }
            | EventRecord::UserBreak { thread_id }
            | EventRecord::UserLog { thread_id, .. } => *thread_id,
        }
    }
}

fn coerce_il_offset(raw: u64) -> u32 {
    u32::try_from(raw).unwrap_or(0)
}

fn parse_one(code: EventCode, r: &mut impl Read) -> Result<EventRecord, ProtocolError> {
    let thread_id = wire::read_u32(r)?;
    Ok(match code {
        EventCode::VmStart => EventRecord::VmStart {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::VmDeath => EventRecord::VmDeath {
            thread_id,
            exit_code: wire::read_u32(r)?,
        },
        EventCode::ThreadStart => EventRecord::ThreadStart {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::ThreadDeath => EventRecord::ThreadDeath {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::AppDomainCreate => EventRecord::AppDomainCreate {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::AppDomainUnload => EventRecord::AppDomainUnload {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::MethodEntry => EventRecord::MethodEntry {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::MethodExit => EventRecord::MethodExit {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::AssemblyLoad => EventRecord::AssemblyLoad {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::AssemblyUnload => EventRecord::AssemblyUnload {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::Breakpoint => {
            let method_id = wire::read_u32(r)?;
            let offset = coerce_il_offset(wire::read_u64(r)?);
            EventRecord::Breakpoint {
                thread_id,
                method_id,
                offset,
            }
        }
        EventCode::Step => {
            let method_id = wire::read_u32(r)?;
            let offset = coerce_il_offset(wire::read_u64(r)?);
            EventRecord::Step {
                thread_id,
                method_id,
                offset,
            }
        }
        EventCode::TypeLoad => EventRecord::TypeLoad {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::Exception => EventRecord::Exception {
            thread_id,
            object_id: wire::read_u32(r)?,
        },
        EventCode::KeepAlive => EventRecord::KeepAlive { thread_id },
        EventCode::UserBreak => EventRecord::UserBreak { thread_id },
        EventCode::UserLog => {
            let level = wire::read_u32(r)?;
            let category = wire::read_string(r)?;
            let message = wire::read_string(r)?;
            EventRecord::UserLog {
                thread_id,
                level,
                category,
                message,
            }
        }
        EventCode::Composite => unreachable!("composite is unwrapped by parse_event_packet"),
    })
}

/// Parses one EVENT-set packet body (the `cmd` byte names the top-level event code) into zero or
/// more records, recursively expanding composite packets in wire order.
pub fn parse_event_packet(cmd: u8, payload: &[u8]) -> Result<Vec<EventRecord>, ProtocolError> {
    let code = EventCode::from_u8(cmd).ok_or(ProtocolError::InvalidEventCode(cmd))?;
    let mut r = std::io::Cursor::new(payload);

    if code != EventCode::Composite {
        return Ok(vec![parse_one(code, &mut r)?]);
    }

    let _suspend_policy = wire::read_u8(&mut r)?;
    let count = wire::read_u32(&mut r)?;
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let sub_code_byte = wire::read_u8(&mut r)?;
        let sub_code =
            EventCode::from_u8(sub_code_byte).ok_or(ProtocolError::InvalidEventCode(sub_code_byte))?;
        let _event_request_id = wire::read_u32(&mut r)?;
        records.push(parse_one(sub_code, &mut r)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vm_start_event() {
        let payload: &[u8] = &[0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01];
        let records = parse_event_packet(EventCode::VmStart as u8, payload).unwrap();
        assert_eq!(
            records,
            vec![EventRecord::VmStart {
                thread_id: 7,
                object_id: 1,
            }]
        );
    }

    #[test]
    fn composite_emits_sub_events_in_order() {
        let mut payload = vec![2u8]; // suspend_policy = ALL
        payload.extend_from_slice(&2u32.to_be_bytes()); // count

        // sub-event 1: THREAD_START, event_request_id discarded, thread 5
        payload.push(EventCode::ThreadStart as u8);
        payload.extend_from_slice(&5u32.to_be_bytes());
        payload.extend_from_slice(&5u32.to_be_bytes());

        // sub-event 2: THREAD_START, different request id, thread 6
        payload.push(EventCode::ThreadStart as u8);
        payload.extend_from_slice(&9u32.to_be_bytes());
        payload.extend_from_slice(&6u32.to_be_bytes());

        let records = parse_event_packet(EventCode::Composite as u8, &payload).unwrap();
        assert_eq!(
            records,
            vec![
                EventRecord::ThreadStart {
                    thread_id: 5,
                    object_id: 5,
                },
                EventRecord::ThreadStart {
                    thread_id: 6,
                    object_id: 6,
                },
            ]
        );
    }

    #[test]
    fn step_event_coerces_overflowing_il_offset_to_zero() {
        let mut payload = vec![];
        payload.extend_from_slice(&3u32.to_be_bytes()); // thread_id
        payload.extend_from_slice(&42u32.to_be_bytes()); // method_id
        payload.extend_from_slice(&u64::MAX.to_be_bytes()); // il offset, overflowing

        let records = parse_event_packet(EventCode::Step as u8, &payload).unwrap();
        assert_eq!(
            records,
            vec![EventRecord::Step {
                thread_id: 3,
                method_id: 42,
                offset: 0,
            }]
        );
    }

    #[test]
    fn user_log_carries_level_and_two_strings() {
        let mut payload = vec![];
        payload.extend_from_slice(&1u32.to_be_bytes()); // thread_id
        payload.extend_from_slice(&2u32.to_be_bytes()); // level
        wire::write_string(&mut payload, b"category").unwrap();
        wire::write_string(&mut payload, b"message").unwrap();

        let records = parse_event_packet(EventCode::UserLog as u8, &payload).unwrap();
        assert_eq!(
            records,
            vec![EventRecord::UserLog {
                thread_id: 1,
                level: 2,
                category: b"category".to_vec(),
                message: b"message".to_vec(),
            }]
        );
    }
}
