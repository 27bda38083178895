//! The public `Debugger` facade: session lifecycle, execution control, and the introspection
//! surface, all built on the [`protocol`] codec/framer/event layers and the reactor below.

use std::{
    net::SocketAddr,
    sync::{mpsc::Receiver, Mutex},
};

use num_traits::FromPrimitive;

use super::protocol::{
    self, requests,
    requests::{LineEntry, MethodDebugInfo, MethodFlags, StackFrame, StepDepth, StepSize},
    ErrorCode, EventRecord, ThreadState, Value,
};

mod reactor;
mod state;

use reactor::{RawEvent, Reactor, ReactorHandle};
use state::{BreakpointKey, BreakpointRegistry, StepMode, StepState};

pub use state::StepMode as Mode;

/// An error encountered by a [`Debugger`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A protocol-level error: the Codec or Framer couldn't make sense of the bytes on the wire.
    #[error("protocol error")]
    Protocol(#[from] protocol::ProtocolError),
    /// The debuggee's VM is older than the version this library speaks.
    #[error("the VM is too old for this application")]
    VmTooOld,
    /// The debuggee returned an error code for the request.
    #[error("debuggee error: {0:?}")]
    ServerError(ErrorCode),
    /// An operation that depends on a capability never wired up in the original implementation
    /// (see `call_user_break`'s documentation).
    #[error("precondition not met: {0}")]
    PreconditionNotMet(&'static str),
    /// An I/O error occurred reading or writing the socket, or communicating with the reactor
    /// thread.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// The session has disconnected, usually because the debuggee closed the socket or a
    /// protocol error occurred.
    #[error("disconnected")]
    Disconnected,
    /// A request's reply didn't arrive within the 20-second deadline every transaction carries.
    /// The connection is torn down as a result; subsequent calls fail with [`Self::Disconnected`].
    #[error("reply timed out")]
    Timeout,
}

/// The result of a [`Debugger`] operation.
pub type Result<T> = std::result::Result<T, ClientError>;

/// A single debugging session: one accepted debuggee connection plus the client-side bookkeeping
/// (breakpoints, step mode) that has no wire representation of its own.
pub struct Debugger {
    handle: ReactorHandle,
    events: Mutex<Receiver<RawEvent>>,
    breakpoints: Mutex<BreakpointRegistry>,
    step: Mutex<StepState>,
}

impl std::fmt::Debug for Debugger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debugger").finish_non_exhaustive()
    }
}

impl Debugger {
    /// Binds a loopback listener on `port` (0 lets the OS choose) and spawns the reactor thread.
    /// Returns the session and the address the debuggee should be told to connect to.
    ///
    /// The session isn't usable for execution control or introspection until [`Self::accept`]
    /// completes — the original runs its initial setup synchronously off the first inbound
    /// packet, and this implementation keeps that ordering.
    pub fn listen(port: u16) -> Result<(Self, SocketAddr)> {
        let (handle, addr, events) = Reactor::spawn(port)?;
        let debugger = Debugger {
            handle,
            events: Mutex::new(events),
            breakpoints: Mutex::new(BreakpointRegistry::default()),
            step: Mutex::new(StepState::default()),
        };
        Ok((debugger, addr))
    }

    /// Waits for the debuggee to connect and send its `VM_START` event, then performs the
    /// initial setup handshake: fetches the VM's protocol version, refuses if it's older than
    /// this library, sets the protocol version, and subscribes to `ASSEMBLY_LOAD`.
    pub async fn accept(&self) -> Result<()> {
        let RawEvent { cmd, payload } = self.next_raw_event()?;
        let records = protocol::event::parse_event_packet(cmd, &payload)?;
        if !records.iter().any(|r| matches!(r, EventRecord::VmStart { .. })) {
            return Err(ClientError::Protocol(protocol::ProtocolError::Invalid(
                "expected VM_START as the first inbound event".to_string(),
            )));
        }

        let (major, minor) = self.vm_version().await?;
        if (major, minor) < (protocol::MAJOR_VERSION, protocol::MINOR_VERSION) {
            return Err(ClientError::VmTooOld);
        }

        let payload = requests::encode_set_protocol_version(
            protocol::MAJOR_VERSION,
            protocol::MINOR_VERSION,
        );
        self.call(protocol::CMD_SET_VM, protocol::CMD_VM_SET_PROTOCOL_VERSION, payload)
            .await?;

        let payload = requests::encode_set_assembly_load_subscription();
        self.call(
            protocol::CMD_SET_EVENT_REQUEST,
            protocol::CMD_EVENT_REQUEST_SET,
            payload,
        )
        .await?;

        Ok(())
    }

    fn next_raw_event(&self) -> Result<RawEvent> {
        self.events
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| ClientError::Disconnected)
    }

    /// Blocks until the next inbound event packet, returning every record it carries (more than
    /// one for a composite packet) in wire order.
    pub fn next_event(&self) -> Result<Vec<EventRecord>> {
        let raw = self.next_raw_event()?;
        Ok(protocol::event::parse_event_packet(raw.cmd, &raw.payload)?)
    }

    async fn call(&self, cmd_set: u8, cmd: u8, payload: Vec<u8>) -> Result<Vec<u8>> {
        let (err, payload) = self.handle.roundtrip(cmd_set, cmd, payload).await?;
        if err == 0 {
            return Ok(payload);
        }
        let code = ErrorCode::from_u16(err as u16)
            .ok_or(protocol::ProtocolError::UnrecognizedErrorCode(err as u16))?;
        Err(ClientError::ServerError(code))
    }

    /// Issues `vm_exit(0)` best-effort, then drops the connection.
    pub async fn close(&self) {
        let _ = self.exit(0).await;
    }

    /// Resumes the debuggee. If a step request is active, clears it first.
    pub async fn resume(&self) -> Result<()> {
        let active = self.step.lock().unwrap().active_request_id();
        if let Some(request_id) = active {
            let payload = requests::encode_clear_step(request_id);
            self.call(
                protocol::CMD_SET_EVENT_REQUEST,
                protocol::CMD_EVENT_REQUEST_CLEAR,
                payload,
            )
            .await?;
            self.step.lock().unwrap().clear();
        }
        self.call(protocol::CMD_SET_VM, protocol::CMD_VM_RESUME, Vec::new())
            .await?;
        Ok(())
    }

    /// Suspends the debuggee.
    pub async fn suspend(&self) -> Result<()> {
        self.call(protocol::CMD_SET_VM, protocol::CMD_VM_SUSPEND, Vec::new())
            .await?;
        Ok(())
    }

    /// Requests the debuggee exit with `code`. The debuggee doesn't reply past teardown, so a
    /// disconnect here is expected, not an error.
    pub async fn exit(&self, code: u32) -> Result<()> {
        match self
            .call(protocol::CMD_SET_VM, protocol::CMD_VM_EXIT, requests::encode_vm_exit(code))
            .await
        {
            Ok(_) | Err(ClientError::Disconnected) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Arms a STEP event request for `thread` with the given size and depth, then resumes. Mode
    /// identity is depth-only: if `depth` already matches the active mode, this just resumes,
    /// even if `size` differs from what was last armed.
    pub async fn step(&self, thread_id: u32, size: StepSize, depth: StepDepth) -> Result<()> {
        let already_armed =
            matches!(self.step.lock().unwrap().mode(), StepMode::Stepping(d) if d == depth);

        if !already_armed {
            if let Some(request_id) = self.step.lock().unwrap().active_request_id() {
                let payload = requests::encode_clear_step(request_id);
                self.call(
                    protocol::CMD_SET_EVENT_REQUEST,
                    protocol::CMD_EVENT_REQUEST_CLEAR,
                    payload,
                )
                .await?;
            }

            let payload = requests::encode_set_step(thread_id, size, depth);
            let reply = self
                .call(
                    protocol::CMD_SET_EVENT_REQUEST,
                    protocol::CMD_EVENT_REQUEST_SET,
                    payload,
                )
                .await?;
            let request_id = requests::decode_request_id(&reply)?;
            self.step.lock().unwrap().arm(depth, request_id);
        }

        self.call(protocol::CMD_SET_VM, protocol::CMD_VM_RESUME, Vec::new())
            .await?;
        Ok(())
    }

    /// The step mode currently armed, if any.
    pub fn current_step_mode(&self) -> Mode {
        self.step.lock().unwrap().mode()
    }

    /// Registers a breakpoint at `(method_id, il_offset)`. Idempotent: a second call with the
    /// same key returns `Ok` without issuing a new request.
    pub async fn add_breakpoint(&self, method_id: u32, il_offset: u64) -> Result<()> {
        let key = BreakpointKey { method_id, il_offset };
        if self.breakpoints.lock().unwrap().get(key).is_some() {
            return Ok(());
        }

        let payload = requests::encode_set_breakpoint(method_id, il_offset);
        let reply = self
            .call(
                protocol::CMD_SET_EVENT_REQUEST,
                protocol::CMD_EVENT_REQUEST_SET,
                payload,
            )
            .await?;
        let request_id = requests::decode_request_id(&reply)?;
        self.breakpoints.lock().unwrap().insert(key, request_id);
        Ok(())
    }

    /// Removes the breakpoint at `(method_id, il_offset)`. Idempotent on an absent key.
    pub async fn remove_breakpoint(&self, method_id: u32, il_offset: u64) -> Result<()> {
        let key = BreakpointKey { method_id, il_offset };
        let Some(request_id) = self.breakpoints.lock().unwrap().remove(key) else {
            return Ok(());
        };

        let payload = requests::encode_clear_breakpoint(request_id);
        self.call(
            protocol::CMD_SET_EVENT_REQUEST,
            protocol::CMD_EVENT_REQUEST_CLEAR,
            payload,
        )
        .await?;
        Ok(())
    }

    /// Wipes every breakpoint, server-side and in the local registry.
    pub async fn clear_all_breakpoints(&self) -> Result<()> {
        self.call(
            protocol::CMD_SET_EVENT_REQUEST,
            protocol::CMD_EVENT_REQUEST_CLEAR_ALL_BREAKPOINTS,
            Vec::new(),
        )
        .await?;
        self.breakpoints.lock().unwrap().clear();
        Ok(())
    }

    /// Subscribes to the `USER_BREAK` event kind with `suspend_policy = ALL`.
    pub async fn enable_user_break(&self) -> Result<()> {
        let payload = requests::encode_set_user_break_subscription();
        self.call(
            protocol::CMD_SET_EVENT_REQUEST,
            protocol::CMD_EVENT_REQUEST_SET,
            payload,
        )
        .await?;
        Ok(())
    }

    /// Would invoke `System.Diagnostics.Debugger.Break()` in the debuggee. Always fails: the
    /// method id it needs comes from a lookup (`find_types("System.Diagnostics.Debugger")` then
    /// `methods_of(type, "Break")`) that exists in the original only behind a disabled code path,
    /// so nothing ever populates it. Kept so the API surface matches the original 1:1.
    pub async fn call_user_break(&self, _thread_id: u32) -> Result<()> {
        Err(ClientError::PreconditionNotMet(
            "the break method id is never resolved; this operation is permanently unreachable",
        ))
    }

    /// All live thread ids, in wire order.
    pub async fn all_threads(&self) -> Result<Vec<u32>> {
        let reply = self
            .call(protocol::CMD_SET_VM, protocol::CMD_VM_ALL_THREADS, Vec::new())
            .await?;
        Ok(requests::decode_all_threads(&reply)?)
    }

    /// The thread's display name.
    pub async fn thread_name(&self, thread_id: u32) -> Result<Vec<u8>> {
        let reply = self
            .call(
                protocol::CMD_SET_THREAD,
                protocol::CMD_THREAD_GET_NAME,
                requests::encode_id(thread_id),
            )
            .await?;
        Ok(requests::decode_string(&reply)?)
    }

    /// The thread's simplified state, mapped by priority from the raw bitmask.
    pub async fn thread_state(&self, thread_id: u32) -> Result<ThreadState> {
        let reply = self
            .call(
                protocol::CMD_SET_THREAD,
                protocol::CMD_THREAD_GET_STATE,
                requests::encode_id(thread_id),
            )
            .await?;
        let raw = requests::decode_u32(&reply)?;
        let flags = protocol::ThreadStateFlags::from_bits_truncate(raw);
        Ok(protocol::thread_state::thread_state_from_flags(flags))
    }

    /// The thread's call stack, top of stack first.
    pub async fn stack(&self, thread_id: u32) -> Result<Vec<StackFrame>> {
        let reply = self
            .call(
                protocol::CMD_SET_THREAD,
                protocol::CMD_THREAD_GET_FRAME_INFO,
                requests::encode_get_stack(thread_id),
            )
            .await?;
        Ok(requests::decode_stack(&reply)?)
    }

    /// The `this` reference for a frame, or `None` for a static method or the top of a value-type
    /// call.
    pub async fn frame_this(&self, thread_id: u32, frame_id: u32) -> Result<Option<Value>> {
        let reply = self
            .call(
                protocol::CMD_SET_STACK_FRAME,
                protocol::CMD_STACK_FRAME_GET_THIS,
                requests::encode_frame_scope(thread_id, frame_id),
            )
            .await?;
        Ok(requests::decode_this(&reply)?)
    }

    /// The values of `method`'s parameters in `frame`, prefixed by `this` when the method isn't
    /// static. Parameter indexes are encoded on the wire as `-i - 1` for `i` in `0..param_count`.
    pub async fn param_values(
        &self,
        thread_id: u32,
        frame_id: u32,
        method_id: u32,
    ) -> Result<Vec<Value>> {
        let flags = self.method_flags(method_id).await?;
        let param_count = self.param_count(method_id).await?;

        let mut values = Vec::new();
        if !flags.is_static() {
            if let Some(this) = self.frame_this(thread_id, frame_id).await? {
                values.push(this);
            }
        }

        if param_count == 0 {
            return Ok(values);
        }

        let indexes: Vec<i32> = (0..param_count as i32).map(|i| -i - 1).collect();
        let payload = requests::encode_frame_get_values(thread_id, frame_id, &indexes);
        let reply = self
            .call(
                protocol::CMD_SET_STACK_FRAME,
                protocol::CMD_STACK_FRAME_GET_VALUES,
                payload,
            )
            .await?;
        values.extend(requests::decode_values(&reply, param_count as usize)?);
        Ok(values)
    }

    /// The values of `method`'s locals in `frame`.
    pub async fn local_values(
        &self,
        thread_id: u32,
        frame_id: u32,
        method_id: u32,
    ) -> Result<Vec<Value>> {
        let local_count = self.locals_count(method_id).await?;
        if local_count == 0 {
            return Ok(Vec::new());
        }

        let indexes: Vec<i32> = (0..local_count as i32).collect();
        let payload = requests::encode_frame_get_values(thread_id, frame_id, &indexes);
        let reply = self
            .call(
                protocol::CMD_SET_STACK_FRAME,
                protocol::CMD_STACK_FRAME_GET_VALUES,
                payload,
            )
            .await?;
        Ok(requests::decode_values(&reply, local_count as usize)?)
    }

    /// The VM's reported protocol version, `(major, minor)`.
    pub async fn vm_version(&self) -> Result<(u32, u32)> {
        let reply = self
            .call(protocol::CMD_SET_VM, protocol::CMD_VM_VERSION, Vec::new())
            .await?;
        Ok(requests::decode_vm_version(&reply)?)
    }

    /// The corlib assembly id for `domain`.
    pub async fn core_lib(&self, domain_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_APPDOMAIN,
                protocol::CMD_APPDOMAIN_GET_CORLIB,
                requests::encode_id(domain_id),
            )
            .await?;
        Ok(requests::decode_u32(&reply)?)
    }

    /// Looks up every type matching an assembly-qualified `name`.
    pub async fn find_types(&self, name: &[u8]) -> Result<Vec<u32>> {
        let reply = self
            .call(
                protocol::CMD_SET_VM,
                protocol::CMD_VM_GET_TYPES,
                requests::encode_name_query(name),
            )
            .await?;
        Ok(requests::decode_id_list(&reply)?)
    }

    /// Looks up a type by bare `name` within `assembly_id`. `0` means not found.
    pub async fn find_type(&self, assembly_id: u32, name: &[u8]) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_ASSEMBLY,
                protocol::CMD_ASSEMBLY_GET_TYPE,
                requests::encode_find_type(assembly_id, name),
            )
            .await?;
        Ok(requests::decode_u32(&reply)?)
    }

    /// Every type id declared in `source_path`.
    pub async fn types_of(&self, source_path: &[u8]) -> Result<Vec<u32>> {
        let reply = self
            .call(
                protocol::CMD_SET_VM,
                protocol::CMD_VM_GET_TYPES_FOR_SOURCE_FILE,
                requests::encode_name_query(source_path),
            )
            .await?;
        Ok(requests::decode_id_list(&reply)?)
    }

    /// A method's fully-qualified name.
    pub async fn method_name(&self, method_id: u32) -> Result<Vec<u8>> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_NAME,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_string(&reply)?)
    }

    /// The type id that declares `method_id`, or `0` if none.
    pub async fn method_owner(&self, method_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_DECLARING_TYPE,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_u32(&reply)?)
    }

    /// Source-line debug info for `method_id`.
    pub async fn method_debug_info(&self, method_id: u32) -> Result<MethodDebugInfo> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_DEBUG_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_method_debug_info(&reply)?)
    }

    /// Finds the [`LineEntry`] the given IL offset falls on, via a forward linear scan.
    pub async fn find_line(&self, method_id: u32, il_offset: u32) -> Result<Option<LineEntry>> {
        Ok(self.method_debug_info(method_id).await?.find(il_offset).copied())
    }

    /// The method's raw IL bytes.
    pub async fn method_body(&self, method_id: u32) -> Result<Vec<u8>> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_BODY,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_method_body(&reply)?)
    }

    /// A method's attribute and implementation flags.
    pub async fn method_flags(&self, method_id: u32) -> Result<MethodFlags> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_method_flags(&reply)?)
    }

    /// A method's parameter count.
    pub async fn param_count(&self, method_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_PARAM_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_param_count(&reply)?)
    }

    /// A method's parameter names, in declaration order.
    pub async fn param_names(&self, method_id: u32) -> Result<Vec<Vec<u8>>> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_PARAM_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_param_names(&reply)?)
    }

    /// A method's local-variable count.
    pub async fn locals_count(&self, method_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_LOCALS_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_locals_count(&reply)?)
    }

    /// A method's local-variable names.
    pub async fn local_names(&self, method_id: u32) -> Result<Vec<Vec<u8>>> {
        let reply = self
            .call(
                protocol::CMD_SET_METHOD,
                protocol::CMD_METHOD_GET_LOCALS_INFO,
                requests::encode_id(method_id),
            )
            .await?;
        Ok(requests::decode_local_names(&reply)?)
    }

    /// A type's identifying info.
    pub async fn type_info(&self, type_id: u32) -> Result<requests::TypeInfo> {
        let reply = self
            .call(
                protocol::CMD_SET_TYPE,
                protocol::CMD_TYPE_GET_INFO,
                requests::encode_id(type_id),
            )
            .await?;
        Ok(requests::decode_type_info(&reply)?)
    }

    /// The `System.Type` object id representing `type_id`.
    pub async fn type_object(&self, type_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_TYPE,
                protocol::CMD_TYPE_GET_OBJECT,
                requests::encode_id(type_id),
            )
            .await?;
        Ok(requests::decode_u32(&reply)?)
    }

    /// Every method id declared on `type_id`, optionally filtered to those whose
    /// [`Self::method_name`] equals `name_filter`.
    pub async fn methods_of(&self, type_id: u32, name_filter: Option<&[u8]>) -> Result<Vec<u32>> {
        let reply = self
            .call(
                protocol::CMD_SET_TYPE,
                protocol::CMD_TYPE_GET_METHODS,
                requests::encode_id(type_id),
            )
            .await?;
        let ids = requests::decode_id_list(&reply)?;

        let Some(filter) = name_filter else {
            return Ok(ids);
        };

        let mut matching = Vec::new();
        for id in ids {
            if self.method_name(id).await? == filter {
                matching.push(id);
            }
        }
        Ok(matching)
    }

    /// The runtime type id of `object_id`.
    pub async fn object_type(&self, object_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_OBJECT_REF,
                protocol::CMD_OBJECT_REF_GET_TYPE,
                requests::encode_id(object_id),
            )
            .await?;
        Ok(requests::decode_u32(&reply)?)
    }

    /// `type_id`'s fields, filtered by the `instance`/`class` staticness flags.
    pub async fn fields_of(
        &self,
        type_id: u32,
        instance: bool,
        class: bool,
    ) -> Result<Vec<requests::FieldInfo>> {
        let reply = self
            .call(
                protocol::CMD_SET_TYPE,
                protocol::CMD_TYPE_GET_FIELDS,
                requests::encode_id(type_id),
            )
            .await?;
        Ok(requests::decode_fields(&reply, instance, class)?)
    }

    /// The values of `field_ids` on `type_id`'s static storage.
    pub async fn static_values_of(&self, type_id: u32, field_ids: &[u32]) -> Result<Vec<Value>> {
        let payload = requests::encode_get_values(type_id, field_ids);
        let reply = self
            .call(protocol::CMD_SET_TYPE, protocol::CMD_TYPE_GET_VALUES, payload)
            .await?;
        Ok(requests::decode_values(&reply, field_ids.len())?)
    }

    /// The values of `field_ids` on instance `object_id`.
    pub async fn instance_values_of(
        &self,
        object_id: u32,
        field_ids: &[u32],
    ) -> Result<Vec<Value>> {
        let payload = requests::encode_get_values(object_id, field_ids);
        let reply = self
            .call(
                protocol::CMD_SET_OBJECT_REF,
                protocol::CMD_OBJECT_REF_GET_VALUES,
                payload,
            )
            .await?;
        Ok(requests::decode_values(&reply, field_ids.len())?)
    }

    /// The interned string backing `object_id`.
    pub async fn string_value(&self, object_id: u32) -> Result<Vec<u8>> {
        let reply = self
            .call(
                protocol::CMD_SET_STRING_REF,
                protocol::CMD_STRING_REF_GET_VALUE,
                requests::encode_id(object_id),
            )
            .await?;
        Ok(requests::decode_string(&reply)?)
    }

    /// The length of `array_id`'s first dimension.
    pub async fn array_length(&self, array_id: u32) -> Result<u32> {
        let reply = self
            .call(
                protocol::CMD_SET_ARRAY_REF,
                protocol::CMD_ARRAY_REF_GET_LENGTH,
                requests::encode_array_length(array_id),
            )
            .await?;
        Ok(requests::decode_array_length(&reply)?)
    }

    /// The first `len` elements of `array_id`.
    pub async fn array_values(&self, array_id: u32, len: u32) -> Result<Vec<Value>> {
        let payload = requests::encode_array_values(array_id, len);
        let reply = self
            .call(
                protocol::CMD_SET_ARRAY_REF,
                protocol::CMD_ARRAY_REF_GET_VALUES,
                payload,
            )
            .await?;
        Ok(requests::decode_values(&reply, len as usize)?)
    }

    /// An assembly's display name.
    pub async fn assembly_name(&self, assembly_id: u32) -> Result<Vec<u8>> {
        let reply = self
            .call(
                protocol::CMD_SET_ASSEMBLY,
                protocol::CMD_ASSEMBLY_GET_NAME,
                requests::encode_id(assembly_id),
            )
            .await?;
        Ok(requests::decode_string(&reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::state::{BreakpointKey, BreakpointRegistry};

    #[test]
    fn breakpoint_registry_is_keyed_by_method_and_offset() {
        let mut reg = BreakpointRegistry::default();
        let a = BreakpointKey {
            method_id: 1,
            il_offset: 0,
        };
        let b = BreakpointKey {
            method_id: 1,
            il_offset: 1,
        };

        reg.insert(a, 10);
        reg.insert(b, 11);
        assert_eq!(reg.get(a), Some(10));
        assert_eq!(reg.get(b), Some(11));
    }
}
