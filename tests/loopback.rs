//! Drives a fake debuggee over a real loopback socket through open, initial setup, a round-trip
//! call, an event, and a clean exit, exercising the reactor and facade together without needing a
//! live Mono runtime.

use std::io::{Read, Write};
use std::net::TcpStream;

use dwp::protocol::{self, frame, wire, EventRecord};
use dwp::Debugger;

/// Reads exactly one frame header plus its body off `stream`, returning `(id, cmd_set, cmd,
/// payload)`. Panics on a reply frame, since the fake debuggee only ever receives commands.
fn read_command(stream: &mut TcpStream) -> (u32, u8, u8, Vec<u8>) {
    let mut hdr = [0u8; 11];
    stream.read_exact(&mut hdr).expect("reading frame header");
    let length = u32::from_be_bytes([hdr[0], hdr[1], hdr[2], hdr[3]]) as usize;
    let id = u32::from_be_bytes([hdr[4], hdr[5], hdr[6], hdr[7]]);
    assert_eq!(hdr[8], 0x00, "expected a command frame, not a reply");
    let cmd_set = hdr[9];
    let cmd = hdr[10];

    let mut payload = vec![0u8; length - 11];
    stream.read_exact(&mut payload).expect("reading frame body");
    (id, cmd_set, cmd, payload)
}

/// Writes a reply frame for transaction `id`.
fn write_reply(stream: &mut TcpStream, id: u32, error_code: u16, payload: &[u8]) {
    let length = (11 + payload.len()) as u32;
    let mut buf = Vec::with_capacity(length as usize);
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(0x80);
    buf.extend_from_slice(&error_code.to_be_bytes());
    buf.extend_from_slice(payload);
    stream.write_all(&buf).expect("writing reply frame");
}

/// Writes an inbound EVENT-set command frame (`cmd` is the event code).
fn write_event(stream: &mut TcpStream, cmd: u8, payload: &[u8]) {
    let buf = frame::encode_command(0, protocol::CMD_SET_EVENT, cmd, payload);
    stream.write_all(&buf).expect("writing event frame");
}

fn vm_version_reply() -> Vec<u8> {
    let mut payload = vec![];
    wire::write_string(&mut payload, b"mono 6.12.0").unwrap();
    payload.extend_from_slice(&protocol::MAJOR_VERSION.to_be_bytes());
    payload.extend_from_slice(&protocol::MINOR_VERSION.to_be_bytes());
    payload
}

#[test]
fn open_accept_call_and_event_round_trip() {
    let (debugger, addr) = Debugger::listen(0).expect("failed to bind listener");

    let fake_debuggee = std::thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).expect("connecting to the listener");

        stream
            .write_all(protocol::HANDSHAKE)
            .expect("sending handshake");
        let mut echo = [0u8; 13];
        stream.read_exact(&mut echo).expect("reading handshake echo");
        assert_eq!(&echo, protocol::HANDSHAKE);

        let mut vm_start = vec![];
        vm_start.extend_from_slice(&1u32.to_be_bytes()); // thread_id
        vm_start.extend_from_slice(&1u32.to_be_bytes()); // object_id
        write_event(&mut stream, protocol::EventCode::VmStart as u8, &vm_start);

        let (id, cmd_set, cmd, _payload) = read_command(&mut stream);
        assert_eq!((cmd_set, cmd), (protocol::CMD_SET_VM, protocol::CMD_VM_VERSION));
        write_reply(&mut stream, id, 0, &vm_version_reply());

        let (id, cmd_set, cmd, _payload) = read_command(&mut stream);
        assert_eq!(
            (cmd_set, cmd),
            (protocol::CMD_SET_VM, protocol::CMD_VM_SET_PROTOCOL_VERSION)
        );
        write_reply(&mut stream, id, 0, &[]);

        let (id, cmd_set, cmd, _payload) = read_command(&mut stream);
        assert_eq!(
            (cmd_set, cmd),
            (protocol::CMD_SET_EVENT_REQUEST, protocol::CMD_EVENT_REQUEST_SET)
        );
        write_reply(&mut stream, id, 0, &7u32.to_be_bytes());

        let (id, cmd_set, cmd, _payload) = read_command(&mut stream);
        assert_eq!((cmd_set, cmd), (protocol::CMD_SET_VM, protocol::CMD_VM_ALL_THREADS));
        let mut threads_payload = vec![];
        threads_payload.extend_from_slice(&2u32.to_be_bytes());
        threads_payload.extend_from_slice(&1u32.to_be_bytes());
        threads_payload.extend_from_slice(&2u32.to_be_bytes());
        write_reply(&mut stream, id, 0, &threads_payload);

        let mut breakpoint = vec![];
        breakpoint.extend_from_slice(&1u32.to_be_bytes()); // thread_id
        breakpoint.extend_from_slice(&42u32.to_be_bytes()); // method_id
        breakpoint.extend_from_slice(&0u64.to_be_bytes()); // il offset
        write_event(&mut stream, protocol::EventCode::Breakpoint as u8, &breakpoint);

        let (id, cmd_set, cmd, _payload) = read_command(&mut stream);
        assert_eq!((cmd_set, cmd), (protocol::CMD_SET_VM, protocol::CMD_VM_EXIT));
        drop(stream); // debuggee tears down without replying to EXIT
        let _ = id;
    });

    futures::executor::block_on(debugger.accept()).expect("initial setup failed");

    let threads =
        futures::executor::block_on(debugger.all_threads()).expect("all_threads call failed");
    assert_eq!(threads, vec![1, 2]);

    let records = debugger.next_event().expect("reading the breakpoint event");
    assert_eq!(
        records,
        vec![EventRecord::Breakpoint {
            thread_id: 1,
            method_id: 42,
            offset: 0,
        }]
    );

    futures::executor::block_on(debugger.exit(0)).expect("exit should tolerate the disconnect");

    fake_debuggee.join().expect("fake debuggee thread panicked");
}
