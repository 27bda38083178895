//! The I/O role: accepts the debuggee's connection, drives the [`Framer`], owns the transaction
//! table, and dispatches inbound events to a subscriber channel.

use std::{
    collections::BTreeMap,
    io::{self, Read, Write},
    net::SocketAddr,
    sync::{
        atomic::{self, AtomicU32},
        mpsc::{Receiver, Sender, TryRecvError},
        Arc, Mutex, Weak,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use futures::channel::oneshot;
use mio::net::{TcpListener, TcpStream};

use crate::protocol::{self, Frame, FrameKind, Framer, ProtocolError};

use super::ClientError;

/// The default ceiling a transaction is allowed to wait for its reply, matching `waitForId`'s
/// 20-second deadline in the original.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// How often the reactor wakes up on its own to check for an expired transaction, matching the
/// original's `waitForReadyRead(1000)` polling granularity.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

type ReplyResult = Result<(u8, Vec<u8>), ClientError>;
type ReplyHandler = Box<dyn FnOnce(ReplyResult) + Send + 'static>;

/// An inbound event packet, handed to whatever subscriber the facade installed.
pub(super) struct RawEvent {
    pub cmd: u8,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct ReactorState {
    handlers: BTreeMap<u32, (Instant, ReplyHandler)>,
}

struct SharedState {
    next_id: AtomicU32,
    _thread_handle: JoinHandle<Result<(), ClientError>>,
}

// We need to wrap this to implement futures::task::ArcWake.
struct Waker(mio::Waker);

impl futures::task::ArcWake for Waker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        let _ = arc_self.0.wake();
    }
}

/// A cloneable handle to a running [`Reactor`]. Cheap to clone; every clone shares the same
/// underlying connection and transaction table.
#[derive(Clone)]
pub(super) struct ReactorHandle {
    state: Weak<Mutex<ReactorState>>,
    shared: Arc<SharedState>,
    outgoing: Sender<(u32, u8, u8, Vec<u8>)>,
    waker: Arc<Waker>,
}

impl ReactorHandle {
    /// Sends a command and waits for its reply, returning the error code and payload verbatim.
    pub(super) async fn roundtrip(
        &self,
        cmd_set: u8,
        cmd: u8,
        payload: Vec<u8>,
    ) -> Result<(u8, Vec<u8>), ClientError> {
        let id = self.next_id();

        let (tx, rx) = oneshot::channel();
        self.install_handler(id, move |res: ReplyResult| {
            let _ = tx.send(res);
        })?;

        self.write_command(id, cmd_set, cmd, payload)?;

        rx.await.map_err(|_| ClientError::Disconnected)?
    }

    fn write_command(
        &self,
        id: u32,
        cmd_set: u8,
        cmd: u8,
        payload: Vec<u8>,
    ) -> Result<(), ClientError> {
        self.outgoing
            .send((id, cmd_set, cmd, payload))
            .map_err(|_| ClientError::Disconnected)?;
        self.waker.0.wake()?;
        Ok(())
    }

    fn install_handler<F>(&self, id: u32, handler: F) -> Result<(), ClientError>
    where
        F: FnOnce(ReplyResult) + Send + 'static,
    {
        self.state
            .upgrade()
            .ok_or(ClientError::Disconnected)?
            .lock()
            .unwrap()
            .handlers
            .insert(id, (Instant::now(), Box::new(handler)));
        Ok(())
    }

    fn next_id(&self) -> u32 {
        self.shared.next_id.fetch_add(1, atomic::Ordering::Relaxed)
    }
}

pub(super) const WAKER: mio::Token = mio::Token(0);
pub(super) const LISTENER: mio::Token = mio::Token(1);
pub(super) const SOCKET: mio::Token = mio::Token(2);

/// Drives accept, framing, transaction dispatch, and event delivery on a dedicated OS thread.
pub(super) struct Reactor {
    listener: TcpListener,
    socket: Option<TcpStream>,
    poll: mio::Poll,
    waker: Arc<Waker>,
    state: Arc<Mutex<ReactorState>>,
    outgoing: Receiver<(u32, u8, u8, Vec<u8>)>,
    events_tx: Sender<RawEvent>,

    framer: Framer,
    write_buf: Vec<u8>,
    read_buf: [u8; 64 * 1024],
}

impl Reactor {
    /// Binds a loopback listener on `port` (0 lets the OS choose) and spawns the reactor thread.
    /// Returns the handle plus the bound address and the event-delivery receiver.
    pub(super) fn spawn(
        port: u16,
    ) -> Result<(ReactorHandle, SocketAddr, Receiver<RawEvent>), ClientError> {
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let mut listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;

        let poll = mio::Poll::new()?;
        let waker = Arc::new(Waker(mio::Waker::new(poll.registry(), WAKER)?));
        poll.registry()
            .register(&mut listener, LISTENER, mio::Interest::READABLE)?;

        let state = Arc::new(Mutex::new(ReactorState::default()));
        let (cmd_tx, cmd_rx) = std::sync::mpsc::channel();
        let (events_tx, events_rx) = std::sync::mpsc::channel();

        let mut reactor = Reactor {
            listener,
            socket: None,
            poll,
            waker: waker.clone(),
            state: state.clone(),
            outgoing: cmd_rx,
            events_tx,
            framer: Framer::new(),
            write_buf: Vec::new(),
            read_buf: [0u8; 64 * 1024],
        };

        let thread_handle = std::thread::spawn(move || match reactor.run() {
            Ok(()) => Ok(()),
            Err(err) => {
                log::error!("reactor error: {err}");
                Err(err)
            }
        });

        let handle = ReactorHandle {
            state: Arc::downgrade(&state),
            outgoing: cmd_tx,
            waker,
            shared: Arc::new(SharedState {
                next_id: AtomicU32::new(1),
                _thread_handle: thread_handle,
            }),
        };

        Ok((handle, local_addr, events_rx))
    }

    fn run(&mut self) -> Result<(), ClientError> {
        let mut events = mio::Events::with_capacity(128);

        loop {
            self.poll.poll(&mut events, Some(POLL_INTERVAL))?;

            for ev in events.iter() {
                match ev.token() {
                    WAKER => {}
                    LISTENER if self.socket.is_none() => self.accept()?,
                    LISTENER => {
                        // A session is already established; refuse any further connection by
                        // simply letting it drop on accept.
                        let _ = self.listener.accept();
                    }
                    SOCKET => {}
                    _ => {}
                }
            }

            self.recv()?;
            self.write_commands()?;
            self.fail_expired_transaction()?;
        }
    }

    /// Fails the oldest transaction that has exceeded [`REQUEST_TIMEOUT`], if any, and tears the
    /// session down. The original closes the socket outright on a `waitForId` timeout rather than
    /// trying to recover one transaction among an otherwise-live connection; remaining handlers
    /// resolve to `Disconnected` when the reactor thread exits and drops them.
    fn fail_expired_transaction(&mut self) -> Result<(), ClientError> {
        let expired = {
            let state = self.state.lock().unwrap();
            expired_transaction(&state.handlers, Instant::now())
        };

        let Some(id) = expired else {
            return Ok(());
        };

        log::warn!(
            "transaction {id} exceeded the {}s reply deadline",
            REQUEST_TIMEOUT.as_secs()
        );
        if let Some((_, handler)) = self.state.lock().unwrap().handlers.remove(&id) {
            handler(Err(ClientError::Timeout));
        }
        Err(ClientError::Timeout)
    }

    fn accept(&mut self) -> Result<(), ClientError> {
        let (mut stream, peer) = self.listener.accept()?;
        log::debug!("debuggee connected from {peer}");
        self.poll.registry().register(
            &mut stream,
            SOCKET,
            mio::Interest::READABLE | mio::Interest::WRITABLE,
        )?;
        self.socket = Some(stream);
        Ok(())
    }

    fn recv(&mut self) -> Result<(), ClientError> {
        if self.socket.is_none() {
            return Ok(());
        }

        loop {
            let read = {
                let socket = self.socket.as_mut().unwrap();
                socket.read(&mut self.read_buf)
            };

            match read {
                Ok(0) => return Err(ClientError::Disconnected),
                Ok(n) => {
                    let chunk = self.read_buf[..n].to_vec();
                    self.dispatch(&chunk)?;
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn dispatch(&mut self, chunk: &[u8]) -> Result<(), ClientError> {
        let result = self.framer.feed(chunk)?;

        if let Some(echo) = result.handshake_echo {
            self.write_buf.extend_from_slice(&echo);
        }

        for frame in result.frames {
            self.dispatch_frame(frame)?;
        }

        Ok(())
    }

    fn dispatch_frame(&mut self, frame: Frame) -> Result<(), ClientError> {
        match frame.kind {
            FrameKind::Reply { error_code } => {
                let mut state = self.state.lock().unwrap();
                let Some((_, handler)) = state.handlers.remove(&frame.id) else {
                    log::warn!("no pending transaction for reply id {}", frame.id);
                    return Ok(());
                };
                drop(state);
                handler(Ok((error_code, frame.payload)));
            }
            FrameKind::Command { cmd_set, cmd } => {
                if cmd_set != protocol::CMD_SET_EVENT {
                    return Err(ProtocolError::UnexpectedCommandSet(cmd_set).into());
                }
                let _ = self.events_tx.send(RawEvent {
                    cmd,
                    payload: frame.payload,
                });
            }
        }
        Ok(())
    }

    fn write_commands(&mut self) -> Result<(), ClientError> {
        loop {
            if !drain_buf(&mut self.write_buf, &mut self.socket)? {
                return Ok(());
            }

            match self.outgoing.try_recv() {
                Ok((id, cmd_set, cmd, payload)) => {
                    self.write_buf
                        .extend(protocol::frame::encode_command(id, cmd_set, cmd, &payload));
                }
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return Err(ClientError::Disconnected),
            }
        }
    }
}

fn drain_buf(buf: &mut Vec<u8>, socket: &mut Option<TcpStream>) -> Result<bool, io::Error> {
    let Some(socket) = socket else {
        return Ok(true);
    };

    while !buf.is_empty() {
        match socket.write(buf) {
            Ok(0) => return Ok(false),
            Ok(n) => {
                buf.drain(..n);
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(false),
            Err(err) => return Err(err),
        }
    }

    Ok(true)
}

/// The id of the oldest transaction in `handlers` whose deadline has passed as of `now`, if any.
fn expired_transaction(
    handlers: &BTreeMap<u32, (Instant, ReplyHandler)>,
    now: Instant,
) -> Option<u32> {
    handlers
        .iter()
        .find(|(_, (sent_at, _))| now.duration_since(*sent_at) > REQUEST_TIMEOUT)
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_transaction_finds_entries_past_the_deadline() {
        let sent_at = Instant::now();
        let mut handlers: BTreeMap<u32, (Instant, ReplyHandler)> = BTreeMap::new();
        handlers.insert(1, (sent_at, Box::new(|_| {})));

        let still_within_deadline = sent_at + REQUEST_TIMEOUT - Duration::from_secs(1);
        assert_eq!(expired_transaction(&handlers, still_within_deadline), None);

        let past_deadline = sent_at + REQUEST_TIMEOUT + Duration::from_secs(1);
        assert_eq!(expired_transaction(&handlers, past_deadline), Some(1));
    }
}
