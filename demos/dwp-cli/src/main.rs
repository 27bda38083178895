//! A tool for tracing a Mono Soft Debugger Wire Protocol session.
//!
//! Binds a loopback listener, prints the assigned port, and dumps every inbound event to stdout
//! until the debuggee disconnects.
//!
//!     $ dwp-cli --port 0
//!     listening on 127.0.0.1:56231
//!     waiting for the debuggee...
//!
//! Then point a Mono runtime's `--debugger-agent=address=127.0.0.1:56231` at that address.

use anyhow::Context;
use clap::Parser;
use dwp::Debugger;

/// Connects to a debuggee and logs every event it sends.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The loopback port to listen on. 0 picks an available port.
    #[arg(long, default_value_t = 0)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (debugger, addr) = Debugger::listen(args.port).context("failed to bind listener")?;
    println!("listening on {addr}");
    println!("waiting for the debuggee...");

    futures::executor::block_on(debugger.accept()).context("initial setup failed")?;
    println!("session ready");

    loop {
        match debugger.next_event() {
            Ok(records) => {
                for record in records {
                    println!("{record:?}");
                }
            }
            Err(dwp::ClientError::Disconnected) => {
                println!("debuggee disconnected");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}
