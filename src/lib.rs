//! A pure Rust client implementation of the Mono Soft Debugger Wire Protocol, the binary TCP
//! protocol the Mono/.NET runtime speaks to an attached debugger.
//!
//! [`protocol`] implements the wire format: framing, the tagged-value codec, event parsing, and
//! the request/reply payload shapes for every command. [`client::Debugger`] is the public
//! session-level API built on top of it: it listens for the debuggee to connect, performs the
//! initial setup handshake, and exposes execution control (resume/suspend/step/breakpoints) and
//! introspection (threads, stacks, types, methods, values) as typed async methods.

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

pub mod client;
pub mod protocol;

pub use client::{ClientError, Debugger};
