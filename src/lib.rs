//! A client for the H2 database's native TCP wire protocol.
//!
//! This crate speaks the protocol directly over a blocking [`std::net::TcpStream`]:
//! framed big-endian primitives, a tagged value codec, a salted-hash login
//! handshake, and a prepare/execute/fetch command state machine. See
//! [`client::Client`] for the primary entry point, or [`adapter::Connection`]
//! for a thin facade shaped like a generic host database interface.

pub mod adapter;
pub mod auth;
pub mod client;
pub mod constant;
pub mod error;
pub mod opts;
pub mod rows;
pub mod session;
pub mod statement;
pub mod transport;
pub mod tx;
pub mod value;

pub use client::Client;
pub use error::{Error, Result};
pub use opts::ConnectionInfo;
pub use statement::PreparedStatement;
pub use value::Value;
