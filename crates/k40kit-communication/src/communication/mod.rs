//! Transports feeding byte streams into protocol front ends.

pub mod pipe;
pub mod server;

pub use pipe::Pipe;
pub use server::{LaserServer, ServerConfig};
