//! TCP passthrough server
//!
//! Relays bytes from one TCP client at a time into an attached [`Pipe`] and
//! sends back whatever the pipe has to say after each chunk. Bytes that
//! arrive while no pipe is attached are held and delivered once one is set.

use super::pipe::Pipe;
use crate::error::{CommunicationError, CommunicationResult};
use k40kit_core::{thread_safe, ThreadSafe};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Listening address and read size of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Largest chunk read from the client at once.
    pub read_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 1040,
            read_buffer: 1024,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Default)]
struct PipeSlot {
    pipe: Option<Box<dyn Pipe>>,
    backlog: Vec<u8>,
}

/// TCP front end for a [`Pipe`].
#[derive(Clone)]
pub struct LaserServer {
    config: ServerConfig,
    slot: ThreadSafe<PipeSlot>,
}

impl LaserServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            slot: thread_safe(PipeSlot::default()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Attach a pipe, delivering any bytes received while detached.
    pub fn set_pipe(&self, mut pipe: Box<dyn Pipe>) {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        if !slot.backlog.is_empty() {
            tracing::debug!("Flushing {} buffered bytes into pipe", slot.backlog.len());
            pipe.write(&slot.backlog);
            slot.backlog.clear();
        }
        slot.pipe = Some(pipe);
    }

    /// Detach and return the current pipe.
    pub fn take_pipe(&self) -> Option<Box<dyn Pipe>> {
        self.slot.lock().pipe.take()
    }

    pub fn has_pipe(&self) -> bool {
        self.slot.lock().pipe.is_some()
    }

    /// Bytes waiting for a pipe.
    pub fn backlog_len(&self) -> usize {
        self.slot.lock().backlog.len()
    }

    /// Pending readback of the attached pipe, such as a startup banner.
    pub fn pending_reply(&self) -> Option<String> {
        self.slot.lock().pipe.as_mut().and_then(|pipe| pipe.read())
    }

    /// Deliver one chunk and collect the pipe's reply.
    pub fn relay(&self, chunk: &[u8]) -> Option<String> {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        match slot.pipe.as_mut() {
            Some(pipe) => {
                pipe.write(chunk);
                pipe.read()
            }
            None => {
                slot.backlog.extend_from_slice(chunk);
                None
            }
        }
    }

    pub async fn bind(&self) -> CommunicationResult<TcpListener> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| CommunicationError::Bind {
                address: address.clone(),
                source,
            })?;
        tracing::info!("Laser server listening on {}", address);
        Ok(listener)
    }

    /// Bind and serve until `shutdown` fires or its sender is dropped.
    pub async fn run(&self, shutdown: oneshot::Receiver<()>) -> CommunicationResult<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Accept clients one at a time on `listener`.
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown: oneshot::Receiver<()>,
    ) -> CommunicationResult<()> {
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Laser server stopping");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = accepted.map_err(CommunicationError::Accept)?;
                    tracing::info!("Client connected from {}", peer);
                    tokio::select! {
                        _ = &mut shutdown => {
                            tracing::info!("Laser server stopping, dropping {}", peer);
                            return Ok(());
                        }
                        result = self.handle_connection(stream) => match result {
                            Ok(()) => tracing::info!("Client {} disconnected", peer),
                            Err(e) => tracing::warn!("Connection to {} failed: {}", peer, e),
                        }
                    }
                }
            }
        }
    }

    async fn handle_connection(&self, mut stream: TcpStream) -> CommunicationResult<()> {
        if let Some(greeting) = self.pending_reply() {
            stream.write_all(greeting.as_bytes()).await?;
        }
        let mut buf = vec![0u8; self.config.read_buffer.max(1)];
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                return Ok(());
            }
            if let Some(reply) = self.relay(&buf[..n]) {
                stream.write_all(reply.as_bytes()).await?;
            }
        }
    }
}
