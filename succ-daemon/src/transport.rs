//! Local transport abstraction (spec.md §6: "a local transport"). The
//! daemon binds a Unix domain socket and frames requests as
//! newline-delimited JSON; the `Transport`/`Connection` split lets
//! tests drive the router over an in-memory duplex stream instead of a
//! real socket.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

#[async_trait]
pub trait Connection: Send {
    async fn read_line(&mut self) -> std::io::Result<Option<String>>;
    async fn write_line(&mut self, line: &str) -> std::io::Result<()>;
}

#[async_trait]
pub trait Transport: Send {
    async fn accept(&mut self) -> std::io::Result<Box<dyn Connection>>;
}

pub struct UnixTransport {
    listener: UnixListener,
}

impl UnixTransport {
    /// Binds `socket_path`, removing a stale socket file left behind by
    /// a crashed prior instance first.
    pub fn bind(socket_path: &Path) -> std::io::Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let listener = UnixListener::bind(socket_path)?;
        Ok(Self { listener })
    }
}

#[async_trait]
impl Transport for UnixTransport {
    async fn accept(&mut self) -> std::io::Result<Box<dyn Connection>> {
        let (stream, _addr) = self.listener.accept().await?;
        Ok(Box::new(UnixConnection::new(stream)))
    }
}

struct UnixConnection {
    reader: BufReader<tokio::net::unix::OwnedReadHalf>,
    writer: tokio::net::unix::OwnedWriteHalf,
}

impl UnixConnection {
    fn new(stream: UnixStream) -> Self {
        let (read_half, writer) = stream.into_split();
        Self { reader: BufReader::new(read_half), writer }
    }
}

#[async_trait]
impl Connection for UnixConnection {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// In-memory connection over a `tokio::io::DuplexStream` half, for
/// driving the router in tests without a real socket.
pub struct DuplexConnection {
    reader: BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>,
    writer: tokio::io::WriteHalf<tokio::io::DuplexStream>,
}

impl DuplexConnection {
    pub fn new(stream: tokio::io::DuplexStream) -> Self {
        let (read_half, writer) = tokio::io::split(stream);
        Self { reader: BufReader::new(read_half), writer }
    }
}

#[async_trait]
impl Connection for DuplexConnection {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}
