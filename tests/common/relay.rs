//! Fake relay.
//!
//! Listens on an ephemeral localhost port, accepts the bot's connection and
//! lets tests write raw lines to it and read what it sends.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A listening fake relay.
pub struct FakeRelay {
    listener: TcpListener,
}

impl FakeRelay {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<RelayPeer> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(RelayPeer {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }
}

/// The relay's end of an accepted bot connection.
pub struct RelayPeer {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl RelayPeer {
    /// Write raw bytes exactly as given.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one line, CR-LF terminated.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line from the bot, terminator stripped.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        anyhow::ensure!(n > 0, "bot closed the connection");
        anyhow::ensure!(line.ends_with("\r\n"), "line not CR-LF terminated: {:?}", line);
        Ok(line.trim_end_matches("\r\n").to_string())
    }

    /// Assert nothing arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(line) => anyhow::bail!("unexpected line from bot: {}", line),
            Err(_) => Ok(()),
        }
    }

    /// Close the relay side.
    pub fn close(self) {
        drop(self);
    }
}
