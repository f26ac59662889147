//! `rigctld` network transport
//!
//! rigctld speaks the same commands as rigctl over a line protocol: one
//! newline-terminated command in, one line per value out. Set commands and
//! failed queries answer with `RPRT <code>` instead.
//!
//! The client is generic over the I/O type so tests can drive it through
//! `tokio::io::duplex()` instead of a real socket.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::command::RigCommand;
use crate::error::RigError;
use crate::gateway::RadioGateway;
use crate::reply::{is_report, parse_frequency, parse_mode, parse_report};

/// Persistent connection to a running rigctld
pub struct RigctldClient<T> {
    name: String,
    io: BufReader<T>,
    timeout: Duration,
    /// An exchange was abandoned; its reply may still be on the wire
    out_of_sync: bool,
}

impl RigctldClient<TcpStream> {
    /// Connect to rigctld at `address` (e.g. `127.0.0.1:4532`)
    pub async fn connect(address: &str, timeout: Duration) -> Result<Self, RigError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(address))
            .await
            .map_err(|_| RigError::Timeout {
                command: format!("connect {}", address),
                timeout_ms: timeout.as_millis() as u64,
            })??;
        stream.set_nodelay(true)?;

        info!("Connected to rigctld at {}", address);
        Ok(Self::new(address.to_string(), stream, timeout))
    }
}

impl<T> RigctldClient<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-open stream
    pub fn new(name: String, io: T, timeout: Duration) -> Self {
        Self {
            name,
            io: BufReader::new(io),
            timeout,
            out_of_sync: false,
        }
    }

    /// Discard reply lines left over from an abandoned exchange
    ///
    /// Reads until the daemon has been quiet for one response timeout.
    async fn resync(&mut self) -> Result<(), RigError> {
        loop {
            // read_until keeps partial bytes in buf when the timeout fires
            let mut buf = Vec::new();
            let read =
                tokio::time::timeout(self.timeout, self.io.read_until(b'\n', &mut buf)).await;
            let stale = String::from_utf8_lossy(&buf);
            match read {
                // Quiet on a line boundary
                Err(_) if buf.is_empty() => break,
                Err(_) => debug!("rigctld {} discarding partial {:?}", self.name, stale),
                Ok(Ok(0)) => return Err(RigError::Io(std::io::ErrorKind::UnexpectedEof.into())),
                Ok(Ok(_)) => debug!("rigctld {} discarding stale {:?}", self.name, stale.trim_end()),
                Ok(Err(e)) => return Err(e.into()),
            }
        }

        self.out_of_sync = false;
        Ok(())
    }

    /// Send one command and collect its reply lines
    async fn transact(&mut self, cmd: &RigCommand) -> Result<Vec<String>, RigError> {
        if self.out_of_sync {
            self.resync().await?;
        }

        let line = cmd.line();
        let expected = cmd.reply_lines();
        debug!("rigctld {} <- {:?}", self.name, line.trim_end());

        let io = &mut self.io;
        let exchange = async move {
            io.write_all(line.as_bytes()).await?;
            io.flush().await?;

            let mut lines = Vec::with_capacity(expected);
            while lines.len() < expected {
                let mut buf = String::new();
                if io.read_line(&mut buf).await? == 0 {
                    return Err(RigError::Io(std::io::ErrorKind::UnexpectedEof.into()));
                }
                let value = buf.trim_end().to_string();

                // A status line ends the reply early
                if is_report(&value) {
                    lines.push(value);
                    break;
                }
                lines.push(value);
            }
            Ok(lines)
        };

        let lines = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => {
                self.out_of_sync = true;
                return Err(e);
            }
            Err(_) => {
                self.out_of_sync = true;
                return Err(RigError::Timeout {
                    command: cmd.args().join(" "),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };

        debug!("rigctld {} -> {:?}", self.name, lines);

        if let Some(last) = lines.last().filter(|l| is_report(l)) {
            let code = parse_report(last)?;
            if code != 0 {
                return Err(RigError::Daemon(code));
            }
        }

        Ok(lines)
    }
}

impl<T> RadioGateway for RigctldClient<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_frequency(&mut self) -> Result<f64, RigError> {
        let lines = self.transact(&RigCommand::GetFrequency).await?;
        Ok(parse_frequency(&lines.join("\n"))?)
    }

    async fn read_mode(&mut self) -> Result<(String, String), RigError> {
        let lines = self.transact(&RigCommand::GetMode).await?;
        Ok(parse_mode(&lines.join("\n"))?)
    }

    async fn write_frequency(&mut self, hz: f64) -> Result<(), RigError> {
        self.transact(&RigCommand::SetFrequency { hz }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, DuplexStream};

    /// Answer each incoming command line with the canned reply
    async fn serve(stream: DuplexStream, replies: Vec<(&'static str, &'static str)>) {
        let mut stream = BufReader::new(stream);
        for (expected, reply) in replies {
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            assert_eq!(line, expected);
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        }
    }

    fn client(io: DuplexStream) -> RigctldClient<DuplexStream> {
        RigctldClient::new("test".into(), io, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_read_state() {
        let (client_io, server_io) = duplex(256);
        let server = tokio::spawn(serve(
            server_io,
            vec![("f\n", "14250000\n"), ("m\n", "USB\n2400\n")],
        ));

        let mut rig = client(client_io);
        let state = rig.read_state().await.unwrap();
        assert_eq!(state.frequency_hz, 14_250_000.0);
        assert_eq!(state.mode, "USB");
        assert_eq!(state.bandwidth, "2400");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_frequency_report() {
        let (client_io, server_io) = duplex(256);
        let server = tokio::spawn(serve(server_io, vec![("F 7100000\n", "RPRT 0\n")]));

        let mut rig = client(client_io);
        rig.write_frequency(7_100_000.0).await.unwrap();

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_negative_report_is_daemon_error() {
        let (client_io, server_io) = duplex(256);
        let server = tokio::spawn(serve(server_io, vec![("m\n", "RPRT -11\n")]));

        let mut rig = client(client_io);
        let result = rig.read_mode().await;
        assert!(matches!(result, Err(RigError::Daemon(-11))));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_daemon_times_out() {
        let (client_io, _server_io) = duplex(256);

        let mut rig = RigctldClient::new("test".into(), client_io, Duration::from_millis(20));
        let result = rig.read_frequency().await;
        assert!(matches!(result, Err(RigError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_late_reply_is_not_taken_for_the_next_one() {
        let (client_io, server_io) = duplex(256);
        let server = tokio::spawn(async move {
            let mut stream = BufReader::new(server_io);
            let mut line = String::new();

            stream.read_line(&mut line).await.unwrap();
            assert_eq!(line, "f\n");
            tokio::time::sleep(Duration::from_millis(150)).await;
            stream.write_all(b"14250000\n").await.unwrap();

            for (expected, reply) in [("f\n", "7100000\n"), ("m\n", "LSB\n2400\n")] {
                line.clear();
                stream.read_line(&mut line).await.unwrap();
                assert_eq!(line, expected);
                stream.write_all(reply.as_bytes()).await.unwrap();
            }
        });

        let mut rig = RigctldClient::new("test".into(), client_io, Duration::from_millis(100));
        let first = rig.read_frequency().await;
        assert!(matches!(first, Err(RigError::Timeout { .. })));

        let state = rig.read_state().await.unwrap();
        assert_eq!(state.frequency_hz, 7_100_000.0);
        assert_eq!(state.mode, "LSB");
        assert_eq!(state.bandwidth, "2400");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_daemon_is_io_error() {
        let (client_io, server_io) = duplex(256);
        drop(server_io);

        let mut rig = client(client_io);
        let result = rig.read_frequency().await;
        assert!(matches!(result, Err(RigError::Io(_))));
    }
}
