#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// Fixed 12-byte answer: a bare DNS header with QR and RA set.
pub const CANNED_RESPONSE: [u8; 12] = [
    0x12, 0x34, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
];

#[derive(Clone, Copy)]
pub enum Behavior {
    /// Reply with [`CANNED_RESPONSE`].
    Canned,
    /// Reply with the query bytes followed by one marker byte.
    Echo,
    /// Read queries and never answer.
    Silent,
    /// Ignore queries whose first byte is the marker, echo the rest.
    SilentOn(u8),
}

fn echo(query: &[u8]) -> Vec<u8> {
    let mut reply = query.to_vec();
    reply.push(0xEE);
    reply
}

/// In-process UDP resolver for tests.
pub struct MockUpstream {
    addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(behavior: Behavior) -> std::io::Result<Self> {
        Self::start_with_delay(behavior, Duration::ZERO).await
    }

    /// Like `start`, but each reply is sent after `delay`.
    pub async fn start_with_delay(behavior: Behavior, delay: Duration) -> std::io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);
        let addr = socket.local_addr()?;
        let calls = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = Arc::clone(&calls);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);

                        let reply = match behavior {
                            Behavior::Canned => CANNED_RESPONSE.to_vec(),
                            Behavior::Echo => echo(&buf[..len]),
                            Behavior::Silent => continue,
                            Behavior::SilentOn(marker) if len > 0 && buf[0] == marker => continue,
                            Behavior::SilentOn(_) => echo(&buf[..len]),
                        };

                        let socket = Arc::clone(&socket);
                        tokio::spawn(async move {
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                            let _ = socket.send_to(&reply, peer).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            calls,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of datagrams received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
