use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

/// Fixed 12-byte reply: a bare DNS header with one answer.
pub const FIXED_REPLY: [u8; 12] = [
    0x00, 0x2a, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
];

/// UDP resolver stand-in that answers every datagram with `FIXED_REPLY`.
pub struct FakeUpstream {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    stop: CancellationToken,
}

impl FakeUpstream {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_inner(Duration::ZERO, true).await
    }

    pub async fn slow(delay: Duration) -> std::io::Result<Self> {
        Self::start_inner(delay, true).await
    }

    /// Receives queries and never answers.
    pub async fn unresponsive() -> std::io::Result<Self> {
        Self::start_inner(Duration::ZERO, false).await
    }

    async fn start_inner(delay: Duration, reply: bool) -> std::io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let stop = CancellationToken::new();

        let counter = Arc::clone(&queries);
        let token = stop.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((_, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        if !reply {
                            continue;
                        }
                        let socket = Arc::clone(&socket);
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = socket.send_to(&FIXED_REPLY, peer).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            stop,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
