use ferrous_doh_domain::DomainError;
use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::net::UdpSocket;
use tracing::debug;

/// Counters for socket lifecycle events.
#[derive(Default)]
pub struct PoolStats {
    pub dialed: AtomicU64,
    pub reused: AtomicU64,
    pub discarded: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolStatsSnapshot {
    pub dialed: u64,
    pub reused: u64,
    pub discarded: u64,
    pub idle: usize,
}

/// A connected socket on loan from the pool.
///
/// Hand it back with [`UdpConnectionPool::checkin`] after a clean exchange or
/// [`UdpConnectionPool::discard`] after any error.
#[derive(Debug)]
pub struct PooledSocket {
    socket: UdpSocket,
    reused: bool,
}

impl PooledSocket {
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }

    /// Whether the socket came from the idle list rather than a fresh dial.
    pub fn is_reused(&self) -> bool {
        self.reused
    }
}

/// Reusable UDP sockets connected to one upstream resolver.
///
/// Each socket is owned by exactly one caller between checkout and
/// checkin, so at most one query is in flight per socket.
pub struct UdpConnectionPool {
    upstream: SocketAddr,
    max_idle: usize,
    idle: Mutex<Vec<UdpSocket>>,
    stats: PoolStats,
}

impl UdpConnectionPool {
    pub fn new(upstream: SocketAddr, max_idle: usize) -> Self {
        Self {
            upstream,
            max_idle,
            idle: Mutex::new(Vec::with_capacity(max_idle.min(64))),
            stats: PoolStats::default(),
        }
    }

    /// Take an idle socket, or dial a new one when none is available.
    pub async fn checkout(&self) -> Result<PooledSocket, DomainError> {
        let idle = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        if let Some(socket) = idle {
            self.stats.reused.fetch_add(1, Ordering::Relaxed);
            return Ok(PooledSocket {
                socket,
                reused: true,
            });
        }

        let socket = self.dial().await?;
        self.stats.dialed.fetch_add(1, Ordering::Relaxed);
        Ok(PooledSocket {
            socket,
            reused: false,
        })
    }

    /// Return a healthy socket. Dropped instead when the idle list is full.
    pub fn checkin(&self, pooled: PooledSocket) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(pooled.socket);
        } else {
            drop(idle);
            debug!(upstream = %self.upstream, "Idle pool full, closing socket");
        }
    }

    /// Close a socket that saw an error. It never goes back to the idle list.
    pub fn discard(&self, pooled: PooledSocket) {
        self.stats.discarded.fetch_add(1, Ordering::Relaxed);
        drop(pooled);
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            dialed: self.stats.dialed.load(Ordering::Relaxed),
            reused: self.stats.reused.load(Ordering::Relaxed),
            discarded: self.stats.discarded.load(Ordering::Relaxed),
            idle: self.idle_count(),
        }
    }

    async fn dial(&self) -> Result<UdpSocket, DomainError> {
        // Bind to ephemeral port (0 = OS assigns) of the upstream's family
        let bind_addr: SocketAddr = if self.upstream.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::Dial(format!("Failed to bind UDP socket: {}", e))
        })?;

        socket.connect(self.upstream).await.map_err(|e| {
            DomainError::Dial(format!(
                "Failed to connect UDP socket to {}: {}",
                self.upstream, e
            ))
        })?;

        debug!(upstream = %self.upstream, "Dialed new UDP socket");
        Ok(socket)
    }
}
