use crate::config::SyncConfig;
use crate::net::channel::SyncChannel;
use crate::net::SyncMessage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Largest datagram we accept; sync messages are well under this
const RECV_BUFFER_SIZE: usize = 2048;

/// UDP broadcast transport.
///
/// One socket serves both directions: outbound broadcasts to the limited
/// broadcast address, and a spawned receive task that is the only
/// blocking component in the process. Received messages land in a
/// single-slot latest-wins cell; an unread message is simply overwritten
/// because new state always supersedes old. The critical section is one
/// small read/write, never held across I/O.
pub struct UdpSyncChannel {
    socket: Arc<UdpSocket>,
    device_id: String,
    port: u16,
    latest: Arc<Mutex<Option<SyncMessage>>>,
    last_receipt: Arc<Mutex<Option<Instant>>>,
    timeout: Duration,
    recv_task: JoinHandle<()>,
}

impl UdpSyncChannel {
    /// Bind the sync port and start the background receive loop.
    ///
    /// Failure here (port taken, broadcast disabled) must not kill
    /// playback; the caller falls back to running offline.
    pub async fn bind(config: &SyncConfig, device_id: String) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, config.port))
            .await
            .with_context(|| format!("failed to bind sync port {}", config.port))?;
        socket
            .set_broadcast(true)
            .context("failed to enable broadcast")?;
        let socket = Arc::new(socket);

        let latest = Arc::new(Mutex::new(None));
        let last_receipt = Arc::new(Mutex::new(None));

        let recv_task = tokio::spawn(Self::receive_loop(
            socket.clone(),
            latest.clone(),
            last_receipt.clone(),
        ));

        info!(port = config.port, device_id = %device_id, "sync channel listening");

        Ok(Self {
            socket,
            device_id,
            port: config.port,
            latest,
            last_receipt,
            timeout: Duration::from_secs_f64(config.timeout_seconds),
            recv_task,
        })
    }

    async fn receive_loop(
        socket: Arc<UdpSocket>,
        latest: Arc<Mutex<Option<SyncMessage>>>,
        last_receipt: Arc<Mutex<Option<Instant>>>,
    ) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, from)) => match SyncMessage::decode(&buf[..len]) {
                    Ok(message) => {
                        debug!(%from, device_id = %message.device_id, "sync message received");
                        *latest.lock().unwrap() = Some(message);
                        *last_receipt.lock().unwrap() = Some(Instant::now());
                    }
                    Err(e) => {
                        warn!(%from, "dropping undecodable datagram: {e}");
                    }
                },
                Err(e) => {
                    // Transient receive errors: keep listening. A closed
                    // socket ends the task through abort on drop.
                    warn!("sync receive error: {e}");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

#[async_trait]
impl SyncChannel for UdpSyncChannel {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn send(&mut self, message: &SyncMessage) -> Result<()> {
        let data = message.encode();
        self.socket
            .send_to(&data, (Ipv4Addr::BROADCAST, self.port))
            .await
            .context("broadcast send failed")?;
        Ok(())
    }

    fn take_latest(&mut self) -> Option<SyncMessage> {
        self.latest.lock().unwrap().take()
    }

    fn has_recent_message(&self) -> bool {
        self.last_receipt
            .lock()
            .unwrap()
            .map(|t| t.elapsed() < self.timeout)
            .unwrap_or(false)
    }
}

impl Drop for UdpSyncChannel {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
