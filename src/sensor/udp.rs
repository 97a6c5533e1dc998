//! UDP packet intake for online lidars.
//!
//! # Responsibilities
//! - Bind one MSOP and one DIFOP socket per configured lidar
//! - Run a receive task per socket and keep per-port counters
//! - Stop every task on `stop()` or drop
//! - Release the sockets once the stopped tasks have been joined
//!
//! A manager runs at most once: after `stop()` it cannot be started again.
//!
//! Packets are counted and handed off as raw datagrams; decoding them is
//! not done here.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::config::schema::{DriverSettings, LidarType, MSG_SOURCE_ONLINE};
use crate::config::validation::validate_settings;
use crate::config::Configuration;
use crate::lifecycle::ShutdownSignal;
use crate::sensor::{SensorError, SensorManager};

/// Largest datagram a RoboSense sensor emits, with headroom.
const MAX_PACKET_SIZE: usize = 1500;

/// Which packet stream a socket carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// Main data stream (point measurements).
    Msop,
    /// Device info stream.
    Difop,
}

impl PortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortKind::Msop => "msop",
            PortKind::Difop => "difop",
        }
    }
}

/// Counters for one bound socket.
#[derive(Debug)]
pub struct PortStats {
    /// Index of the lidar entry in the configuration.
    pub lidar: usize,
    pub kind: PortKind,
    /// Address actually bound.
    pub local_addr: SocketAddr,
    packets: AtomicU64,
    bytes: AtomicU64,
}

impl PortStats {
    fn new(lidar: usize, kind: PortKind, local_addr: SocketAddr) -> Self {
        Self {
            lidar,
            kind,
            local_addr,
            packets: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
        }
    }

    fn record(&self, len: usize) {
        self.packets.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub fn packets(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

/// A socket to bind, derived from validated settings.
#[derive(Debug, Clone)]
struct Endpoint {
    lidar: usize,
    lidar_type: LidarType,
    kind: PortKind,
    addr: SocketAddr,
}

/// Sensor manager that receives lidar packets over UDP.
///
/// `start` spawns Tokio tasks and must run inside a Tokio runtime.
pub struct UdpSensorManager {
    endpoints: Option<Vec<Endpoint>>,
    stats: Vec<Arc<PortStats>>,
    workers: Vec<JoinHandle<()>>,
    closing: Vec<JoinHandle<()>>,
    shutdown: ShutdownSignal,
}

impl UdpSensorManager {
    pub fn new() -> Self {
        Self {
            endpoints: None,
            stats: Vec::new(),
            workers: Vec::new(),
            closing: Vec::new(),
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Counters for every bound socket, in bind order.
    pub fn port_stats(&self) -> &[Arc<PortStats>] {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty() && !self.shutdown.is_triggered()
    }

    /// Wait until every task aborted by `stop()` has finished and dropped
    /// its socket.
    pub async fn closed(&mut self) {
        for worker in self.closing.drain(..) {
            // Cancellation is the expected outcome.
            let _ = worker.await;
        }
        tracing::debug!(sockets = self.stats.len(), "Packet sockets released");
    }

    fn bind_all(&mut self, endpoints: &[Endpoint]) -> Result<(), SensorError> {
        for endpoint in endpoints {
            let socket = bind_socket(endpoint.addr)?;
            let local_addr = socket.local_addr().map_err(|source| SensorError::Bind {
                addr: endpoint.addr,
                source,
            })?;

            let stats = Arc::new(PortStats::new(endpoint.lidar, endpoint.kind, local_addr));
            tracing::info!(
                lidar = endpoint.lidar,
                lidar_type = %endpoint.lidar_type,
                kind = endpoint.kind.as_str(),
                address = %local_addr,
                "Packet socket bound"
            );

            self.workers.push(tokio::spawn(receive_loop(
                socket,
                Arc::clone(&stats),
                self.shutdown.clone(),
            )));
            self.stats.push(stats);
        }
        Ok(())
    }
}

impl Default for UdpSensorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorManager for UdpSensorManager {
    fn initialize(&mut self, config: &Configuration) -> Result<(), SensorError> {
        let settings = DriverSettings::from_config(config)?;
        validate_settings(&settings).map_err(SensorError::InvalidConfig)?;

        if settings.common.msg_source != MSG_SOURCE_ONLINE {
            return Err(SensorError::Unsupported(format!(
                "msg_source {} (only {} = online lidar is handled)",
                settings.common.msg_source, MSG_SOURCE_ONLINE
            )));
        }

        for (index, lidar) in settings.lidar.iter().enumerate() {
            tracing::info!(
                lidar = index,
                lidar_type = %lidar.driver.lidar_type,
                msop_port = lidar.driver.msop_port,
                difop_port = lidar.driver.difop_port,
                frame_id = %lidar.ros.ros_frame_id,
                "Lidar configured"
            );
        }

        self.endpoints = Some(endpoints(&settings));
        Ok(())
    }

    fn start(&mut self) -> Result<(), SensorError> {
        if self.shutdown.is_triggered() {
            return Err(SensorError::Stopped);
        }
        if !self.workers.is_empty() {
            return Err(SensorError::AlreadyStarted);
        }
        let endpoints = self.endpoints.take().ok_or(SensorError::NotInitialized)?;
        let result = self.bind_all(&endpoints);
        self.endpoints = Some(endpoints);

        if result.is_err() {
            // Release whatever was bound before the failure.
            self.stop();
        }
        result
    }

    fn stop(&mut self) {
        if !self.shutdown.trigger() {
            return;
        }
        for worker in self.workers.drain(..) {
            worker.abort();
            self.closing.push(worker);
        }
        for stats in &self.stats {
            tracing::info!(
                lidar = stats.lidar,
                kind = stats.kind.as_str(),
                packets = stats.packets(),
                bytes = stats.bytes(),
                "Packet socket stopped"
            );
        }
    }
}

impl Drop for UdpSensorManager {
    fn drop(&mut self) {
        self.shutdown.trigger();
        for worker in self.workers.iter().chain(&self.closing) {
            worker.abort();
        }
    }
}

/// Sockets to bind for validated settings, MSOP before DIFOP per lidar.
fn endpoints(settings: &DriverSettings) -> Vec<Endpoint> {
    let mut endpoints = Vec::with_capacity(settings.lidar.len() * 2);
    for (lidar, entry) in settings.lidar.iter().enumerate() {
        let driver = &entry.driver;
        // validate_settings has already checked all three.
        let (Ok(lidar_type), Ok(host)) = (
            driver.lidar_type.parse::<LidarType>(),
            driver.host_address.parse::<IpAddr>(),
        ) else {
            continue;
        };
        for (kind, port) in [
            (PortKind::Msop, driver.msop_port),
            (PortKind::Difop, driver.difop_port),
        ] {
            if let Ok(port) = u16::try_from(port) {
                endpoints.push(Endpoint {
                    lidar,
                    lidar_type,
                    kind,
                    addr: SocketAddr::new(host, port),
                });
            }
        }
    }
    endpoints
}

fn bind_socket(addr: SocketAddr) -> Result<UdpSocket, SensorError> {
    let bind_error = |source| SensorError::Bind { addr, source };
    let socket = std::net::UdpSocket::bind(addr).map_err(bind_error)?;
    socket.set_nonblocking(true).map_err(bind_error)?;
    UdpSocket::from_std(socket).map_err(bind_error)
}

async fn receive_loop(socket: UdpSocket, stats: Arc<PortStats>, stop: ShutdownSignal) {
    let mut buf = vec![0u8; MAX_PACKET_SIZE];
    let stopped = stop.wait();
    tokio::pin!(stopped);

    loop {
        tokio::select! {
            _ = &mut stopped => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, peer)) => {
                    stats.record(len);
                    tracing::trace!(
                        lidar = stats.lidar,
                        kind = stats.kind.as_str(),
                        peer = %peer,
                        len,
                        "Packet received"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        lidar = stats.lidar,
                        kind = stats.kind.as_str(),
                        error = %e,
                        "Receive failed"
                    );
                }
            },
        }
    }
}
