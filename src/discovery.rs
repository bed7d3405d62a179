//! Controller discovery via UDP broadcast.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::controller::Controller;
use crate::errors::Error;
use crate::runtime::{self, AsyncUdpSocket, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

const DISCOVERY_PORT: u16 = 48899;
const DISCOVERY_MESSAGE: &[u8] = b"HF-A11ASSISTHREAD";
const REPLY_BUFFER_LEN: usize = 256;

/// A controller found on the network.
///
/// Identity is the full (host, mac, model) triple; discovery never produces
/// a partially filled descriptor. Descriptors can also be built statically
/// for controllers with known addresses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    /// IP address of the controller
    pub host: String,
    /// MAC address of the controller
    pub mac: String,
    /// Module model string reported by the controller
    pub model: String,
}

impl DeviceDescriptor {
    pub fn new(host: &str, mac: &str, model: &str) -> Self {
        DeviceDescriptor {
            host: host.to_string(),
            mac: mac.to_string(),
            model: model.to_string(),
        }
    }

    /// Open a [`Controller`] session to this device.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let descriptors = discover_controllers(&config).await?;
    /// for descriptor in descriptors {
    ///     let mut controller = descriptor.connect().await?;
    ///     controller.turn_on().await?;
    /// }
    /// ```
    pub async fn connect(&self) -> Result<Controller> {
        Controller::connect(&self.host).await
    }
}

/// Parameters for a discovery scan.
///
/// Only the broadcast address is mandatory; it depends on the local
/// network layout (e.g. `192.168.1.255` for a /24 network).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Address the probe datagram is broadcast to
    pub broadcast_address: String,
    /// How long to wait for each reply before an attempt is considered done
    pub scan_timeout: Duration,
    /// Number of probe/listen rounds
    pub attempts: u32,
}

impl DiscoveryConfig {
    pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_millis(2000);
    pub const DEFAULT_ATTEMPTS: u32 = 2;

    /// Configuration with the default timeout and attempt count.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::DiscoveryConfig;
    ///
    /// let config = DiscoveryConfig::new("192.168.1.255");
    /// assert_eq!(config.attempts, 2);
    /// ```
    pub fn new(broadcast_address: impl Into<String>) -> Self {
        DiscoveryConfig {
            broadcast_address: broadcast_address.into(),
            scan_timeout: Self::DEFAULT_SCAN_TIMEOUT,
            attempts: Self::DEFAULT_ATTEMPTS,
        }
    }
}

/// Discover LED controllers on the local network using UDP broadcast.
///
/// Each attempt broadcasts the discovery probe and then collects reply
/// datagrams until one receive times out; the timeout is the expected end of
/// a round, not an error. Replies from all attempts are merged and
/// deduplicated by the full descriptor triple.
///
/// A failed broadcast send aborts the whole call with [`Error::Broadcast`];
/// malformed replies are logged and dropped.
///
/// # Examples
///
/// ```ignore
/// use magichome_rs::{DiscoveryConfig, discover_controllers};
///
/// let config = DiscoveryConfig::new("192.168.1.255");
/// let descriptors = discover_controllers(&config).await?;
/// for d in &descriptors {
///     println!("{} - {} ({})", d.host, d.mac, d.model);
/// }
/// ```
pub async fn discover_controllers(config: &DiscoveryConfig) -> Result<Vec<DeviceDescriptor>> {
    discover_on(config, DISCOVERY_PORT).await
}

async fn discover_on(config: &DiscoveryConfig, port: u16) -> Result<Vec<DeviceDescriptor>> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::socket("bind", e))?;
    socket
        .set_broadcast(true)
        .map_err(|e| Error::socket("set_broadcast", e))?;

    let target = format!("{}:{}", config.broadcast_address, port);
    let mut found: HashSet<DeviceDescriptor> = HashSet::new();

    for attempt in 0..config.attempts {
        debug!("discovery attempt {attempt} on {target}");
        socket
            .send_to(DISCOVERY_MESSAGE, &target)
            .await
            .map_err(|err| Error::Broadcast {
                addr: target.clone(),
                err,
            })?;

        let replies = collect_replies(&socket, config.scan_timeout).await;
        for (payload, from) in &replies {
            if let Some(descriptor) = parse_reply(payload, from) {
                debug!("found {descriptor:?}");
                found.insert(descriptor);
            }
        }
    }

    Ok(found.into_iter().collect())
}

/// Gather reply datagrams until a receive times out.
async fn collect_replies(socket: &UdpSocket, recv_timeout: Duration) -> Vec<(Vec<u8>, SocketAddr)> {
    let mut replies = Vec::new();
    let mut buffer = [0u8; REPLY_BUFFER_LEN];
    loop {
        match runtime::timeout(recv_timeout, socket.recv_from(&mut buffer)).await {
            Ok(Ok((size, from))) => replies.push((buffer[..size].to_vec(), from)),
            Ok(Err(e)) => {
                error!("discovery receive failed: {e}");
                break;
            }
            Err(_) => {
                debug!("discovery round complete, received {} replies", replies.len());
                break;
            }
        }
    }
    replies
}

/// Parse one reply datagram: `<ip>,<mac>,<model>`, possibly padded.
fn parse_reply(payload: &[u8], from: &SocketAddr) -> Option<DeviceDescriptor> {
    let text = String::from_utf8_lossy(payload);
    let text = text.trim_end_matches(['\0', '\r', '\n', ' ']);
    let tokens: Vec<&str> = text.split(',').collect();
    if tokens.len() != 3 {
        warn!("discovery answer from {from} has wrong payload: {text:?}");
        return None;
    }
    Some(DeviceDescriptor::new(tokens[0], tokens[1], tokens[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_addr() -> SocketAddr {
        "192.168.1.50:48899".parse().unwrap()
    }

    #[test]
    fn test_parse_well_formed_reply() {
        let descriptor =
            parse_reply(b"192.168.1.50,ACCF239939B4,HF-LPB100-ZJ200", &from_addr()).unwrap();
        assert_eq!(
            descriptor,
            DeviceDescriptor::new("192.168.1.50", "ACCF239939B4", "HF-LPB100-ZJ200")
        );
    }

    #[test]
    fn test_parse_trims_padding() {
        let mut payload = b"192.168.1.50,ACCF239939B4,HF-LPB100-ZJ200".to_vec();
        payload.extend_from_slice(&[0u8; 16]);
        let descriptor = parse_reply(&payload, &from_addr()).unwrap();
        assert_eq!(descriptor.model, "HF-LPB100-ZJ200");
    }

    #[test]
    fn test_parse_drops_wrong_token_count() {
        assert!(parse_reply(b"bad,data", &from_addr()).is_none());
        assert!(parse_reply(b"a,b,c,d", &from_addr()).is_none());
        assert!(parse_reply(b"", &from_addr()).is_none());
    }

    #[test]
    fn test_descriptor_identity_is_full_triple() {
        let mut set = HashSet::new();
        set.insert(DeviceDescriptor::new("10.0.0.1", "AA", "M1"));
        set.insert(DeviceDescriptor::new("10.0.0.1", "AA", "M1"));
        set.insert(DeviceDescriptor::new("10.0.0.1", "AA", "M2"));
        assert_eq!(set.len(), 2);
    }

    #[cfg(feature = "runtime-tokio")]
    mod socket_tests {
        use super::*;

        /// Answer `count` probes with the given payloads, one datagram each.
        async fn spawn_responder(replies: Vec<&'static [u8]>) -> u16 {
            let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let port = socket.local_addr().unwrap().port();
            tokio::spawn(async move {
                let mut buf = [0u8; 64];
                for reply in replies {
                    let (size, from) = socket.recv_from(&mut buf).await.unwrap();
                    assert_eq!(&buf[..size], DISCOVERY_MESSAGE);
                    socket.send_to(reply, from).await.unwrap();
                }
            });
            port
        }

        #[tokio::test]
        async fn test_attempts_are_merged_and_deduplicated() {
            let port = spawn_responder(vec![
                b"10.0.0.9,ACCF239939B4,HF-LPB100",
                b"10.0.0.9,ACCF239939B4,HF-LPB100",
            ])
            .await;

            let mut config = DiscoveryConfig::new("127.0.0.1");
            config.scan_timeout = Duration::from_millis(200);

            let descriptors = discover_on(&config, port).await.unwrap();
            assert_eq!(
                descriptors,
                vec![DeviceDescriptor::new("10.0.0.9", "ACCF239939B4", "HF-LPB100")]
            );
        }

        #[tokio::test]
        async fn test_malformed_reply_is_dropped_not_fatal() {
            let port = spawn_responder(vec![b"not-a-descriptor", b"10.0.0.7,AA,BB"]).await;

            let mut config = DiscoveryConfig::new("127.0.0.1");
            config.scan_timeout = Duration::from_millis(200);

            let descriptors = discover_on(&config, port).await.unwrap();
            assert_eq!(descriptors, vec![DeviceDescriptor::new("10.0.0.7", "AA", "BB")]);
        }

        #[tokio::test]
        async fn test_silence_yields_empty_set() {
            // bind a responder that never answers
            let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let port = socket.local_addr().unwrap().port();

            let mut config = DiscoveryConfig::new("127.0.0.1");
            config.scan_timeout = Duration::from_millis(100);

            let descriptors = discover_on(&config, port).await.unwrap();
            assert!(descriptors.is_empty());
            drop(socket);
        }
    }
}
