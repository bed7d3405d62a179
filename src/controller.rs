//! Individual controller sessions.

use std::io;
use std::time::Duration;

use log::debug;

use crate::command;
use crate::errors::Error;
use crate::runtime::{self, AsyncTcpStream, Instant, TcpStream};
use crate::state::{DeviceState, STATE_FRAME_LEN};
use crate::types::{ChannelLevels, EffectMode, PowerState, Speed};

type Result<T> = std::result::Result<T, Error>;

/// A session with a single LED controller.
///
/// A `Controller` owns one TCP connection to a physical device and is the
/// only writer on it. All operations share a fixed 1 second deadline; none
/// of them retries. The session carries no internal locking: exclusive use
/// is expressed through `&mut self`, so serializing access across tasks is
/// the caller's concern.
///
/// # Example
///
/// ```ignore
/// use magichome_rs::{ChannelLevels, Controller};
///
/// let mut controller = Controller::connect("192.168.1.50").await?;
/// let state = controller.query_state().await?;
/// println!("power: {:?}", state.power());
/// controller.set_channels(&ChannelLevels::rgb(255, 64, 0)).await?;
/// ```
#[derive(Debug)]
pub struct Controller {
    addr: String,
    stream: Option<TcpStream>,
    state: Option<DeviceState>,
}

impl Controller {
    /// TCP port the controllers listen on.
    pub const PORT: u16 = 5577;
    const TIMEOUT_MS: u64 = 1000;

    /// Open a session to the controller at `host`.
    ///
    /// A failed or timed-out connect yields [`Error::Connection`]; no session
    /// exists afterwards and nothing is retried.
    pub async fn connect(host: &str) -> Result<Self> {
        Self::connect_addr(&format!("{host}:{}", Self::PORT)).await
    }

    async fn connect_addr(addr: &str) -> Result<Self> {
        let stream = runtime::timeout(Self::io_timeout(), TcpStream::connect(addr))
            .await
            .map_err(|_| Error::Connection {
                host: addr.to_string(),
                err: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
            })?
            .map_err(|err| Error::Connection {
                host: addr.to_string(),
                err,
            })?;
        debug!("connected to controller at {addr}");
        Ok(Controller {
            addr: addr.to_string(),
            stream: Some(stream),
            state: None,
        })
    }

    /// The address this session is connected to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The snapshot produced by the most recent successful state query.
    pub fn state(&self) -> Option<&DeviceState> {
        self.state.as_ref()
    }

    /// Query the controller and return its decoded state.
    ///
    /// Sends the state probe, then accumulates reads until the 14-byte reply
    /// is complete or the deadline elapses. The decoded snapshot replaces the
    /// one held by the session; on any failure the held snapshot is left
    /// unchanged.
    pub async fn query_state(&mut self) -> Result<DeviceState> {
        let stream = self.stream()?;
        write_frame(stream, &command::STATE_QUERY, "state query").await?;
        let mut reply = [0u8; STATE_FRAME_LEN];
        read_exact_deadline(stream, &mut reply, "state query").await?;
        let state = DeviceState::decode(&reply)?;
        debug!("controller {} reported {:?}", self.addr, state);
        self.state = Some(state);
        Ok(state)
    }

    /// Switch the controller on or off.
    ///
    /// The device acknowledges power commands by echoing them back; returns
    /// `true` only when the echo matches the sent command byte-for-byte.
    pub async fn set_power(&mut self, power: PowerState) -> Result<bool> {
        let command = command::power_command(power)?;
        let stream = self.stream()?;
        write_frame(stream, &command, "set power").await?;
        let mut echo = vec![0u8; command.len()];
        read_exact_deadline(stream, &mut echo, "set power").await?;
        Ok(echo == command)
    }

    /// Switch the controller on.
    pub async fn turn_on(&mut self) -> Result<bool> {
        self.set_power(PowerState::On).await
    }

    /// Switch the controller off.
    pub async fn turn_off(&mut self) -> Result<bool> {
        self.set_power(PowerState::Off).await
    }

    /// Set the five output channel levels.
    pub async fn set_channels(&mut self, levels: &ChannelLevels) -> Result<()> {
        let command = command::channel_command(levels);
        self.send_command(&command, "set channels").await
    }

    /// Start an effect mode at the given speed.
    ///
    /// Fails with [`Error::UnsupportedMode`] before any I/O when `mode` has
    /// no wire encoding.
    pub async fn set_mode(&mut self, mode: EffectMode, speed: Speed) -> Result<()> {
        let command = command::mode_command(mode, speed)?;
        self.send_command(&command, "set mode").await
    }

    /// Shut the connection down and release the socket.
    ///
    /// Every operation after this fails with [`Error::Closed`].
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream
                .shutdown()
                .await
                .map_err(|e| Error::socket("shutdown", e))?;
        }
        Ok(())
    }

    // Channel and mode commands are write-only: the device does not echo
    // them, and waiting for a confirmation that never comes would stall the
    // session until the deadline. Only power commands are echoed.
    async fn send_command(&mut self, command: &[u8], action: &str) -> Result<()> {
        let stream = self.stream()?;
        write_frame(stream, command, action).await
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream),
            None => Err(Error::Closed(self.addr.clone())),
        }
    }

    fn io_timeout() -> Duration {
        Duration::from_millis(Self::TIMEOUT_MS)
    }
}

async fn write_frame(stream: &mut TcpStream, frame: &[u8], action: &str) -> Result<()> {
    runtime::timeout(Controller::io_timeout(), stream.write_all(frame))
        .await
        .map_err(|_| Error::timeout(action))?
        .map_err(|e| Error::socket("write", e))
}

/// Fill `buf` from the stream, tolerating partial reads of arbitrary length,
/// within one operation deadline.
async fn read_exact_deadline(stream: &mut TcpStream, buf: &mut [u8], action: &str) -> Result<()> {
    let started = Instant::now();
    let mut filled = 0;
    while filled < buf.len() {
        let remaining = Controller::io_timeout()
            .checked_sub(started.elapsed())
            .ok_or_else(|| Error::timeout(action))?;
        let read = runtime::timeout(remaining, stream.read(&mut buf[filled..]))
            .await
            .map_err(|_| Error::timeout(action))?
            .map_err(|e| Error::socket("read", e))?;
        if read == 0 {
            return Err(Error::socket(
                "read",
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before the reply completed",
                ),
            ));
        }
        filled += read;
    }
    Ok(())
}

#[cfg(all(test, feature = "runtime-tokio"))]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const REPLY: [u8; STATE_FRAME_LEN] = [
        0x81, 0x25, 0x23, 0x61, 0x00, 0x1f, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0xf0, 0x00,
    ];

    async fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_query_state_accumulates_partial_reads() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut probe = [0u8; 4];
            socket.read_exact(&mut probe).await.unwrap();
            assert_eq!(probe, command::STATE_QUERY);
            // split the reply to force the client through two reads
            socket.write_all(&REPLY[..5]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            socket.write_all(&REPLY[5..]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        let state = controller.query_state().await.unwrap();
        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.channels().red, 0xff);
        assert_eq!(controller.state(), Some(&state));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_state_times_out_without_reply() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut probe = [0u8; 4];
            socket.read_exact(&mut probe).await.unwrap();
            // never answer, but keep the socket open past the deadline
            tokio::time::sleep(Duration::from_millis(1300)).await;
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        let err = controller.query_state().await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }), "got {err:?}");
        assert!(controller.state().is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_state_rejects_malformed_reply() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut probe = [0u8; 4];
            socket.read_exact(&mut probe).await.unwrap();
            let mut reply = REPLY;
            reply[0] = 0x00;
            socket.write_all(&reply).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        let err = controller.query_state().await.unwrap_err();
        assert!(matches!(err, Error::FrameHeader { .. }), "got {err:?}");
        // a bad reply must not overwrite the held snapshot
        assert!(controller.state().is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_power_matches_echo() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = [0u8; 4];
            socket.read_exact(&mut received).await.unwrap();
            assert_eq!(received, [0x71, 0x23, 0x0f, 0xa3]);
            socket.write_all(&received).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        assert!(controller.turn_on().await.unwrap());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_power_detects_echo_mismatch() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = [0u8; 4];
            socket.read_exact(&mut received).await.unwrap();
            socket.write_all(&[0x00, 0x00, 0x00, 0x00]).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        assert!(!controller.turn_off().await.unwrap());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_power_rejects_unknown_before_io() {
        let (listener, addr) = listener().await;
        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        let err = controller.set_power(PowerState::Unknown).await.unwrap_err();
        assert_eq!(err, Error::UnsupportedPower(PowerState::Unknown));
        drop(listener);
    }

    #[tokio::test]
    async fn test_set_channels_is_write_only() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = [0u8; 18];
            socket.read_exact(&mut received).await.unwrap();
            assert_eq!(received[0], 0x31);
            assert_eq!(&received[1..4], &[10, 20, 30]);
            assert_eq!(received[9], 0x31);
            // deliberately no reply
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        controller
            .set_channels(&ChannelLevels::rgb(10, 20, 30))
            .await
            .unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_mode_is_write_only() {
        let (listener, addr) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = [0u8; 5];
            socket.read_exact(&mut received).await.unwrap();
            assert_eq!(&received[..4], &[0x61, 0x30, 0x1f, 0x0f]);
        });

        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        controller
            .set_mode(EffectMode::SevenColorStrobeFlash, Speed::new())
            .await
            .unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_session_rejects_operations() {
        let (listener, addr) = listener().await;
        let mut controller = Controller::connect_addr(&addr).await.unwrap();
        controller.close().await.unwrap();
        let err = controller.query_state().await.unwrap_err();
        assert!(matches!(err, Error::Closed(_)), "got {err:?}");
        drop(listener);
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let (listener, addr) = listener().await;
        drop(listener);
        let err = Controller::connect_addr(&addr).await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }), "got {err:?}");
    }
}
