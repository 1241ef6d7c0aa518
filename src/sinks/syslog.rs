//! Syslog sink
//!
//! Sends each line as an RFC 3164 datagram:
//!
//! ```text
//! <PRI>Mmm dd hh:mm:ss ident[pid]: message
//! ```
//!
//! where `PRI` is `facility * 8 + severity`. Locally that means the
//! `/dev/log` Unix datagram socket; remote daemons are reached over UDP.
//! Dropping the sink closes the socket, ending the session.

use crate::core::{LoggerError, Result, Severity, Sink};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::{ToSocketAddrs, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::Path;

/// Default local syslog socket
pub const DEFAULT_SOCKET: &str = "/dev/log";

/// Syslog facility codes, see syslog(3)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facility {
    Kern = 0,
    #[default]
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    AuthPriv = 10,
    Ftp = 11,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    /// The `PRI` value for a message at `severity`
    #[inline]
    pub const fn priority(self, severity: Severity) -> u8 {
        (self as u8) * 8 + severity.value()
    }
}

enum Transport {
    #[cfg(unix)]
    Unix(UnixDatagram),
    Udp(UdpSocket),
}

impl Transport {
    fn send(&self, packet: &[u8]) -> std::io::Result<usize> {
        match self {
            #[cfg(unix)]
            Transport::Unix(socket) => socket.send(packet),
            Transport::Udp(socket) => socket.send(packet),
        }
    }
}

pub struct SyslogSink {
    transport: Transport,
    ident: String,
    facility: Facility,
    pid: Option<u32>,
    packet: String,
}

impl SyslogSink {
    /// Connect to the local daemon at [`DEFAULT_SOCKET`]
    #[cfg(unix)]
    pub fn open(ident: impl Into<String>, facility: Facility) -> Result<Self> {
        Self::unix(DEFAULT_SOCKET, ident, facility)
    }

    /// Connect to a Unix datagram socket
    #[cfg(unix)]
    pub fn unix(
        path: impl AsRef<Path>,
        ident: impl Into<String>,
        facility: Facility,
    ) -> Result<Self> {
        let path = path.as_ref();
        let socket = UnixDatagram::unbound()
            .and_then(|socket| socket.connect(path).map(|()| socket))
            .map_err(|e| {
                LoggerError::io_operation("connect syslog socket", path.display().to_string(), e)
            })?;

        Ok(Self::with_transport(Transport::Unix(socket), ident, facility))
    }

    /// Send to a remote daemon over UDP
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slot_logger::sinks::{Facility, SyslogSink};
    ///
    /// let sink = SyslogSink::udp("127.0.0.1:514", "myapp", Facility::Local0)
    ///     .expect("Failed to reach syslog daemon")
    ///     .with_pid(true);
    /// ```
    pub fn udp(
        addr: impl ToSocketAddrs,
        ident: impl Into<String>,
        facility: Facility,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))
            .and_then(|socket| socket.connect(addr).map(|()| socket))
            .map_err(|e| LoggerError::io_operation("connect syslog socket", "udp", e))?;

        Ok(Self::with_transport(Transport::Udp(socket), ident, facility))
    }

    fn with_transport(transport: Transport, ident: impl Into<String>, facility: Facility) -> Self {
        Self {
            transport,
            ident: ident.into(),
            facility,
            pid: None,
            packet: String::with_capacity(1024 + 64),
        }
    }

    /// Include the process id after the ident, like `LOG_PID`
    #[must_use]
    pub fn with_pid(mut self, enable: bool) -> Self {
        self.pid = enable.then(std::process::id);
        self
    }

    pub fn facility(&self) -> Facility {
        self.facility
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl Sink for SyslogSink {
    fn write(&mut self, severity: Severity, line: &str) -> Result<()> {
        self.packet.clear();
        let timestamp = Local::now().format("%b %e %H:%M:%S");
        let packet = &mut self.packet;

        let formatted = match self.pid {
            Some(pid) => write!(
                packet,
                "<{}>{} {}[{}]: {}",
                self.facility.priority(severity),
                timestamp,
                self.ident,
                pid,
                line
            ),
            None => write!(
                packet,
                "<{}>{} {}: {}",
                self.facility.priority(severity),
                timestamp,
                self.ident,
                line
            ),
        };
        formatted.map_err(|_| LoggerError::writer("Failed to format syslog packet"))?;

        self.transport
            .send(self.packet.as_bytes())
            .map_err(|e| LoggerError::io_operation("send syslog packet", self.ident.clone(), e))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog"
    }
}
