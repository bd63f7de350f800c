//! # MORSE socket client
//!
//! `morse` talks to a running [MORSE] simulation through its socket
//! middleware.
//!
//! Services are line oriented: every request is
//! `<id> <component> <service> [json args]` and every reply is
//! `<id> <STATUS> [json result]`. Data streams (e.g. a robot's pose
//! sensor) live on their own port, looked up through the
//! `simulation.get_stream_port` service, and push one JSON object per
//! line.
//!
//! [MORSE]: https://www.openrobots.org/morse/doc/stable/morse.html

mod error;

pub use crate::error::MorseError;
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader, ErrorKind, Write},
    net::{Shutdown, TcpStream},
    time::Duration,
};

/// Port MORSE listens on for service requests.
pub const DEFAULT_PORT: u16 = 4000;

const SUCCESS: &str = "SUCCESS";

/// A connection to a MORSE simulation.
///
/// The service socket is held open for the lifetime of this value and
/// shut down when it is dropped.
pub struct Morse {
    host: String,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    timeout: Option<Duration>,
    next_id: u64,

    /// Stream ports which have already been looked up.
    stream_ports: HashMap<String, u16>,
}

/// A sample from a pose sensor stream.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub roll: f64,
}

impl Morse {
    /// Connects to the service port of the simulation at `host`.
    pub fn connect(host: &str, port: u16) -> Result<Self, MorseError> {
        debug!("connecting to morse at {host}:{port}");
        let stream = TcpStream::connect((host, port))?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            host: host.to_owned(),
            stream,
            reader,
            timeout: None,
            next_id: 0,
            stream_ports: HashMap::new(),
        })
    }

    /// Sets the read/write timeout for service calls and stream reads.
    ///
    /// `None` (the default) blocks indefinitely.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), MorseError> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        self.timeout = timeout;
        Ok(())
    }

    /// Calls `component.service(args)` and deserializes its result.
    pub fn rpc<T: DeserializeOwned>(
        &mut self,
        component: &str,
        service: &str,
        args: &[Value],
    ) -> Result<T, MorseError> {
        let id = format!("req{}", self.next_id);
        self.next_id += 1;

        let request = if args.is_empty() {
            format!("{id} {component} {service}")
        } else {
            format!(
                "{id} {component} {service} {}",
                serde_json::to_string(args)?
            )
        };
        debug!("-> {request}");
        writeln!(self.stream, "{request}")?;
        self.stream.flush()?;

        // Replies to earlier, abandoned requests may still be queued,
        // including the tail of one cut short by a read timeout.
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(io::Error::from(ErrorKind::UnexpectedEof).into());
            }
            debug!("<- {}", line.trim_end());
            let reply = match Reply::parse(&line) {
                Ok(reply) => reply,
                Err(e) => {
                    debug!("skipping {e}");
                    continue;
                }
            };
            if reply.id != id {
                continue;
            }
            if reply.status != SUCCESS {
                return Err(MorseError::Status {
                    component: component.to_owned(),
                    service: service.to_owned(),
                    status: reply.status.to_owned(),
                    message: reply.result.to_owned(),
                });
            }
            let result = if reply.result.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(reply.result)?
            };
            return Ok(serde_json::from_value(result)?);
        }
    }

    /// Returns the names of every robot in the scene.
    pub fn list_robots(&mut self) -> Result<Vec<String>, MorseError> {
        self.rpc("simulation", "list_robots", &[])
    }

    /// Returns the names (`robot.component`) of every data stream.
    pub fn list_streams(&mut self) -> Result<Vec<String>, MorseError> {
        self.rpc("simulation", "list_streams", &[])
    }

    /// Returns the port `stream` is published on.
    pub fn stream_port(&mut self, stream: &str) -> Result<u16, MorseError> {
        if let Some(port) = self.stream_ports.get(stream) {
            return Ok(*port);
        }
        let port = self.rpc("simulation", "get_stream_port", &[stream.into()])?;
        self.stream_ports.insert(stream.to_owned(), port);
        Ok(port)
    }

    /// Returns the distance (m) between two robots and whether they
    /// are in line of sight of each other.
    pub fn distance_and_view(&mut self, a: &str, b: &str) -> Result<(f64, bool), MorseError> {
        self.rpc("communication", "distance_and_view", &[a.into(), b.into()])
    }

    /// Returns the most recent sample of pose `stream` (`robot.sensor`).
    pub fn pose(&mut self, stream: &str) -> Result<Pose, MorseError> {
        let port = self.stream_port(stream)?;
        let conn = TcpStream::connect((self.host.as_str(), port))?;
        conn.set_read_timeout(self.timeout)?;
        let mut line = String::new();
        if BufReader::new(conn).read_line(&mut line)? == 0 {
            return Err(io::Error::from(ErrorKind::UnexpectedEof).into());
        }
        Ok(serde_json::from_str(&line)?)
    }
}

impl Drop for Morse {
    fn drop(&mut self) {
        // The peer may already be gone, nothing left to do about it.
        let _ = self.stream.shutdown(Shutdown::Both);
        info!("simulator connection closed");
    }
}

/// A service reply, borrowed from the raw line.
#[derive(Debug, PartialEq, Eq)]
struct Reply<'a> {
    id: &'a str,
    status: &'a str,
    result: &'a str,
}

impl<'a> Reply<'a> {
    fn parse(line: &'a str) -> Result<Self, MorseError> {
        let mut fields = line.trim_end().splitn(3, ' ');
        match (fields.next(), fields.next()) {
            (Some(id), Some(status)) if !id.is_empty() && !status.is_empty() => Ok(Self {
                id,
                status,
                result: fields.next().unwrap_or("").trim(),
            }),
            _ => Err(MorseError::Protocol(line.to_owned())),
        }
    }
}
