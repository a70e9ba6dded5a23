//! Remote evaluation over TCP.
//!
//! A [`RemoteEvaluator`] ships a serializable objective to a
//! [`RemoteReceiver`] once, when it connects, and then evaluates every
//! location on the remote side. The wire format is newline-delimited JSON
//! on one ordered, reliable stream:
//!
//! | Direction | Message | Example |
//! |-----------|---------|---------|
//! | client → receiver | objective, once | `{"inner":null,...}` |
//! | client → receiver | location | `[0.5,-1.25]` |
//! | receiver → client | reply | `{"Ok":0.3}` or `{"Err":"..."}` |
//!
//! The receiver keeps serving until the client closes the stream; that
//! end-of-stream is a normal shutdown. Non-finite objective values have no
//! JSON representation and are answered with an `Err` reply.
//!
//! ```no_run
//! use async_optimize::prelude::*;
//! use async_optimize::remote::RemoteReceiver;
//!
//! // On the evaluation host:
//! let receiver = RemoteReceiver::bind("0.0.0.0:2000").unwrap();
//! receiver.serve_one::<Wavy>().unwrap();
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::evaluator::Evaluator;

/// Reply to one location; `Err` carries the remote error message.
type Reply = core::result::Result<f64, String>;

/// An evaluator that forwards every location to a [`RemoteReceiver`].
///
/// The connection is closed when the evaluator is dropped, which the
/// receiver treats as the end of the session.
pub struct RemoteEvaluator {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    line: String,
}

impl RemoteEvaluator {
    /// Connect to a receiver and send it `objective`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the connection fails and `Error::Protocol` if
    /// the objective cannot be serialized.
    pub fn connect<A, O>(addr: A, objective: &O) -> Result<Self>
    where
        A: ToSocketAddrs,
        O: Serialize + ?Sized,
    {
        let writer = TcpStream::connect(addr)?;
        writer.set_nodelay(true)?;
        let reader = BufReader::new(writer.try_clone()?);
        let mut evaluator = Self {
            reader,
            writer,
            line: String::new(),
        };
        write_message(&mut evaluator.writer, objective)?;
        trace_debug!(peer = ?evaluator.writer.peer_addr().ok(), "remote evaluator connected");
        Ok(evaluator)
    }
}

impl Evaluator for RemoteEvaluator {
    type Error = Error;

    fn evaluate(&mut self, location: &[f64]) -> Result<f64> {
        write_message(&mut self.writer, location)?;
        let reply: Reply = read_message(&mut self.reader, &mut self.line)?
            .ok_or_else(|| Error::Protocol("connection closed before reply".to_string()))?;
        reply.map_err(Error::Remote)
    }
}

/// The receiving end of a [`RemoteEvaluator`].
///
/// # Examples
///
/// ```
/// use async_optimize::prelude::*;
/// use async_optimize::remote::{RemoteEvaluator, RemoteReceiver};
///
/// let receiver = RemoteReceiver::bind("127.0.0.1:0").unwrap();
/// let addr = receiver.local_addr().unwrap();
/// let server = std::thread::spawn(move || receiver.serve_one::<Wavy>());
///
/// let mut evaluator = RemoteEvaluator::connect(addr, &Wavy).unwrap();
/// let value = evaluator.evaluate(&[1.0, 2.0]).unwrap();
/// assert!((value - Wavy.value(&[1.0, 2.0])).abs() < 1e-12);
///
/// drop(evaluator);
/// assert_eq!(server.join().unwrap().unwrap(), 1);
/// ```
pub struct RemoteReceiver {
    listener: TcpListener,
}

impl RemoteReceiver {
    /// Listen for a client on `addr`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the address cannot be bound.
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr)?,
        })
    }

    /// The address the receiver is listening on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept one client and serve it until it disconnects.
    ///
    /// The first message is deserialized as the objective `O`; every
    /// following message is a location evaluated with it. Returns the number
    /// of locations evaluated.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` on connection failures and `Error::Protocol` on
    /// malformed messages or if the client disconnects before sending the
    /// objective.
    pub fn serve_one<O>(&self) -> Result<usize>
    where
        O: Evaluator + DeserializeOwned,
    {
        let (stream, _peer) = self.listener.accept()?;
        trace_debug!(peer = %_peer, "remote client accepted");
        serve_connection::<O>(stream)
    }
}

/// Serve one already-established connection until end-of-stream.
///
/// # Errors
///
/// Same as [`RemoteReceiver::serve_one`].
pub fn serve_connection<O>(stream: TcpStream) -> Result<usize>
where
    O: Evaluator + DeserializeOwned,
{
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    let mut objective: O = read_message(&mut reader, &mut line)?
        .ok_or_else(|| Error::Protocol("connection closed before objective".to_string()))?;

    let mut served = 0;
    while let Some(location) = read_message::<Vec<f64>>(&mut reader, &mut line)? {
        let reply: Reply = match objective.evaluate(&location) {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(value) => Err(format!("non-finite objective value {value}")),
            Err(e) => Err(e.to_string()),
        };
        write_message(&mut writer, &reply)?;
        served += 1;
    }

    trace_debug!(served, "remote client disconnected");
    Ok(served)
}

fn write_message<W: Write, T: Serialize + ?Sized>(writer: &mut W, message: &T) -> Result<()> {
    let mut buf = serde_json::to_vec(message).map_err(|e| Error::Protocol(e.to_string()))?;
    buf.push(b'\n');
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Read one message; `None` at a clean end-of-stream.
fn read_message<T: DeserializeOwned>(
    reader: &mut impl BufRead,
    line: &mut String,
) -> Result<Option<T>> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') {
        return Err(Error::Protocol("truncated message".to_string()));
    }
    serde_json::from_str(line.trim_end())
        .map(Some)
        .map_err(|e| Error::Protocol(e.to_string()))
}
