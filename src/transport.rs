//! Buffered, big-endian framed transport over a single TCP connection.
//!
//! `Transport` is the only part of this crate that touches a socket. All
//! multi-byte scalars are big-endian; strings are length-prefixed UTF-16BE
//! where the length is a character count, not a byte count.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};

use crate::error::{Error, Result};

/// A paired read/write buffer over one TCP connection.
///
/// The write half accumulates bytes until [`Transport::flush`] is called;
/// the read half is only ever consulted after a flush, never concurrently
/// with it. Between a flush and the first read of the corresponding
/// response, no further writes may be issued (callers hold up this
/// invariant, the Transport does not enforce it itself).
pub struct Transport {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Transport {
    /// Connects to `host:port`, applying `tcp_nodelay` and an optional
    /// connect timeout.
    pub fn connect(
        host: &str,
        port: u16,
        tcp_nodelay: bool,
        connect_timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = match connect_timeout {
            Some(timeout) => {
                use std::net::ToSocketAddrs;
                let addr = (host, port)
                    .to_socket_addrs()?
                    .next()
                    .ok_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no address resolved")
                    })?;
                TcpStream::connect_timeout(&addr, timeout)?
            }
            None => TcpStream::connect((host, port))?,
        };
        stream.set_nodelay(tcp_nodelay)?;
        let writer_half = stream.try_clone()?;
        trace!("connected to {host}:{port}");
        Ok(Self {
            reader: BufReader::new(stream),
            writer: BufWriter::new(writer_half),
        })
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.writer.write_u8(u8::from(v))?;
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.reader.read_u8()? != 0)
    }

    pub fn write_byte(&mut self, v: u8) -> Result<()> {
        self.writer.write_u8(v)?;
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.reader.read_u8()?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.writer.write_i16::<BigEndian>(v)?;
        Ok(())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.reader.read_i16::<BigEndian>()?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.writer.write_i32::<BigEndian>(v)?;
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.reader.read_i32::<BigEndian>()?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.writer.write_i64::<BigEndian>(v)?;
        Ok(())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.reader.read_i64::<BigEndian>()?)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.writer.write_f32::<BigEndian>(v)?;
        Ok(())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.reader.read_f32::<BigEndian>()?)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.writer.write_f64::<BigEndian>(v)?;
        Ok(())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.reader.read_f64::<BigEndian>()?)
    }

    /// Writes a length-prefixed UTF-16BE string. The prefix is the character
    /// count; an empty string is written as length `-1`.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.write_i32(-1);
        }
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_i32(i32::try_from(units.len()).unwrap_or(i32::MAX))?;
        for unit in units {
            self.writer.write_u16::<BigEndian>(unit)?;
        }
        Ok(())
    }

    /// Reads a length-prefixed UTF-16BE string. `-1` or `0` both decode to
    /// the empty string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_i32()?;
        if len <= 0 {
            return Ok(String::new());
        }
        let len = usize::try_from(len).unwrap_or(0);
        let mut units = vec![0_u16; len];
        self.reader.read_u16_into::<BigEndian>(&mut units)?;
        String::from_utf16(&units)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Writes a length-prefixed byte array; `None` or empty is written as
    /// length `-1`.
    pub fn write_bytes(&mut self, b: Option<&[u8]>) -> Result<()> {
        match b {
            None => self.write_i32(-1),
            Some(b) if b.is_empty() => self.write_i32(-1),
            Some(b) => {
                self.write_i32(i32::try_from(b.len()).unwrap_or(i32::MAX))?;
                self.writer.write_all(b)?;
                Ok(())
            }
        }
    }

    /// Reads a length-prefixed byte array; `-1` decodes to `None`.
    pub fn read_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        let len = self.read_i32()?;
        if len < 0 {
            return Ok(None);
        }
        let mut buf = vec![0_u8; usize::try_from(len).unwrap_or(0)];
        self.reader.read_exact(&mut buf)?;
        Ok(Some(buf))
    }

    #[cfg(test)]
    pub(crate) fn from_stream(stream: TcpStream) -> Result<Self> {
        let writer_half = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer: BufWriter::new(writer_half),
        })
    }

    /// Flushes the write buffer to the socket. This is the only
    /// synchronization boundary: after this call the server is free to
    /// begin producing a response.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        debug!("flushed request");
        Ok(())
    }
}
