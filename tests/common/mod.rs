//! A minimal fake H2 server, speaking just enough of the wire protocol to
//! drive the scenario tests without a real database process.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

pub struct FakeServer {
    stream: TcpStream,
}

impl FakeServer {
    pub fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = listener.accept().unwrap();
        Self { stream }
    }

    pub fn read_i32(&mut self) -> i32 {
        self.stream.read_i32::<BigEndian>().unwrap()
    }

    pub fn read_i64(&mut self) -> i64 {
        self.stream.read_i64::<BigEndian>().unwrap()
    }

    pub fn read_bool(&mut self) -> bool {
        self.stream.read_u8().unwrap() != 0
    }

    pub fn read_string(&mut self) -> String {
        let len = self.read_i32();
        if len <= 0 {
            return String::new();
        }
        let mut units = vec![0_u16; len as usize];
        self.stream.read_u16_into::<BigEndian>(&mut units).unwrap();
        String::from_utf16(&units).unwrap()
    }

    pub fn read_bytes(&mut self) -> Option<Vec<u8>> {
        let len = self.read_i32();
        if len < 0 {
            return None;
        }
        let mut buf = vec![0_u8; len as usize];
        self.stream.read_exact(&mut buf).unwrap();
        Some(buf)
    }

    pub fn write_i32(&mut self, v: i32) {
        self.stream.write_i32::<BigEndian>(v).unwrap();
    }

    pub fn write_i64(&mut self, v: i64) {
        self.stream.write_i64::<BigEndian>(v).unwrap();
    }

    pub fn write_bool(&mut self, v: bool) {
        self.stream.write_u8(u8::from(v)).unwrap();
    }

    pub fn write_string(&mut self, s: &str) {
        if s.is_empty() {
            self.write_i32(-1);
            return;
        }
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_i32(units.len() as i32);
        for unit in units {
            self.stream.write_u16::<BigEndian>(unit).unwrap();
        }
    }

    /// Reads and discards the handshake, replying with an ok status and the
    /// echoed client version.
    pub fn accept_handshake(&mut self) {
        let _min_version = self.read_i32();
        let _max_version = self.read_i32();
        let _database = self.read_string();
        let _url = self.read_string();
        let _username = self.read_string();
        let _password_hash = self.read_bytes();
        let _file_password_hash = self.read_bytes();
        let _property_count = self.read_i32();

        self.write_i32(1); // Status::Ok
        self.write_i32(19);
        self.stream.flush().unwrap();
    }

    pub fn flush(&mut self) {
        self.stream.flush().unwrap();
    }
}
