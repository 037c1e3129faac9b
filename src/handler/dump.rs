//! Request dump module
//!
//! Renders an inbound request as a human-readable wire-style dump and writes
//! it to the configured sink.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use hyper::header::HOST;
use hyper::http::request::Parts;

/// Failure while capturing a request dump
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("failed to write request dump: {0}")]
    Write(#[from] io::Error),
}

/// Where request dumps go
#[derive(Default)]
pub enum DumpSink {
    #[default]
    Stdout,
    /// Any writer, typically an append-mode dump file
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl DumpSink {
    /// Open (or create) a dump file for appending
    pub fn file(path: &str) -> io::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::writer(file))
    }

    pub fn writer(w: impl Write + Send + 'static) -> Self {
        Self::Writer(Mutex::new(Box::new(w)))
    }

    /// Write one dump in a single call so concurrent dumps do not interleave
    pub fn write_dump(&self, dump: &str) -> io::Result<()> {
        let record = format!("{dump}\n\n\n");
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(record.as_bytes())?;
                out.flush()
            }
            Self::Writer(w) => {
                let mut w = w.lock().unwrap_or_else(PoisonError::into_inner);
                w.write_all(record.as_bytes())?;
                w.flush()
            }
        }
    }
}

/// Writers for exercising dump sinks in tests
#[cfg(test)]
pub mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex, PoisonError};

    /// In-memory writer whose contents stay readable after the sink owns it
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer that always fails, like a full disk
    pub struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _data: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

/// Render request head and body
///
/// Layout: request line, `Host` first, remaining headers in received order,
/// blank line, body. Lines end with CRLF as on the wire.
pub fn format_request_dump(parts: &Parts, body: &[u8]) -> String {
    let target = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());

    let mut out = String::new();
    let _ = write!(out, "{} {} {:?}\r\n", parts.method, target, parts.version);

    if let Some(host) = parts.headers.get(HOST) {
        let _ = write!(out, "Host: {}\r\n", String::from_utf8_lossy(host.as_bytes()));
    }
    for (name, value) in parts.headers.iter().filter(|(name, _)| **name != HOST) {
        let _ = write!(
            out,
            "{}: {}\r\n",
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes())
        );
    }

    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    out
}

/// `content-type` -> `Content-Type`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::testing::{FullDisk, SharedBuffer};
    use super::*;
    use hyper::Request;

    fn parts_of(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_format_request_dump() {
        let parts = parts_of(
            Request::builder()
                .method("POST")
                .uri("/user/1?verbose=true")
                .header("content-type", "application/json")
                .header("host", "localhost:3000")
                .header("x-csrf-token", "abc")
                .body(())
                .unwrap(),
        );
        let dump = format_request_dump(&parts, br#"{"name":"groob"}"#);
        assert_eq!(
            dump,
            "POST /user/1?verbose=true HTTP/1.1\r\n\
             Host: localhost:3000\r\n\
             Content-Type: application/json\r\n\
             X-Csrf-Token: abc\r\n\
             \r\n\
             {\"name\":\"groob\"}"
        );
    }

    #[test]
    fn test_format_request_dump_without_host_or_body() {
        let parts = parts_of(Request::builder().uri("/").body(()).unwrap());
        assert_eq!(format_request_dump(&parts, b""), "GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn test_format_request_dump_lossy_body() {
        let parts = parts_of(Request::builder().uri("/bin").body(()).unwrap());
        let dump = format_request_dump(&parts, &[0x66, 0x6f, 0xff, 0x6f]);
        assert!(dump.ends_with("fo\u{fffd}o"));
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("accept"), "Accept");
        assert_eq!(canonical_header_name("accept-encoding"), "Accept-Encoding");
        assert_eq!(canonical_header_name("x-csrf-token"), "X-Csrf-Token");
    }

    #[test]
    fn test_writer_sink_appends_two_blank_lines() {
        let buf = SharedBuffer::default();
        let sink = DumpSink::writer(buf.clone());
        sink.write_dump("GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(buf.contents(), "GET / HTTP/1.1\r\n\r\n\n\n\n");
    }

    #[test]
    fn test_writer_sink_reports_write_failure() {
        let err = DumpSink::writer(FullDisk).write_dump("GET / HTTP/1.1").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_file_sink_appends() {
        let path = std::env::temp_dir().join(format!(
            "cors-debug-server-{}-dump.log",
            std::process::id()
        ));
        std::fs::remove_file(&path).ok();
        let sink = DumpSink::file(path.to_str().unwrap()).unwrap();
        sink.write_dump("first").unwrap();
        sink.write_dump("second").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, "first\n\n\nsecond\n\n\n");
    }

    #[test]
    fn test_dump_error_messages() {
        let err = DumpError::Body("connection reset".to_string());
        assert_eq!(err.to_string(), "failed to read request body: connection reset");

        let err = DumpError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "failed to write request dump: pipe closed");
    }
}
