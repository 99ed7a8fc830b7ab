#![allow(dead_code)]

pub mod test_server {
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Reserve a free local port by binding to port 0 and releasing it.
    pub fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// A raw HTTP/1.1 response split into its parts
    #[derive(Debug)]
    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl RawResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Send `req` and read exactly one response, using `Content-Length` to find its end.
    pub fn send_request(addr: &SocketAddr, req: &str) -> RawResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        stream.write_all(req.as_bytes()).unwrap();

        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        loop {
            if let Some(response) = parse_complete(&buf) {
                return response;
            }
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        parse_complete(&buf).unwrap_or_else(|| {
            panic!("incomplete response: {:?}", String::from_utf8_lossy(&buf))
        })
    }

    fn parse_complete(buf: &[u8]) -> Option<RawResponse> {
        let text = String::from_utf8_lossy(buf);
        let (head, body) = text.split_once("\r\n\r\n")?;
        let mut lines = head.lines();
        let status = lines
            .next()?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()?;
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
            .collect();
        let length: usize = headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);
        if body.len() < length {
            return None;
        }
        Some(RawResponse {
            status,
            headers,
            body: body[..length].to_string(),
        })
    }
}
