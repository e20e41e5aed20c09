use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use proxybench::probe::{probe, ProbeError};

// Minimal forward-proxy stand-in: accepts one connection, consumes the
// request head and answers it directly with the given status.
fn spawn_proxy(status: u16, reason: &'static str) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind proxy stub");
    let addr = listener.local_addr().expect("proxy stub addr");

    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request_head(&mut stream);
            let body = "proxied";
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .expect("write stub response");
        }
    });

    (format!("http://{}", addr), handle)
}

fn read_request_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                head.extend_from_slice(&chunk[..n]);
                if head.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

#[tokio::test]
async fn test_successful_probe_records_status_and_phase_timings() {
    let (proxy, handle) = spawn_proxy(200, "OK");

    let record = probe(&proxy, "http://upstream.test/").await;

    assert!(record.error.is_none(), "unexpected error: {:?}", record.error);
    assert_eq!(record.status_code, 200);
    assert!(record.total_time > Duration::ZERO);
    // The phases nest: connect finishes before the first byte arrives,
    // and the first byte arrives before the headers are complete.
    assert!(record.connect_time <= record.first_byte_time);
    assert!(record.first_byte_time <= record.total_time);

    handle.join().expect("proxy stub thread");
}

#[tokio::test]
async fn test_server_errors_still_count_as_transport_success() {
    let (proxy, handle) = spawn_proxy(500, "Internal Server Error");

    let record = probe(&proxy, "http://upstream.test/").await;

    // A 500 is a response like any other; only failing to get a
    // response at all is an error.
    assert!(record.error.is_none(), "unexpected error: {:?}", record.error);
    assert_eq!(record.status_code, 500);
    assert!(record.total_time > Duration::ZERO);

    handle.join().expect("proxy stub thread");
}

#[tokio::test]
async fn test_unreachable_proxy_yields_transport_error() {
    // Nothing listens on port 1, so the connect is refused.
    let record = probe("http://127.0.0.1:1", "http://upstream.test/").await;

    assert!(matches!(record.error, Some(ProbeError::Transport(_))));
    assert_eq!(record.status_code, 0);
    assert_eq!(record.connect_time, Duration::ZERO);
    assert_eq!(record.first_byte_time, Duration::ZERO);
    assert_eq!(record.total_time, Duration::ZERO);
}

#[tokio::test]
async fn test_malformed_proxy_endpoint_fails_before_any_io() {
    let record = probe("not a proxy", "http://upstream.test/").await;

    assert!(matches!(record.error, Some(ProbeError::Proxy(_))));
    assert_eq!(record.status_code, 0);
}

#[tokio::test]
async fn test_malformed_target_fails_before_any_io() {
    let record = probe("http://127.0.0.1:1", "not a target").await;

    assert!(matches!(record.error, Some(ProbeError::Request(_))));
    assert_eq!(record.status_code, 0);
}
