#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

pub const API_PREFIX: &str = "/processing-times/api";

/// Blocking stub of the processing-times API, served from a background thread.
/// Unknown paths answer 404.
pub fn serve(routes: HashMap<String, (u16, String)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => respond(stream, &routes),
                Err(_) => return,
            }
        }
    });
    addr
}

fn respond(mut stream: TcpStream, routes: &HashMap<String, (u16, String)>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, "{}".to_string()));
    let resp = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(resp.as_bytes());
}

pub fn route(path: &str, status: u16, body: &str) -> (String, (u16, String)) {
    (format!("{API_PREFIX}{path}"), (status, body.to_string()))
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}{API_PREFIX}")
}

/// One form (I-130), one office (Chicago / CHI), two sub types; plus a
/// second form whose office list is broken.
pub fn single_form_routes() -> HashMap<String, (u16, String)> {
    HashMap::from([
        route(
            "/forms",
            200,
            r#"{"data":{"forms":{"forms":[{"form_name":"I-130"},{"form_name":"I-999"}]}}}"#,
        ),
        route(
            "/formoffices/I-130",
            200,
            r#"{"data":{"form_offices":{"offices":[{"office_code":"CHI","office_description":"Chicago"}]}}}"#,
        ),
        route("/formoffices/I-999", 500, "{}"),
        route(
            "/processingtime/I-130/CHI",
            200,
            r#"{"data":{"processing_time":{"subtypes":[
                {"form_type":"A","range":[{"unit":"Months","value":2.0},{"unit":"Months","value":5.0}],"service_request_date":"January 1, 2024","subtype_info_en":" Spouse "},
                {"form_type":"B","range":[{"unit":"Months","value":3.0},{"unit":"Months","value":10.5}],"service_request_date":"March 3, 2023","subtype_info_en":"Parent"}
            ]}}}"#,
        ),
    ])
}
