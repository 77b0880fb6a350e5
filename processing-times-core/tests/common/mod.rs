#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const API_PREFIX: &str = "/processing-times/api";

/// Minimal HTTP/1.1 responder: answers each request path from `routes`
/// (status, body), 404 otherwise. One request per connection.
pub async fn serve(routes: HashMap<String, (u16, String)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move { respond(socket, &routes).await });
        }
    });
    addr
}

/// Accepts connections and never answers.
pub async fn serve_silent() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn respond(mut socket: TcpStream, routes: &HashMap<String, (u16, String)>) {
    let head = read_head(&mut socket).await;
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, "{}".to_string()));
    let resp = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(resp.as_bytes()).await;
    let _ = socket.shutdown().await;
}

pub fn route(path: &str, status: u16, body: &str) -> (String, (u16, String)) {
    (format!("{API_PREFIX}{path}"), (status, body.to_string()))
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}{API_PREFIX}")
}

pub fn forms_body(names: &[&str]) -> String {
    let forms: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"form_name":"{n}","form_description_en":"Form {n}"}}"#))
        .collect();
    format!(r#"{{"data":{{"forms":{{"forms":[{}]}}}}}}"#, forms.join(","))
}

pub fn offices_body(offices: &[(&str, &str)]) -> String {
    let offices: Vec<String> = offices
        .iter()
        .map(|(code, desc)| format!(r#"{{"office_code":"{code}","office_description":"{desc}"}}"#))
        .collect();
    format!(
        r#"{{"data":{{"form_offices":{{"form_name":"x","offices":[{}]}}}}}}"#,
        offices.join(",")
    )
}

pub fn processing_time_body(sub_types: &[(&str, f64, f64, &str)]) -> String {
    let subtypes: Vec<String> = sub_types
        .iter()
        .map(|(info, lower, upper, date)| {
            format!(
                r#"{{"form_type":"type","range":[{{"unit":"Months","value":{lower:.1}}},{{"unit":"Months","value":{upper:.1}}}],"service_request_date":"{date}","subtype_info_en":"{info}"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"data":{{"processing_time":{{"range":[],"subtypes":[{}]}}}}}}"#,
        subtypes.join(",")
    )
}
