//! Scripted HTTP/1.1 server for integration tests.
//!
//! Every connection carries exactly one request; the handler sees the parsed
//! request and returns the raw response bytes. All requests are recorded.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct ScriptedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl ScriptedServer {
    pub async fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                if let Ok((mut socket, _)) = listener.accept().await {
                    let log = log.clone();
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some(req) = read_request(&mut socket).await else {
                            return;
                        };
                        let response = handler(&req);
                        log.lock().unwrap().push(req);
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            }
        });

        Self {
            base_url: format!("http://{}/", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path equals `path`.
    pub fn hits(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// Serialize a response with `Content-Length` and `Connection: close`.
pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for (k, v) in headers {
        out.push_str(&format!("{k}: {v}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    out
}

/// Address nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

async fn read_request(socket: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (body_start + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}

pub const ALICE_LOGIN: &str =
    r#"[{"username":"alice","id":42,"token":"abc","num_tries":0,"success":1,"msg":"","messages":[]}]"#;
pub const BAD_LOGIN: &str = r#"[{"username":"alice","num_tries":1,"success":0,"msg":"Incorrect username or password.","messages":[]}]"#;
pub const PROFILE: &str = r#"{"id":7,"username":"bob","history":{"joined":"2015-01-01T00:00:00.000Z"},"profile":{"id":9,"status":"","bio":"","country":"Japan"}}"#;

/// Responses of a fake Scratch site serving both origins.
#[derive(Debug, Clone)]
pub struct SiteScript {
    /// `None` withholds the CSRF cookie.
    pub csrf_token: Option<&'static str>,
    pub login_status: &'static str,
    pub login_body: &'static str,
    pub profile_status: &'static str,
    pub comment_status: &'static str,
}

impl Default for SiteScript {
    fn default() -> Self {
        Self {
            csrf_token: Some("tok"),
            login_status: "200 OK",
            login_body: ALICE_LOGIN,
            profile_status: "200 OK",
            comment_status: "200 OK",
        }
    }
}

impl SiteScript {
    pub fn handle(&self, req: &Recorded) -> String {
        let json = [("Content-Type", "application/json")];
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/csrf_token/") => match self.csrf_token {
                Some(token) => {
                    let cookie = format!("scratchcsrftoken={token}; Path=/; SameSite=Lax");
                    response("200 OK", &[("Set-Cookie", cookie.as_str())], "")
                }
                None => response("200 OK", &[], ""),
            },
            ("POST", "/accounts/login/") => response(self.login_status, &json, self.login_body),
            ("GET", path) if path.starts_with("/users/") => {
                if self.profile_status.starts_with("200") {
                    response(self.profile_status, &json, PROFILE)
                } else {
                    response(self.profile_status, &json, r#"{"code":"NotFound","message":""}"#)
                }
            }
            ("POST", path) if path.starts_with("/site-api/comments/user/") => {
                response(self.comment_status, &[("Content-Type", "text/html")], "")
            }
            _ => response("404 Not Found", &[], ""),
        }
    }

    pub async fn serve(self) -> ScriptedServer {
        ScriptedServer::spawn(move |req| self.handle(req)).await
    }
}
