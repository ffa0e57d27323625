//! Local backend speaking the feed API over real HTTP, shared by the
//! integration tests.
#![allow(dead_code)]

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tiny_http::{Header, Response, Server};

pub struct Backend {
    pub base_url: String,
    pub refreshes: Arc<AtomicUsize>,
    pub identity_calls: Arc<AtomicUsize>,
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("valid header")
}

fn json(status: u16, body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(header("Content-Type", "application/json"))
}

fn posts(range: std::ops::Range<i64>) -> String {
    range
        .map(|id| format!(r#"{{"id":{id},"username":"jan","text":"post {id}","like_count":0}}"#))
        .collect::<Vec<_>>()
        .join(",")
}

/// Cookie-authenticated backend whose first access token is already expired.
pub fn spawn_backend() -> Backend {
    let server = Server::http("127.0.0.1:0").expect("bind mock backend");
    let base_url = format!("http://{}/api/", server.server_addr());
    let refreshes = Arc::new(AtomicUsize::new(0));
    let identity_calls = Arc::new(AtomicUsize::new(0));

    let next_page = format!("{}feed/?cursor=c1", base_url);
    let refresh_count = refreshes.clone();
    let identity_count = identity_calls.clone();
    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let cookies = request
                .headers()
                .iter()
                .filter(|h| h.field.equiv("Cookie"))
                .map(|h| h.value.as_str().to_string())
                .collect::<Vec<_>>()
                .join("; ");
            let csrf = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("X-CSRFToken"))
                .map(|h| h.value.as_str().to_string());
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let method = request.method().as_str().to_string();
            let url = request.url().to_string();

            let response = match (method.as_str(), url.as_str()) {
                ("GET", "/api/csrf/") => json(200, "{}".into())
                    .with_header(header("Set-Cookie", "csrftoken=abc; Path=/")),
                (_, _) if method != "GET" && csrf.as_deref() != Some("abc") => {
                    json(403, r#"{"detail":"CSRF Failed"}"#.into())
                }
                ("POST", "/api/token/") if body.contains("\"password\":\"pw\"") => {
                    json(200, r#"{"success":true}"#.into())
                        .with_header(header("Set-Cookie", "access_token=stale; Path=/"))
                        .with_header(header("Set-Cookie", "refresh_token=r1; Path=/"))
                }
                ("POST", "/api/token/") => json(401, r#"{"success":false}"#.into()),
                ("POST", "/api/token/refresh/") => {
                    refresh_count.fetch_add(1, Ordering::SeqCst);
                    if cookies.contains("refresh_token=r1") {
                        json(200, r#"{"success":true}"#.into())
                            .with_header(header("Set-Cookie", "access_token=fresh; Path=/"))
                    } else {
                        json(401, r#"{"success":false}"#.into())
                    }
                }
                (_, _) if !cookies.contains("access_token=fresh") => {
                    json(401, r#"{"detail":"token expired"}"#.into())
                }
                ("GET", "/api/authenticated/") => {
                    identity_count.fetch_add(1, Ordering::SeqCst);
                    json(
                        200,
                        r#"{"username":"jan","first_name":"Jan","bio":"","profile_picture":null,
                            "post_count":30,"follower_count":2,"following_count":1}"#
                            .into(),
                    )
                }
                ("GET", "/api/feed/") => json(
                    200,
                    format!(r#"{{"results":[{}],"next":"{}"}}"#, posts(0..5), next_page),
                ),
                ("GET", "/api/feed/?cursor=c1") => json(
                    200,
                    format!(r#"{{"results":[{}],"next":null}}"#, posts(5..8)),
                ),
                ("POST", "/api/logout/") => json(200, r#"{"success":true}"#.into())
                    .with_header(header("Set-Cookie", "access_token=; Path=/; Max-Age=0"))
                    .with_header(header("Set-Cookie", "refresh_token=; Path=/; Max-Age=0")),
                _ => json(404, r#"{"error":"not found"}"#.into()),
            };
            let _ = request.respond(response);
        }
    });

    Backend {
        base_url,
        refreshes,
        identity_calls,
    }
}
