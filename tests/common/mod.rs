#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    pub _tmp: TempDir,
    pub home: PathBuf,
    pub gallery: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let gallery = make_fixture_gallery(tmp.path());
        Self {
            _tmp: tmp,
            home,
            gallery,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("picks");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn page_url(&self, shoot: &str, page: u32) -> String {
        format!("{}/shoot/{}/{}", self.gallery.display(), shoot, page)
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn server_picks_path(&self, shoot: &str) -> PathBuf {
        self.gallery.join("shoot").join(shoot).join("picks.json")
    }

    pub fn jar_dir(&self) -> PathBuf {
        self.home.join(".config/picks/jar")
    }
}

/// Fixture gallery laid out the way the client expects a local source:
/// `shoot/<name>/pages/<n>.json` manifests plus a writable picks slot.
pub fn make_fixture_gallery(base: &Path) -> PathBuf {
    let gallery = base.join("gallery");
    let pages = gallery.join("shoot/wedding/pages");
    fs::create_dir_all(&pages).expect("create fixture pages");

    fs::write(pages.join("0.json"), r#"["img1","img2","img3"]"#).expect("write page 0");
    fs::write(pages.join("1.json"), r#"["img4","img5"]"#).expect("write page 1");
    fs::write(pages.join("3.json"), r#"["img30","img31"]"#).expect("write page 3");

    gallery
}

/// Minimal single-threaded HTTP responder for remote-transport tests.
/// Routes are matched on (method, path-suffix); unmatched requests get 404.
pub struct StubServer {
    pub base: String,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl StubServer {
    pub fn start(routes: Vec<(&'static str, &'static str, u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub addr");
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                // read until end of headers, then drain the body
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        Err(_) => break,
                    }
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let mut lines = head.lines();
                let request = lines.next().unwrap_or_default().to_string();
                let content_length: usize = lines
                    .filter_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(str::trim).map(String::from))
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let header_end = buf
                    .windows(4)
                    .position(|w| w == b"\r\n\r\n")
                    .map(|p| p + 4)
                    .unwrap_or(buf.len());
                let mut body_read = buf.len().saturating_sub(header_end);
                while body_read < content_length {
                    match stream.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => body_read += n,
                        Err(_) => break,
                    }
                }

                let mut parts = request.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();
                if path == "/__shutdown" {
                    let _ = write_response(&mut stream, 200, "{}");
                    break;
                }
                let matched = routes
                    .iter()
                    .find(|(m, suffix, _, _)| *m == method && path.ends_with(suffix));
                match matched {
                    Some((_, _, status, body)) => {
                        let _ = write_response(&mut stream, *status, body);
                    }
                    None => {
                        let _ = write_response(&mut stream, 404, "not found");
                    }
                }
            }
        });
        Self {
            base: format!("http://{}", addr),
            handle: Some(handle),
        }
    }
}

fn write_response(stream: &mut std::net::TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        202 => "Accepted",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}

impl Drop for StubServer {
    fn drop(&mut self) {
        // unblock the accept loop
        let _ = std::net::TcpStream::connect(self.base.trim_start_matches("http://"))
            .and_then(|mut s| {
                write!(s, "GET /__shutdown HTTP/1.1\r\nHost: stub\r\n\r\n")?;
                let mut sink = Vec::new();
                let _ = s.read_to_end(&mut sink);
                Ok(())
            });
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
