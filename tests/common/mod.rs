use pifpwned::checker::sha1_hex;
use pifpwned::config::Config;
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const MARKER: &str = "***5642bee8-a5ff-11dc-8314-0800200c9a66***";

/// A request seen by [`RangeServer`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: Option<String>,
}

/// Minimal HTTP server standing in for the range API.
///
/// Prefixes without a canned response get a 404.
pub struct RangeServer {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[derive(Default)]
pub struct RangeServerBuilder {
    responses: HashMap<String, (u16, String)>,
}

impl RangeServerBuilder {
    /// Serves a 200 range for `password`'s prefix listing it `count` times.
    pub fn pwned(mut self, password: &str, count: u64) -> Self {
        let hash = sha1_hex(password);
        let body = format!(
            "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n{}:{}\r\n011053FD0102E94D6AE2F8B83D76FAF94F6:13",
            hash[5..].to_uppercase(),
            count
        );
        self.responses.insert(hash[..5].to_string(), (200, body));
        self
    }

    pub fn status(mut self, password: &str, status: u16) -> Self {
        let hash = sha1_hex(password);
        self.responses.insert(hash[..5].to_string(), (status, String::new()));
        self
    }

    pub async fn start(self) -> RangeServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(self.responses);

        let seen_task = seen.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let seen = seen_task.clone();
                let responses = responses.clone();

                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&buf).into_owned();
                    let path = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or_default()
                        .to_string();
                    let user_agent = request.lines().find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("user-agent")
                            .then(|| value.trim().to_string())
                    });

                    let prefix = path.rsplit('/').next().unwrap_or_default().to_string();
                    let (status, body) = responses
                        .get(&prefix)
                        .cloned()
                        .unwrap_or((404, String::new()));

                    seen.lock().unwrap().push(SeenRequest { path, user_agent });

                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        if status == 200 { "OK" } else { "Error" },
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        RangeServer { addr, seen }
    }
}

impl RangeServer {
    pub fn builder() -> RangeServerBuilder {
        RangeServerBuilder::default()
    }

    pub fn config(&self) -> Config {
        Config {
            endpoint: format!("http://{}/range", self.addr),
            ..Config::default()
        }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Temporary directory holding a `vault.1pif` export.
pub struct ExportFixture {
    _tmp: TempDir,
    pub dir: PathBuf,
}

impl ExportFixture {
    pub fn new(records: &[&str]) -> Self {
        // Dots in the parent path would be rewritten by the report naming rule.
        let tmp = tempfile::Builder::new()
            .prefix("pifpwned")
            .tempdir()
            .expect("create temp dir");
        let dir = tmp.path().join("vault.1pif");
        fs::create_dir_all(&dir).expect("create export dir");

        let mut text = String::new();
        for record in records {
            text.push_str(record);
            text.push('\n');
            text.push_str(MARKER);
            text.push('\n');
        }
        fs::write(dir.join("data.1pif"), text).expect("write export");

        Self { _tmp: tmp, dir }
    }

    pub fn report_file(&self) -> PathBuf {
        self.dir.with_file_name("vault_1pif.csv")
    }
}

pub fn login(title: &str, username: &str, password: &str, location: &str) -> String {
    format!(
        r#"{{"uuid":"{title}-uuid","typeName":"webforms.WebForm","title":"{title}","location":"{location}","secureContents":{{"fields":[{{"value":"{username}","name":"username","type":"T","designation":"username"}},{{"value":"{password}","name":"password","type":"P","designation":"password"}}]}}}}"#
    )
}
