use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Assumes debug profile; adjust if you run tests with --release.
        let mut cmd = Command::new("target/debug/groupchat-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the rest of the environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // The server is up even when the database is not; a degraded
                // health answer still means the router is serving
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when the spawned server can actually reach its database. Flow tests
/// skip themselves when this is false instead of failing the suite.
#[allow(dead_code)]
pub async fn database_ready(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    Ok(res.status() == StatusCode::OK)
}

/// POST /token/ with form credentials; returns the status and parsed body.
#[allow(dead_code)]
pub async fn login(
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<(StatusCode, serde_json::Value)> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/token/", base_url))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<serde_json::Value>().await?;
    Ok((status, body))
}

/// Millisecond suffix so concurrently running tests never collide on
/// unique usernames or group names.
#[allow(dead_code)]
pub fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
