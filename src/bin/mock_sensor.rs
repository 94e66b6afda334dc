// Simulated fleet of reporting devices. Each tick, every team posts one
// encrypted report to the hub, the same way the firmware does.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use telemetryhub::{codec::CipherCodec, config::HubConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct MockConfig {
    target_url: String,
    teams: u32,
    interval: Duration,
}

impl MockConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            target_url: std::env::var("MOCK_TARGET_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8888/post-data".to_string()),
            teams: env_or("MOCK_TEAMS", 3)?,
            interval: Duration::from_secs(env_or("MOCK_INTERVAL_SECS", 5)?),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

fn report_json(team: u32, tick: u64, now_secs: u64) -> String {
    // Slow per-team drift so the dashboard visibly changes.
    let phase = tick as f64 / 6.0 + f64::from(team);
    let temperature = 21.0 + f64::from(team) * 0.5 + 1.5 * phase.sin();
    let humidity = 45.0 + 10.0 * phase.cos();
    let secs_of_day = now_secs % 86_400;
    serde_json::json!({
        "team_number": team,
        "temperature": (temperature * 10.0).round() / 10.0,
        "humidity": humidity.round() as i64,
        "timestamp": format!(
            "{:02}:{:02}:{:02}",
            secs_of_day / 3600,
            secs_of_day / 60 % 60,
            secs_of_day % 60
        ),
    })
    .to_string()
}

async fn post_round(client: &reqwest::Client, codec: &CipherCodec, cfg: &MockConfig, tick: u64) {
    let now_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    for team in 1..=cfg.teams {
        let body = codec.encrypt(&report_json(team, tick, now_secs));
        match client.post(&cfg.target_url).body(body).send().await {
            Ok(resp) if resp.status().is_success() => info!(team, tick, "report delivered"),
            Ok(resp) => warn!(team, status = %resp.status(), "hub rejected report"),
            Err(e) => warn!(team, error = %e, "failed to reach hub"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let hub = HubConfig::load()?;
    let codec = CipherCodec::from_config(&hub.cipher)?;
    let cfg = MockConfig::from_env()?;
    let client = reqwest::Client::new();

    info!(
        teams = cfg.teams,
        interval_secs = cfg.interval.as_secs(),
        target = %cfg.target_url,
        "starting mock sensors"
    );

    let mut interval = tokio::time::interval(cfg.interval);
    let mut tick = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                post_round(&client, &codec, &cfg, tick).await;
                tick += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                info!(rounds = tick, "stopping mock sensors");
                break;
            }
        }
    }
    Ok(())
}
