//! Reboot orchestration on top of the signed client.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use landscape_client::LandscapeClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Search query selecting computers with a pending reboot.
const NEEDS_REBOOT_QUERY: &str = "needs:reboot";

/// How far in the future reboots are scheduled.
const REBOOT_DELAY_HOURS: i64 = 1;

/// A command-line operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reboot every computer the account can see.
    RebootAll,
    /// Reboot only computers flagged as needing a reboot.
    RebootNeeded,
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reboot-all" => Ok(Self::RebootAll),
            "reboot-needed" => Ok(Self::RebootNeeded),
            other => anyhow::bail!("Invalid op: {other}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RebootAll => "reboot-all",
            Self::RebootNeeded => "reboot-needed",
        })
    }
}

/// A computer id as listed by `GetComputers`, either a JSON number or a
/// string. Both are sent back as their text form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ComputerId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ComputerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The fields of a `GetComputers` entry this tool reads.
#[derive(Debug, Clone, Deserialize)]
struct Computer {
    id: ComputerId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    hostname: String,
}

/// Run `op`, writing user-facing output to `out`. `now` anchors the reboot
/// schedule.
pub async fn run<W: Write>(
    client: &LandscapeClient,
    op: Operation,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<()> {
    match op {
        Operation::RebootAll => reboot_all(client, now, out).await,
        Operation::RebootNeeded => reboot_needed(client, now, out).await,
    }
}

async fn reboot_all<W: Write>(
    client: &LandscapeClient,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<()> {
    let computers = fetch_computers(client, None).await?;
    if computers.is_empty() {
        writeln!(out, "No computers found")?;
        return Ok(());
    }

    let result = reboot(client, &computers, now).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    Ok(())
}

async fn reboot_needed<W: Write>(
    client: &LandscapeClient,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<()> {
    let computers = fetch_computers(client, Some(NEEDS_REBOOT_QUERY)).await?;
    if computers.is_empty() {
        writeln!(out, "No computers needed reboot")?;
        return Ok(());
    }

    let names = computers
        .iter()
        .map(|c| format!("{} ({})", c.title, c.hostname))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "Rebooting {names}")?;

    reboot(client, &computers, now).await?;
    Ok(())
}

async fn fetch_computers(client: &LandscapeClient, query: Option<&str>) -> Result<Vec<Computer>> {
    let value = client
        .get_computers(query)
        .await
        .context("GetComputers failed")?;
    let computers: Vec<Computer> =
        serde_json::from_value(value).context("unexpected GetComputers response")?;
    info!(count = computers.len(), query = ?query, "fetched computers");
    Ok(computers)
}

async fn reboot(
    client: &LandscapeClient,
    computers: &[Computer],
    now: DateTime<Utc>,
) -> Result<Value> {
    let ids: Vec<String> = computers.iter().map(|c| c.id.to_string()).collect();
    let deliver_after = now + Duration::hours(REBOOT_DELAY_HOURS);

    info!(count = ids.len(), %deliver_after, "scheduling reboot");

    client
        .reboot_computers(&ids, deliver_after)
        .await
        .context("RebootComputers failed")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use landscape_client::{ClientResult, Transport, TransportResponse};
    use landscape_core::{Credentials, Endpoint};
    use parking_lot::Mutex;

    use super::*;

    /// Answers by action name and records every request body.
    #[derive(Debug)]
    struct ScriptedTransport {
        replies: HashMap<&'static str, &'static str>,
        sent: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(replies: &[(&'static str, &'static str)]) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.iter().copied().collect(),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn actions(&self) -> Vec<String> {
            self.sent
                .lock()
                .iter()
                .filter_map(|body| {
                    body.split('&')
                        .find_map(|pair| pair.strip_prefix("action="))
                        .map(ToOwned::to_owned)
                })
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_form(
            &self,
            _endpoint: &Endpoint,
            body: String,
        ) -> ClientResult<TransportResponse> {
            let action = body
                .split('&')
                .find_map(|pair| pair.strip_prefix("action="))
                .unwrap_or_default()
                .to_owned();
            self.sent.lock().push(body);
            Ok(TransportResponse {
                status: 200,
                body: self
                    .replies
                    .get(action.as_str())
                    .copied()
                    .unwrap_or("{}")
                    .to_owned(),
            })
        }
    }

    fn client_with(transport: Arc<ScriptedTransport>) -> LandscapeClient {
        LandscapeClient::with_transport(
            Endpoint::parse("https://landscape.example.com/api/").unwrap(),
            Credentials::new("AKID", "secret"),
            transport,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_should_parse_operations() {
        assert_eq!("reboot-all".parse::<Operation>().unwrap(), Operation::RebootAll);
        assert_eq!(
            "reboot-needed".parse::<Operation>().unwrap(),
            Operation::RebootNeeded
        );
        let err = "reboot-some".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid op: reboot-some");
    }

    #[tokio::test]
    async fn test_should_skip_reboot_when_nothing_needs_it() {
        let transport = ScriptedTransport::new(&[("GetComputers", "[]")]);
        let client = client_with(transport.clone());
        let mut out = Vec::new();

        run(&client, Operation::RebootNeeded, now(), &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "No computers needed reboot\n");
        assert_eq!(transport.actions(), ["GetComputers"]);
        assert!(transport.sent.lock()[0].contains("&query=needs%3Areboot&"));
    }

    #[tokio::test]
    async fn test_should_reboot_needed_computers_an_hour_from_now() {
        let transport = ScriptedTransport::new(&[
            (
                "GetComputers",
                r#"[{"id": 7, "title": "Web", "hostname": "web-1"},
                    {"id": 9, "title": "DB", "hostname": "db-1"}]"#,
            ),
            ("RebootComputers", r#"{"id": 100, "type": "ActivityGroup"}"#),
        ]);
        let client = client_with(transport.clone());
        let mut out = Vec::new();

        run(&client, Operation::RebootNeeded, now(), &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Rebooting Web (web-1), DB (db-1)\n"
        );
        assert_eq!(transport.actions(), ["GetComputers", "RebootComputers"]);

        let reboot_body = transport.sent.lock()[1].clone();
        assert!(reboot_body.contains("&computer_ids.1=7&computer_ids.2=9&"));
        assert!(reboot_body.contains("&deliver_after=2026-10-16T13%3A00%3A00Z&"));
    }

    #[tokio::test]
    async fn test_should_reboot_all_and_print_result() {
        let transport = ScriptedTransport::new(&[
            ("GetComputers", r#"[{"id": 3, "title": "A", "hostname": "a"}]"#),
            ("RebootComputers", r#"{"id": 100}"#),
        ]);
        let client = client_with(transport.clone());
        let mut out = Vec::new();

        run(&client, Operation::RebootAll, now(), &mut out)
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "{\n  \"id\": 100\n}\n");
        assert!(!transport.sent.lock()[0].contains("query="));
        assert!(transport.sent.lock()[1].contains("&computer_ids.1=3&"));
    }

    #[tokio::test]
    async fn test_should_accept_string_and_numeric_ids() {
        let transport = ScriptedTransport::new(&[
            (
                "GetComputers",
                r#"[{"id": "12", "title": "A", "hostname": "a"},
                    {"id": 5, "title": "B", "hostname": "b"}]"#,
            ),
            ("RebootComputers", r#"{"id": 100}"#),
        ]);
        let client = client_with(transport.clone());
        let mut out = Vec::new();

        run(&client, Operation::RebootNeeded, now(), &mut out)
            .await
            .unwrap();

        assert_eq!(transport.actions(), ["GetComputers", "RebootComputers"]);
        assert!(transport.sent.lock()[1].contains("&computer_ids.1=12&computer_ids.2=5&"));
    }

    #[tokio::test]
    async fn test_should_fail_on_unexpected_listing() {
        let transport = ScriptedTransport::new(&[("GetComputers", r#"{"error": "nope"}"#)]);
        let client = client_with(transport.clone());
        let mut out = Vec::new();

        let err = run(&client, Operation::RebootNeeded, now(), &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("unexpected GetComputers response"));
        assert_eq!(transport.actions(), ["GetComputers"]);
    }
}
