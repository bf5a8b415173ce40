use anyhow::{Context, Result};
use clap::Parser;
use dedup_core::job::{self, DedupOptions};
use dedup_core::{DocumentIndex, IndexRecord, PartitionRange};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dedup")]
#[command(about = "Delete duplicate documents (same content fingerprint, different ids) from a search index")]
struct Cli {
    /// Index endpoint URL, e.g. http://localhost:8983/solr/docs
    index_url: String,
    /// Flush deletions but leave the final commit to the caller
    #[arg(long, default_value_t = false)]
    no_commit: bool,
    /// Number of parallel scanners/resolvers
    #[arg(long, default_value_t = 4)]
    parallelism: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

const MATCH_ALL: &str = "*:*";
const DEDUP_FIELDS: &str = "id,weight,modifiedAt,fingerprint";

#[derive(Deserialize)]
struct SelectResponse {
    response: SelectBody,
}

#[derive(Deserialize)]
struct SelectBody {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<DocRow>,
}

#[derive(Deserialize)]
struct DocRow {
    id: String,
    #[serde(default)]
    weight: f32,
    #[serde(rename = "modifiedAt")]
    modified_at: Option<String>,
    fingerprint: Option<String>,
}

impl DocRow {
    fn into_record(self) -> Option<IndexRecord> {
        let DocRow {
            id,
            weight,
            modified_at,
            fingerprint,
        } = self;
        let Some(fingerprint) = fingerprint else {
            tracing::warn!(%id, "document has no fingerprint field, skipping");
            return None;
        };
        let modified_at = modified_at.as_deref().and_then(parse_timestamp_ms).unwrap_or(0);
        Some(IndexRecord {
            id,
            fingerprint,
            weight,
            modified_at,
        })
    }
}

fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let parsed = OffsetDateTime::parse(raw, &Rfc3339).ok()?;
    Some((parsed.unix_timestamp_nanos() / 1_000_000) as i64)
}

/// `DocumentIndex` over a Solr-style HTTP JSON API.
struct HttpIndex {
    client: Client,
    base: String,
}

impl HttpIndex {
    fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            base: url.trim_end_matches('/').to_string(),
        }
    }

    fn select(&self, params: &[(&str, String)]) -> Result<SelectResponse> {
        let resp = self
            .client
            .get(format!("{}/select", self.base))
            .query(&[("q", MATCH_ALL), ("wt", "json")])
            .query(params)
            .send()
            .context("index select query failed")?
            .error_for_status()?
            .json::<SelectResponse>()
            .context("malformed select response")?;
        Ok(resp)
    }

    fn update(&self, body: &serde_json::Value) -> Result<()> {
        self.client
            .post(format!("{}/update", self.base))
            .json(body)
            .send()
            .context("index update request failed")?
            .error_for_status()?;
        Ok(())
    }
}

impl DocumentIndex for HttpIndex {
    fn count(&self) -> Result<u64> {
        let resp = self.select(&[("rows", "0".to_string())])?;
        Ok(resp.response.num_found)
    }

    fn fetch(&self, range: &PartitionRange) -> Result<Vec<IndexRecord>> {
        let resp = self.select(&[
            ("fl", DEDUP_FIELDS.to_string()),
            ("start", range.start.to_string()),
            ("rows", range.count.to_string()),
        ])?;
        Ok(resp
            .response
            .docs
            .into_iter()
            .filter_map(DocRow::into_record)
            .collect())
    }

    fn delete(&self, ids: &[String]) -> Result<()> {
        self.update(&serde_json::json!({ "delete": ids }))
    }

    fn commit(&self) -> Result<()> {
        self.update(&serde_json::json!({ "commit": {} }))
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let index = HttpIndex::new(client, &args.index_url);

    let started = Instant::now();
    tracing::info!(
        url = %args.index_url,
        no_commit = args.no_commit,
        parallelism = args.parallelism,
        "dedup starting"
    );
    let stats = job::run(
        &index,
        &DedupOptions {
            parallelism: args.parallelism,
            no_commit: args.no_commit,
        },
    )?;
    tracing::info!(
        scanned = stats.scanned,
        groups = stats.groups,
        deleted = stats.deleted,
        elapsed_s = started.elapsed().as_secs_f64(),
        "dedup finished"
    );
    Ok(())
}
