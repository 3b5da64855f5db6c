//! yt-dlp catalog client
//!
//! Searches and resolves streams by shelling out to `yt-dlp` and parsing
//! its single-JSON dump. Flat extraction keeps searches fast since no
//! per-video page is fetched.

use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::{CatalogError, CatalogService};
use crate::models::{watch_url_for, CatalogEntry, StreamInfo};

/// Format selector for audio-only playback
const AUDIO_FORMAT: &str = "bestaudio/best";

/// yt-dlp flat search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    entries: Option<Vec<Option<RawEntry>>>,
}

/// Individual flat entry
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Option<Vec<RawThumbnail>>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: Option<String>,
}

impl RawEntry {
    /// Convert to our CatalogEntry model
    fn into_catalog_entry(self) -> CatalogEntry {
        // thumbnails are listed smallest first
        let thumbnail = self.thumbnail.or_else(|| {
            self.thumbnails
                .unwrap_or_default()
                .into_iter()
                .rev()
                .find_map(|t| t.url)
        });

        CatalogEntry {
            id: self.id,
            title: self.title,
            uploader: self.uploader.or(self.channel),
            thumbnail,
        }
    }
}

/// yt-dlp single video response (format already selected)
#[derive(Debug, Deserialize)]
struct ResolveResponse {
    url: Option<String>,
    title: Option<String>,
    duration: Option<f64>,
    requested_formats: Option<Vec<RequestedFormat>>,
}

#[derive(Debug, Deserialize)]
struct RequestedFormat {
    url: Option<String>,
}

/// Parse the JSON printed by a flat `ytsearchN:` run
pub fn parse_search_output(json: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(json)?;
    Ok(response
        .entries
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(RawEntry::into_catalog_entry)
        .collect())
}

/// Parse the JSON printed when resolving a single video
pub fn parse_resolve_output(json: &str) -> Result<StreamInfo, CatalogError> {
    let response: ResolveResponse = serde_json::from_str(json)?;
    let stream_url = response
        .url
        .or_else(|| {
            response
                .requested_formats
                .unwrap_or_default()
                .into_iter()
                .find_map(|f| f.url)
        })
        .filter(|url| !url.is_empty())
        .ok_or(CatalogError::NoStreamUrl)?;

    Ok(StreamInfo {
        stream_url,
        title: response.title,
        duration: response.duration.filter(|d| *d > 0.0),
    })
}

/// Pull a readable message out of yt-dlp's stderr
pub fn extract_error_message(stderr: &str) -> Option<String> {
    let error_line = regex::Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").ok();

    if let Some(re) = error_line {
        if let Some(caps) = re.captures_iter(stderr).last() {
            return Some(caps[1].to_string());
        }
    }

    stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
}

/// Catalog client backed by the yt-dlp executable
pub struct YtDlpClient {
    binary: String,
}

impl YtDlpClient {
    /// Create a client for the given executable name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Executable this client runs
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run yt-dlp with `args` and return stdout on success
    async fn run(&self, args: &[&str]) -> Result<String, CatalogError> {
        debug!(binary = %self.binary, ?args, "running extractor");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CatalogError::NotInstalled(self.binary.clone())
                } else {
                    CatalogError::Spawn(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = extract_error_message(&stderr)
                .unwrap_or_else(|| format!("{} exited with {}", self.binary, output.status));
            return Err(CatalogError::Failed(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Search for videos matching `query`
    pub async fn search_entries(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let term = format!("ytsearch{}:{}", limit, query);
        let stdout = self
            .run(&[
                "--flat-playlist",
                "--dump-single-json",
                "--no-warnings",
                "--quiet",
                &term,
            ])
            .await?;

        let mut entries = parse_search_output(&stdout)?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Resolve the best audio stream for a video id
    pub async fn resolve(&self, id: &str) -> Result<StreamInfo, CatalogError> {
        let url = watch_url_for(id);
        let stdout = self
            .run(&[
                "-f",
                AUDIO_FORMAT,
                "--dump-single-json",
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                &url,
            ])
            .await?;

        parse_resolve_output(&stdout)
    }
}

impl Default for YtDlpClient {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl CatalogService for YtDlpClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, CatalogError>> {
        self.search_entries(query, limit).boxed()
    }

    fn resolve_stream<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StreamInfo, CatalogError>> {
        self.resolve(id).boxed()
    }
}
