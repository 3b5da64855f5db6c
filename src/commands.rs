//! CLI Command Handlers
//!
//! Each handler takes CLI args, the injected catalog and Output, and
//! returns an ExitCode.

use serde::Serialize;
use std::path::Path;

use crate::api::{CatalogError, CatalogService};
use crate::cli::{self, ConfigCmd, ExitCode, Output, ResolveCmd, SearchCmd};
use crate::config::Config;
use crate::models::{watch_url_for, ResultSet};

fn catalog_exit_code(e: &CatalogError) -> ExitCode {
    match e {
        CatalogError::NotInstalled(_) => ExitCode::ToolNotFound,
        _ => ExitCode::NetworkError,
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(
    cmd: SearchCmd,
    catalog: &dyn CatalogService,
    config: &Config,
    output: &Output,
) -> ExitCode {
    let limit = cmd.limit.filter(|n| *n > 0).unwrap_or_else(|| config.search_limit());
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for '{}'...", query));

    let entries = match catalog.search(query, limit).await {
        Ok(entries) => entries,
        Err(e) => return output.error(format!("Search failed: {}", e), catalog_exit_code(&e)),
    };

    let results = ResultSet::from_entries(entries.into_iter().take(limit));
    if results.is_empty() {
        return output.error("No results found.", ExitCode::NoResults);
    }

    if output.json {
        if let Err(e) = output.print(results.as_slice()) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for (i, item) in results.iter().enumerate() {
            output.line(format!(
                "{:>2}. {}  ·  {}  [{}]",
                i + 1,
                item.title(),
                item.uploader(),
                item.id()
            ));
        }
    }
    ExitCode::Success
}

// =============================================================================
// Resolve Command
// =============================================================================

/// Resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub id: String,
    pub watch_url: String,
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

pub async fn resolve_cmd(cmd: ResolveCmd, catalog: &dyn CatalogService, output: &Output) -> ExitCode {
    let id = match cli::validate_video_id(&cmd.id) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    output.info(format!("Resolving {}...", id));

    match catalog.resolve_stream(id).await {
        Ok(info) => {
            let response = ResolveResponse {
                id: id.to_string(),
                watch_url: watch_url_for(id),
                stream_url: info.stream_url,
                title: info.title,
                duration: info.duration,
            };
            if output.json {
                if let Err(e) = output.print(&response) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                if let Some(title) = &response.title {
                    output.info(title);
                }
                output.line(&response.stream_url);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Error fetching stream: {}", e), catalog_exit_code(&e)),
    }
}

// =============================================================================
// Config Command
// =============================================================================

pub fn config_cmd(cmd: ConfigCmd, config: &Config, path: Option<&Path>, output: &Output) -> ExitCode {
    let resolved = config.resolved();

    if cmd.init {
        let written = match path {
            Some(p) => resolved.save_to(p).map(|_| p.to_path_buf()),
            None => resolved.save(),
        };
        match written {
            Ok(p) => output.info(format!("Wrote {}", p.display())),
            Err(e) => return output.error(format!("Failed to write config: {:#}", e), ExitCode::Error),
        }
    }

    if let Err(e) = output.print(&resolved) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
