use std::fmt;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use chrono::Local;
use reqwest::StatusCode;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::parse::{fmt_row, parse_matches, parse_total, Match};
use crate::{
    info_time, warn_time, ClientConfig, Credentials, Error, Result, ZoomEyeClient, REPORT_HEADER,
    REPORT_TIME_FORMAT,
};

pub(crate) const SEARCH_PATH: &str = "/api/search";
pub(crate) const TOTAL_PATH: &str = "/api/search_total";
const AUTH_HEADER: &str = "Cube-Authorization";

/// CSV text of one search run. Always starts with [`REPORT_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    text: String,
    rows: usize,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            text: REPORT_HEADER.to_string(),
            rows: 0,
        }
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, m: &Match) {
        self.text.push_str(&fmt_row(m));
        self.rows += 1;
    }

    /// Number of rows, header not included.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Writes the report to `<dir>/<YYYY-MM-DD_HH-MM-SS>.csv` and returns the path.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let file_name = format!("{}.csv", Local::now().format(REPORT_TIME_FORMAT));
        let path = dir.as_ref().join(file_name);
        let mut file = File::create(&path).await?;
        file.write_all(self.text.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Base64 of the query's ASCII bytes, as the search endpoints expect it.
pub fn encode_query(query: &str) -> Result<String> {
    if !query.is_ascii() {
        return Err(Error::NonAsciiQuery(query.to_string()));
    }
    Ok(BASE64_STANDARD.encode(query.as_bytes()))
}

pub fn page_count(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size.max(1))
}

/// Page numbers a search run requests.
///
/// Runs from 1 up to, but not including, `page_count`, and stops after `page_limit`.
/// The last page of the result set is therefore never requested.
pub fn pages_to_fetch(total: u64, config: &ClientConfig) -> impl Iterator<Item = u64> {
    let limit = config.page_limit;
    (1..page_count(total, config.page_size)).take_while(move |page| *page <= limit)
}

impl ZoomEyeClient {
    /// Pages through the results of `query` and collects them into a [`Report`].
    ///
    /// Fails with [`Error::NotAuthenticated`] before touching the network if there's no session.
    /// Pages that don't come back with 200 are skipped. A total or page body that isn't
    /// the expected JSON aborts the run.
    pub async fn search(&mut self, query: &str, token: &str) -> Result<Report> {
        if !self.is_authenticated() {
            warn_time!("Not authenticated. Please login first.");
            return Err(Error::NotAuthenticated);
        }

        let q = encode_query(query)?;
        let start_time = Local::now();

        let req = self
            .client
            .get(self.config.url(TOTAL_PATH))
            .header(AUTH_HEADER, token)
            .query(&[("q", q.as_str())]);
        let res = self.send(req).await?;
        let total = parse_total(&res.text().await?)?;
        info_time!("Search total: {}", total);

        let mut report = Report::new();
        let pages = pages_to_fetch(total, &self.config).collect::<Vec<_>>();
        for page in pages {
            let req = self
                .client
                .get(self.config.url(SEARCH_PATH))
                .header(AUTH_HEADER, token)
                .query(&[
                    ("q", q.clone()),
                    ("page", page.to_string()),
                    ("pageSize", self.config.page_size.to_string()),
                ]);
            let res = self.send(req).await?;

            let status = res.status();
            if status != StatusCode::OK {
                warn_time!("Something went wrong on page {}. Status: {}", page, status);
                continue;
            }

            let matches = parse_matches(&res.text().await?)?;
            info_time!("Page {}: {} matches", page, matches.len());
            for m in &matches {
                report.push(m);
            }
        }

        info_time!(start_time, "Collected {} rows", report.len());
        Ok(report)
    }
}

/// Reads one line from `reader`, without the line ending.
pub async fn read_query<R: AsyncBufRead + Unpin>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// The interactive run: login, ask for a query on stdin, search, and write the
/// report into the working directory.
pub async fn run(config: ClientConfig, credentials: &Credentials) -> Result<PathBuf> {
    let mut client = ZoomEyeClient::new(config)?;
    client.login(&credentials.password).await?;
    println!("I'm ready to search\n\n---!!!---");

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Your query: ").await?;
    stdout.flush().await?;
    let query = read_query(BufReader::new(tokio::io::stdin())).await?;

    let report = client.search(&query, &credentials.token).await?;
    let path = report.write_to(".").await?;
    info_time!("Wrote {} rows to file: {}", report.len(), path.display());

    Ok(path)
}
