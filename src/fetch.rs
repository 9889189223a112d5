use crate::checklist;
use crate::config::{
    self, BASE_URL, DEFAULT_DELAY_MS, DEFAULT_MAX_RETRIES, HTTP_TIMEOUT_SECS, USER_AGENT,
};
use crate::error::{ChecklistError, Result};
use crate::record::ChecklistRecord;
use csv::Writer;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Retrieves checklist pages and hands them to the extractor.
pub struct ChecklistScraper {
    client: Client,
    pub(crate) base_url: String,
    pub(crate) base_delay: Duration,
    pub(crate) max_retries: u32,
}

/// `base` plus a random share of up to `spread` milliseconds.
fn jittered(base: u64, spread: u64) -> Duration {
    let jitter = if spread == 0 {
        0
    } else {
        rand::rng().random_range(0..spread)
    };
    Duration::from_millis(base.saturating_add(jitter))
}

/// Exponential backoff before retry `attempt`, plus jitter.
fn backoff(attempt: u32, base_ms: u64) -> Duration {
    jittered(2_u64.saturating_pow(attempt).saturating_mul(base_ms), base_ms)
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl ChecklistScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            base_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.base_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Fetch the raw page for a checklist with exponential backoff on
    /// rate limiting, server errors and connection failures.
    pub async fn fetch_checklist(&self, identifier: &str) -> Result<String> {
        let url = config::checklist_url(&self.base_url, identifier);
        let base_ms = self.base_delay.as_millis() as u64;
        let mut last_error = String::from("no attempt made");

        for attempt in 0..=self.max_retries {
            let delay = if attempt > 0 {
                let backoff = backoff(attempt, base_ms);
                info!(
                    "Retrying checklist {} (attempt {}) after {}ms delay",
                    identifier,
                    attempt + 1,
                    backoff.as_millis()
                );
                backoff
            } else {
                jittered(base_ms, base_ms / 2)
            };
            sleep(delay).await;

            match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(|e| ChecklistError::Retrieval {
                            identifier: identifier.to_string(),
                            reason: e.to_string(),
                        });
                    }
                    if !is_transient(status) {
                        error!("HTTP error {} for checklist {}", status, identifier);
                        return Err(ChecklistError::Retrieval {
                            identifier: identifier.to_string(),
                            reason: format!("HTTP status {status}"),
                        });
                    }
                    warn!("HTTP error {} for checklist {}, retrying...", status, identifier);
                    last_error = format!("HTTP status {status}");
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!("Request failed for checklist {}, retrying...: {}", identifier, e);
                    last_error = e.to_string();
                }
                Err(e) => {
                    return Err(ChecklistError::Retrieval {
                        identifier: identifier.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        error!(
            "Failed to fetch checklist {} after {} attempts",
            identifier,
            self.max_retries + 1
        );
        Err(ChecklistError::Retrieval {
            identifier: identifier.to_string(),
            reason: format!("{} (after {} attempts)", last_error, self.max_retries + 1),
        })
    }

    /// Fetch and extract a single checklist.
    pub async fn scrape_checklist(&self, identifier: &str) -> Result<ChecklistRecord> {
        config::validate_identifier(identifier)?;
        let contents = self.fetch_checklist(identifier).await?;
        let record = checklist::scrape_checklist(&contents)?;
        info!("Successfully scraped checklist {}", identifier);
        Ok(record)
    }

    /// Scrape several checklists concurrently. Each one is independent; failures
    /// are logged and left out of the result.
    pub async fn scrape_multiple_checklists(
        &self,
        identifiers: &[String],
        max_concurrent: usize,
    ) -> Vec<ChecklistRecord> {
        let progress_bar = ProgressBar::new(identifiers.len() as u64);
        match ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {percent:>3}% ETA: {eta_precise} {msg}")
        {
            Ok(style) => progress_bar.set_style(style.progress_chars("##-")),
            Err(e) => warn!("Invalid progress bar template: {}", e),
        }
        progress_bar.set_message("Scraping checklists");

        let semaphore = Arc::new(tokio::sync::Semaphore::new(max_concurrent.max(1)));
        let pb = Arc::new(progress_bar);

        let tasks = identifiers.iter().map(|identifier| {
            let permit = Arc::clone(&semaphore);
            let progress = Arc::clone(&pb);

            async move {
                let _permit = permit.acquire().await.ok();
                let result = self.scrape_checklist(identifier).await;
                progress.inc(1);
                if let Err(e) = &result {
                    error!("Checklist {} failed: {}", identifier, e);
                }
                result.ok()
            }
        });

        let results = join_all(tasks).await;
        pb.finish_and_clear();
        let successful_records: Vec<ChecklistRecord> = results.into_iter().flatten().collect();

        info!(
            "Successfully scraped {} out of {} checklists",
            successful_records.len(),
            identifiers.len()
        );

        successful_records
    }

    /// Save entries to a CSV file, one row per species line.
    ///
    /// A checklist with no entries has no rows, so it does not appear in the
    /// file; use JSON output to keep it.
    pub fn save_to_csv(&self, records: &[ChecklistRecord], filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        let mut writer = Writer::from_writer(file);

        for record in records {
            if record.entries.is_empty() {
                info!("Checklist {} has no entries, no CSV rows written", record.identifier);
            }
            for row in record.rows() {
                writer.serialize(row)?;
            }
        }

        writer.flush()?;
        info!("Data saved to {}", filename);
        Ok(())
    }

    /// Save full records as a JSON array.
    pub fn save_to_json(&self, records: &[ChecklistRecord], filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        serde_json::to_writer_pretty(BufWriter::new(file), records)?;
        info!("Data saved to {}", filename);
        Ok(())
    }
}
