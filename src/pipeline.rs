use crate::config::{self, PROGRESS_INTERVAL};
use crate::error::PipelineError;
use crate::executor::{self, ExecutorConfig};
use crate::geocode::{AddressSearch, GeocodeCache, Geocoder, GsiAddressSearch};
use crate::models::HospitalRecord;
use crate::stats::GeocodeStats;
use crate::{env_file, hospitals, sql, teams};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub struct SeedConfig {
    pub hospitals_csv: PathBuf,
    pub teams_csv: PathBuf,
    pub env_file: PathBuf,
    pub script_path: PathBuf,
    pub endpoint: String,
    pub throttle: Duration,
    pub executor: ExecutorConfig,
    /// Write the script but do not run it; the connection string becomes optional.
    pub dry_run: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            hospitals_csv: PathBuf::from(config::DEFAULT_HOSPITALS_CSV),
            teams_csv: PathBuf::from(config::DEFAULT_TEAMS_CSV),
            env_file: PathBuf::from(config::DEFAULT_ENV_FILE),
            script_path: PathBuf::from(config::DEFAULT_SCRIPT_PATH),
            endpoint: config::GEOCODE_ENDPOINT.to_string(),
            throttle: Duration::from_millis(config::GEOCODE_THROTTLE_MS),
            executor: ExecutorConfig::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub hospitals: usize,
    pub geocoded: usize,
    pub teams: usize,
    pub cases: usize,
    pub script_path: PathBuf,
    pub executed: bool,
    pub geocode_stats: GeocodeStats,
}

pub async fn run_seed(config: SeedConfig) -> Result<SeedSummary> {
    let search = GsiAddressSearch::new(config.endpoint.clone())?;
    run_seed_with(config, search).await
}

/// Runs the whole pipeline with an injected search backend.
pub async fn run_seed_with<S: AddressSearch>(config: SeedConfig, search: S) -> Result<SeedSummary> {
    let database_url = env_file::read_env_var(&config.env_file, config::DATABASE_URL_KEY)?;
    if database_url.is_none() && !config.dry_run {
        return Err(PipelineError::MissingConfig {
            key: config::DATABASE_URL_KEY.to_string(),
            path: config.env_file.clone(),
        }
        .into());
    }

    let mut hospitals = hospitals::read_hospitals(&config.hospitals_csv)?;
    if hospitals.is_empty() {
        return Err(PipelineError::EmptyInput {
            what: "hospital",
            path: config.hospitals_csv.clone(),
        }
        .into());
    }
    info!(count = hospitals.len(), "Parsed hospitals");

    let teams = teams::read_teams(&config.teams_csv)?;
    if teams.is_empty() {
        return Err(PipelineError::EmptyInput {
            what: "team",
            path: config.teams_csv.clone(),
        }
        .into());
    }
    info!(count = teams.len(), "Parsed teams");

    let mut geocoder = Geocoder::new(search, GeocodeCache::new()).with_throttle(config.throttle);
    let geocoded = enrich_hospitals(&mut hospitals, &mut geocoder).await;
    info!(geocoded, total = hospitals.len(), "Geocoding complete");

    let script = sql::build_script(&hospitals, &teams);
    if let Some(parent) = config.script_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create script directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&config.script_path, script).with_context(|| {
        format!("Failed to write SQL script: {}", config.script_path.display())
    })?;
    info!(path = %config.script_path.display(), "SQL script written");

    let executed = match database_url {
        Some(url) if !config.dry_run => {
            executor::execute_script(&config.executor, &config.script_path, &url).await?;
            true
        }
        _ => {
            info!("Dry run, skipping SQL execution");
            false
        }
    };

    Ok(SeedSummary {
        hospitals: hospitals.len(),
        geocoded,
        teams: teams.len(),
        cases: sql::DEMO_CASES.len(),
        script_path: config.script_path,
        executed,
        geocode_stats: geocoder.stats().clone(),
    })
}

/// Resolves coordinates for every hospital in order. Returns how many resolved.
pub async fn enrich_hospitals<S: AddressSearch>(
    hospitals: &mut [HospitalRecord],
    geocoder: &mut Geocoder<S>,
) -> usize {
    let total = hospitals.len();
    let pb = make_progress_bar(total as u64);
    let mut geocoded = 0usize;

    for (idx, hospital) in hospitals.iter_mut().enumerate() {
        hospital.coordinates = geocoder
            .resolve(&hospital.address, &hospital.municipality)
            .await;
        if hospital.geocoded() {
            geocoded += 1;
        }
        pb.inc(1);

        let processed = idx + 1;
        if progress_due(processed, PROGRESS_INTERVAL) {
            info!(processed, total, geocoded, "Geocoding progress");
        }
    }

    pb.finish_with_message(format!("{geocoded}/{total} geocoded"));
    geocoded
}

/// True on every `interval`-th processed record.
pub fn progress_due(processed: usize, interval: usize) -> bool {
    interval > 0 && processed > 0 && processed % interval == 0
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("    {spinner:.cyan} Geocoding      [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
