//! ems_seed: geocoded PostgreSQL seed generation for an EMS dispatch database
//!
//! This crate turns two municipal CSV exports into a re-runnable SQL bootstrap script:
//!
//! 1. **Decode** -- Read each export as bytes and decode it with the first encoding that
//!    fits (UTF-8 with BOM, then Shift_JIS/CP932, then lossy UTF-8)
//! 2. **Parse** -- Hospital rows become [`models::HospitalRecord`]s (header and footer rows
//!    are skipped); team lines become [`models::TeamRecord`]s with `EMS-NNN` codes and
//!    round-robin divisions
//! 3. **Geocode** -- Each hospital address is resolved against the GSI address search API
//!    with a bare-then-qualified query fallback, a negative-caching lookup cache, and a
//!    fixed throttle between network lookups
//! 4. **Generate** -- Drop, recreate and seed `emergency_teams`, `hospitals` and `cases`
//!    in one deterministic SQL script
//! 5. **Execute** -- Hand the persisted script to an external SQL runner (psql by default)
//!
//! # Failure model
//!
//! A missing `DATABASE_URL`, an input file with no usable rows, an undecodable input, or a
//! failing SQL runner aborts the run (see [`error::PipelineError`]). A hospital that cannot
//! be geocoded is not an error: it is seeded with `NULL` coordinates and `geocoded = FALSE`.
//!
//! # Key Modules
//!
//! - [`decode`] -- Encoding try-list
//! - [`hospitals`] / [`teams`] -- Row parsers
//! - [`geocode`] -- Resolver, cache, and HTTP search client
//! - [`sql`] -- Script builder and demonstration cases
//! - [`pipeline`] -- Orchestration
//! - [`executor`] -- External SQL runner
//! - [`env_file`] -- `KEY=value` config lookup
//! - [`stats`] -- Geocoding counters
//! - [`config`] -- Constants and default paths
//!
//! # Example Usage
//!
//! ```bash
//! # Geocode, generate scripts/seed_neon.sql and run it with psql
//! ems-seed -v seed
//!
//! # Generate only
//! ems-seed seed --dry-run --output /tmp/seed.sql
//!
//! # Check how one address resolves
//! ems-seed geocode --municipality 渋谷区 --address 渋谷1-1-1
//! ```

pub mod config;
pub mod decode;
pub mod env_file;
pub mod error;
pub mod executor;
pub mod geocode;
pub mod hospitals;
pub mod models;
pub mod pipeline;
pub mod sql;
pub mod stats;
pub mod teams;
