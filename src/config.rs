/// GSI address search endpoint (returns a GeoJSON-like feature array)
pub const GEOCODE_ENDPOINT: &str = "https://msearch.gsi.go.jp/address-search/AddressSearch";

/// Per-request timeout for the geocoding endpoint
pub const GEOCODE_TIMEOUT_SECS: u64 = 12;

/// Delay after every resolve that was not served from the cache
pub const GEOCODE_THROTTLE_MS: u64 = 80;

/// Progress update interval (log every N hospitals)
pub const PROGRESS_INTERVAL: usize = 25;

/// Env file key holding the PostgreSQL connection string
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";

pub const DEFAULT_HOSPITALS_CSV: &str = "kyukyumeiboR70801.csv";
pub const DEFAULT_TEAMS_CSV: &str = "Teams.csv";
pub const DEFAULT_ENV_FILE: &str = ".env.local";
pub const DEFAULT_SCRIPT_PATH: &str = "scripts/seed_neon.sql";

/// Default SQL runner. Args are templates, see [`crate::executor`].
pub const DEFAULT_EXECUTOR: &str = "psql";
pub const DEFAULT_EXECUTOR_ARGS: &[&str] = &[
    "-v",
    "ON_ERROR_STOP=1",
    "-d",
    "{database_url}",
    "-f",
    "{script}",
];
