use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Looks up `key` in a dotenv-style file. Returns `None` when the file does not
/// exist, has no such line, or the value is empty.
pub fn read_env_var(path: &Path, key: &str) -> Result<Option<String>> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Env file not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read env file: {}", path.display()))
        }
    };
    find_env_var(&body, key)
}

/// `KEY=value` matching on trimmed lines; `#` and `//` lines are comments.
pub fn find_env_var(body: &str, key: &str) -> Result<Option<String>> {
    let pattern = Regex::new(&format!(r#"^{}\s*=\s*"?(.*?)"?\s*$"#, regex::escape(key)))
        .with_context(|| format!("Invalid env key: {key}"))?;

    Ok(body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .find_map(|line| pattern.captures(line).map(|caps| caps[1].to_string()))
        .filter(|value| !value.is_empty()))
}
