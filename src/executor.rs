use crate::error::PipelineError;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// External process that runs the generated script against the database.
///
/// Args are templates: `{script}` becomes the script path and `{database_url}`
/// the connection string. The connection string is also exported as
/// `DATABASE_URL` in the child environment.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            program: crate::config::DEFAULT_EXECUTOR.to_string(),
            args: crate::config::DEFAULT_EXECUTOR_ARGS
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

impl ExecutorConfig {
    pub fn render_args(&self, script: &Path, database_url: &str) -> Vec<String> {
        let script = script.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{script}", &script)
                    .replace("{database_url}", database_url)
            })
            .collect()
    }
}

pub async fn execute_script(
    config: &ExecutorConfig,
    script: &Path,
    database_url: &str,
) -> Result<()> {
    info!(program = %config.program, script = %script.display(), "Executing SQL script");

    let output = Command::new(&config.program)
        .args(config.render_args(script, database_url))
        .env(crate::config::DATABASE_URL_KEY, database_url)
        .output()
        .await
        .with_context(|| format!("Failed to run SQL executor '{}'", config.program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(PipelineError::ExecutionFailed {
            program: config.program.clone(),
            status: output.status,
            stderr,
        }
        .into());
    }
    Ok(())
}
