//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "incident-sync.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Export INCIDENT_SYNC_API_KEY and INCIDENT_SYNC_DSN");
                println!("  3. Validate configuration: incident-sync validate-config");
                println!("  4. Try a dry run: incident-sync sync --dry-run");
                println!("  5. Start the agent: incident-sync run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# Incident Sync configuration

# development, staging or production
environment = "development"

[application]
log_level = "info"
# Extract and normalize but never upload
dry_run = false

[remote]
base_url = "https://stats.example.org/api"
# Used in the endpoint paths and upload bodies
client_name = "hak"
api_key = "${INCIDENT_SYNC_API_KEY}"
timeout_seconds = 30
max_redirects = 5
tls_verify = true

[database]
connection_string = "${INCIDENT_SYNC_DSN}"
max_connections = 5
connection_timeout_seconds = 30
statement_timeout_seconds = 60

# Rows beyond a cap are picked up by the next run
[extract]
incident_limit = 1000
survivor_limit = 50000
child_limit = 50000
geography_limit = 5000
entity_limit = 1000

[schedule]
enabled = true
interval_seconds = 3600
startup_delay_seconds = 10

[server]
enabled = true
bind_address = "0.0.0.0:3000"

[logging]
local_enabled = false
local_path = "/var/log/incident-sync"
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_sections() {
        let config = InitArgs::sample_config();
        for section in ["[remote]", "[database]", "[extract]", "[schedule]", "[server]"] {
            assert!(config.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_sample_config_parses() {
        std::env::set_var("INCIDENT_SYNC_API_KEY", "sample-key");
        std::env::set_var("INCIDENT_SYNC_DSN", "postgresql://sync@localhost:5432/cases");

        let config = crate::config::parse_config(InitArgs::sample_config()).unwrap();
        assert_eq!(config.remote.client_name, "hak");
        assert_eq!(config.schedule.interval_seconds, 3600);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("incident-sync.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[remote]"));
    }
}
