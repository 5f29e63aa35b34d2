use clap::Parser;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "codejudge", version = "0.1", about, long_about = None)]
pub struct CliArgs {
    /// Path to the configuration file; defaults apply when omitted
    #[arg(long = "config", short = 'c')]
    pub config_path: Option<String>,

    /// Whether to flush the existing database
    #[arg(long = "flush-data", short = 'f', default_value_t = false)]
    pub flush_data: bool,
}

impl CliArgs {
    /// Load the configuration from the specified file, or the defaults.
    pub fn to_config(&self) -> anyhow::Result<Config> {
        match &self.config_path {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                let reader = std::io::BufReader::new(file);
                Ok(serde_json::from_reader(reader)?)
            }
            None => Ok(Config::default()),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub judge: JudgeConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub bind_port: Option<u16>,
    pub workers: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            bind_port: None,
            workers: 2,
        }
    }
}

/// Limits applied to every sandboxed execution, plus the runner images.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct JudgeConfig {
    /// Per-case wall-clock limit in seconds
    pub time_limit_secs: u64,
    /// Container memory cap, docker syntax (e.g. "512m")
    pub memory_limit: String,
    /// Hard CPU core cap
    pub cpus: u32,
    /// Hard process/thread count cap
    pub pids_limit: u32,
    /// Size of the writable (but noexec) scratch tmpfs
    pub tmpfs_size: String,
    /// Reject submissions whose source exceeds this many bytes
    pub max_source_bytes: usize,
    pub python_image: String,
    pub java_image: String,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 5,
            memory_limit: "512m".to_string(),
            cpus: 1,
            pids_limit: 128,
            tmpfs_size: "64m".to_string(),
            max_source_bytes: 256 * 1024,
            python_image: "python:3.11-alpine".to_string(),
            java_image: "eclipse-temurin:17-jdk".to_string(),
        }
    }
}
