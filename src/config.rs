use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for vibegate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VibeGateConfig {
    /// Workspace layout settings
    pub workspace: WorkspaceConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Root directory for all durable vibegate artifacts
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter used when RUST_LOG is not set
    pub level: String,
}

impl Default for VibeGateConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig {
                root: PathBuf::from(".vibegate"),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl VibeGateConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (vibegate.toml)
    /// 3. Environment variables (prefixed with VIBEGATE_)
    pub fn load() -> Result<Self> {
        Self::load_env_file()?;

        let mut builder = Config::builder()
            .set_default("workspace.root", ".vibegate")?
            .set_default("logging.level", "warn")?;

        if Path::new("vibegate.toml").exists() {
            builder = builder.add_source(File::with_name("vibegate"));
        }

        builder = builder.add_source(
            Environment::with_prefix("VIBEGATE")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load .env file if it exists
    fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// Durable file layout derived from the configured workspace root.
    pub fn paths(&self) -> WorkspacePaths {
        WorkspacePaths::rooted(self.workspace.root.clone())
    }
}

/// Fixed file layout under a workspace root.
///
/// The main document and history log live under `work/`; externally
/// produced workflow artifacts (the context pack) live under `workflows/`.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join("work")
    }

    pub fn state_file(&self) -> PathBuf {
        self.work_dir().join("vibe-state.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.work_dir().join("step-history.jsonl")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.work_dir().join("backups")
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join("workflows")
    }

    pub fn context_pack_file(&self) -> PathBuf {
        self.workflows_dir().join("context-pack.md")
    }
}
