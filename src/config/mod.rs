use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::runtime::PythonVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory every relative path below is resolved against and the
    /// working directory of every subprocess.
    pub project_dir: PathBuf,
    pub python: String,
    pub min_python: String,
    pub requirements: PathBuf,
    pub memory_threshold_gb: f64,
    pub demo_dir: PathBuf,
    pub demo_samples: usize,
    pub model_source_dir: PathBuf,
    pub num_classes: usize,
    pub app_entry: PathBuf,
    pub app_launcher: PathBuf,
    pub test_dir: PathBuf,
    pub report_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            python: DEFAULT_PYTHON.to_string(),
            min_python: MIN_PYTHON_VERSION.to_string(),
            requirements: PathBuf::from(REQUIREMENTS_FILE),
            memory_threshold_gb: LOW_MEMORY_THRESHOLD_GB,
            demo_dir: PathBuf::from(DEMO_DATA_DIR),
            demo_samples: DEMO_SAMPLES,
            model_source_dir: PathBuf::from(MODEL_SOURCE_DIR),
            num_classes: NUM_CLASSES,
            app_entry: PathBuf::from(APP_ENTRY),
            app_launcher: PathBuf::from(APP_LAUNCHER),
            test_dir: PathBuf::from(TEST_DIR),
            report_file: PathBuf::from(REPORT_FILE),
        }
    }
}

impl Settings {
    /// Loads settings for the project in `QUICKSTART_PROJECT_DIR`, or the
    /// current directory when unset.
    pub fn load() -> Result<Self> {
        let project_dir = match std::env::var_os(ENV_PROJECT_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().context("无法获取当前目录")?,
        };
        let user_config = config_dir().map(|dir| dir.join(APP_DIR).join(USER_CONFIG_FILE));
        Self::load_from(&project_dir, user_config.as_deref())
    }

    /// Layers, lowest precedence first: built-in defaults, the user config
    /// file, `<project>/quickstart.toml`, then `QUICKSTART_*` variables.
    pub fn load_from(project_dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = user_config {
            log::debug!("Reading user config from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let project_config = project_dir.join(PROJECT_CONFIG_FILE);
        log::debug!("Reading project config from {}", project_config.display());
        builder = builder
            .add_source(File::from(project_config.as_path()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        let mut settings: Settings = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        // A project_dir from a file or the environment wins; otherwise anchor
        // to the directory the project config was looked up in.
        if settings.project_dir == Path::new(".") {
            settings.project_dir = project_dir.to_path_buf();
        }
        Ok(settings)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project_dir.join(path)
    }

    pub fn min_python_version(&self) -> Result<PythonVersion> {
        self.min_python
            .parse()
            .with_context(|| format!("invalid min_python {:?}", self.min_python))
    }

    pub fn memory_threshold_bytes(&self) -> u64 {
        (self.memory_threshold_gb * BYTES_PER_GB) as u64
    }
}
