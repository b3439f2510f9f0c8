//! Configuration settings for summarizing a directory of ORCA jobs

use std::{
    error::Error,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use orcalog::Settings;
use serde::{Deserialize, Serialize};


/// The name of the configuration file picked up from the job directory when
/// none is given on the command line
pub const CONFIG_NAME: &str = "orcasum.toml";

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// The name of the job, used for naming the summary file. Defaults to the
    /// name of the directory being summarized.
    job_name: Option<String>,

    /// The maximum number of threads to use. 0, the default, means to use as
    /// many threads as there are CPUs.
    threads: Option<usize>,

    /// The number of negative frequencies at which neg_freqs.sh switches from
    /// a plain shell script to a SLURM batch script that refuses to run
    /// outside of the queue. Defaults to 10.
    inline_limit: Option<usize>,

    /// Lines run before orca_pltvib to set up the environment, typically
    /// `module` commands.
    module_lines: Option<Vec<String>>,

    /// The time limit for the SLURM version of neg_freqs.sh. Defaults to
    /// 1:00:00.
    sbatch_time: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub job_name: Option<String>,
    pub threads: usize,
    pub inline_limit: usize,
    pub module_lines: Vec<String>,
    pub sbatch_time: String,
}

impl From<RawConfig> for Config {
    fn from(rc: RawConfig) -> Self {
        // fill the gaps from the library defaults
        let defaults = Settings::new("");
        Self {
            job_name: rc.job_name,
            threads: rc.threads.unwrap_or(0),
            inline_limit: rc.inline_limit.unwrap_or(defaults.inline_limit),
            module_lines: rc.module_lines.unwrap_or(defaults.module_lines),
            sbatch_time: rc.sbatch_time.unwrap_or(defaults.sbatch_time),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(p, e) => write!(
                f,
                "failed to load config file '{}' with {e}",
                p.display()
            ),
            ConfigError::Parse(p, e) => write!(
                f,
                "failed to deserialize config file '{}' with {e}",
                p.display()
            ),
        }
    }
}

impl Error for ConfigError {}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let filename = filename.as_ref();
        let contents = read_to_string(filename)
            .map_err(|e| ConfigError::Read(filename.to_owned(), e))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(filename.to_owned(), e))
    }

    /// Load `path` if given, otherwise `orcasum.toml` in `dir` if it exists,
    /// otherwise the defaults
    pub fn find(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let local = dir.join(CONFIG_NAME);
        if local.exists() {
            log::info!("loading config from {}", local.display());
            Self::load(local)
        } else {
            Ok(Self::default())
        }
    }

    /// Convert `self` into [Settings] for processing `dir`
    pub fn settings(&self, dir: impl Into<PathBuf>, version: &str) -> Settings {
        let mut ret = Settings::new(dir);
        if let Some(name) = &self.job_name {
            ret.job_name = name.clone();
        }
        ret.version = version.to_owned();
        ret.inline_limit = self.inline_limit;
        ret.module_lines = self.module_lines.clone();
        ret.sbatch_time = self.sbatch_time.clone();
        ret
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Config {
            job_name,
            threads,
            inline_limit,
            module_lines,
            sbatch_time,
        } = self;
        write!(
            f,
            "
Configuration Options:
job_name = {}
threads = {threads}
inline_limit = {inline_limit}
module_lines = {module_lines:?}
sbatch_time = {sbatch_time}
",
            job_name.as_deref().unwrap_or("[directory name]"),
        )
    }
}
