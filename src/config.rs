// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Go command used to run tests
    #[serde(default = "default_go_binary")]
    pub go_binary: String,

    /// Ask `go test` for JSON output
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            go_binary: default_go_binary(),
            json: default_json(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Progress indicator mode
    #[serde(default = "default_progress")]
    pub mode: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Ticks per line before wrapping
    #[serde(default = "default_wrap")]
    pub wrap: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            mode: default_progress(),
            color: default_color(),
            wrap: default_wrap(),
        }
    }
}

impl ProgressConfig {
    pub fn progress_mode(&self) -> ProgressMode {
        self.mode.parse().unwrap_or(ProgressMode::Dots)
    }
}

/// Progress indicator modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Dots,
    None,
}

impl std::str::FromStr for ProgressMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dots" => Ok(Self::Dots),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

// Default values
pub const ENV_HOTTEST_GO: &str = "HOTTEST_GO";
pub const ENV_HOTTEST_LOG: &str = "HOTTEST_LOG";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Values of `CI` under which colors stay on even without a terminal
const CI_PROVIDERS: [&str; 5] = ["true", "travis", "appveyor", "gitlab_ci", "circleci"];

pub fn default_go_binary() -> String {
    String::from("go")
}

fn default_json() -> bool {
    true
}

fn default_progress() -> String {
    String::from("dots")
}

fn default_color() -> bool {
    true
}

fn default_wrap() -> usize {
    80
}

/// Whether the `CI` variable names a known CI provider
pub fn is_ci(value: Option<&str>) -> bool {
    value.is_some_and(|ci| CI_PROVIDERS.contains(&ci.to_lowercase().as_str()))
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .hottestrc.toml (current directory)
        // 2. .hottestrc (current directory)
        // 3. ~/.hottestrc.toml (home directory)
        // 4. ~/.hottestrc (home directory)

        let cwd = std::env::current_dir().ok()?;
        let mut paths = vec![cwd.join(".hottestrc.toml"), cwd.join(".hottestrc")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".hottestrc.toml"));
            paths.push(home.join(".hottestrc"));
        }

        paths
            .iter()
            .find(|path| path.is_file())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(go) = std::env::var(ENV_HOTTEST_GO)
            && !go.is_empty()
        {
            self.general.go_binary = go;
        }
        self
    }

    /// Whether output should be colored, given the value of `CI`
    pub fn colors_forced(&self, ci: Option<&str>) -> bool {
        self.progress.color && is_ci(ci)
    }

    /// Whether colors are turned off, given the value of `NO_COLOR`
    pub fn colors_disabled(&self, no_color: Option<&str>) -> bool {
        !self.progress.color || no_color.is_some_and(|value| !value.is_empty())
    }
}
