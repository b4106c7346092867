//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};

use crate::config::{ClassifierSection, Config, ConfigColorMode};
use crate::consts::{
    AVAILABLE_FEATURES, DEFAULT_SCOPE, DEFAULT_TIMEZONE, FEATURE_SEMANTIC, SEMANTIC_CONTEXT_WINDOW,
};
use crate::semantic::{ClassifierConfig, ProviderSettings};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "autostats")]
#[command(
    about = "Autonomy and prompt statistics for agent session logs",
    version
)]
pub(crate) struct Cli {
    /// Time scope: "default" (last full week), "YYYY/MM/DD", or "YYYY/MM/DD - YYYY/MM/DD"
    #[arg(short = 't', long, default_value = DEFAULT_SCOPE, value_name = "EXPR")]
    pub(crate) time_scope: String,

    /// IANA timezone for interpreting dates (e.g., "America/New_York", "UTC")
    #[arg(short = 'z', long, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Projects directory (default: $AMPLIFIER_HOME/projects or ~/.amplifier/projects)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub(crate) sessions_path: Option<PathBuf>,

    /// Skip projects whose name contains PATTERN (case-insensitive, repeatable)
    #[arg(short = 'x', long = "exclude-project", value_name = "PATTERN")]
    pub(crate) exclude_projects: Vec<String>,

    /// Include delegated agent sub-sessions
    #[arg(long)]
    pub(crate) include_sub_sessions: bool,

    /// Optional analyses to run (repeatable)
    #[arg(
        short = 'F',
        long = "features",
        value_name = "FEATURE",
        value_parser = PossibleValuesParser::new(AVAILABLE_FEATURES.iter().copied())
    )]
    pub(crate) features: Vec<String>,

    /// Prompts per classification request
    #[arg(long, value_name = "N")]
    pub(crate) batch_size: Option<usize>,

    /// Classification requests in flight at once
    #[arg(long, value_name = "N")]
    pub(crate) concurrency: Option<usize>,

    /// Neighboring prompts attached as context on each side
    #[arg(long, value_name = "N")]
    pub(crate) context_window: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long)]
    pub(crate) no_color: bool,

    /// Enable debug output (show processing details)
    #[arg(long)]
    pub(crate) debug: bool,

    #[arg(skip)]
    pub(crate) classifier: ClassifierSection,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.include_sub_sessions && config.include_sub_sessions {
            self.include_sub_sessions = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.sessions_path.is_none() {
            self.sessions_path = config.sessions_path.clone();
        }
        for pattern in &config.exclude_projects {
            if !self.exclude_projects.contains(pattern) {
                self.exclude_projects.push(pattern.clone());
            }
        }

        let section = &config.classifier;
        if self.batch_size.is_none() {
            self.batch_size = section.batch_size;
        }
        if self.concurrency.is_none() {
            self.concurrency = section.max_concurrency;
        }
        if self.context_window.is_none() {
            self.context_window = section.context_window;
        }
        self.classifier = section.clone();

        self
    }

    pub(crate) fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
    }

    pub(crate) fn semantic_enabled(&self) -> bool {
        self.features.iter().any(|f| f == FEATURE_SEMANTIC)
    }

    pub(crate) fn context_window(&self) -> usize {
        self.context_window.unwrap_or(SEMANTIC_CONTEXT_WINDOW)
    }

    pub(crate) fn classifier_config(&self) -> ClassifierConfig {
        let defaults = ClassifierConfig::default();
        ClassifierConfig {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            max_concurrency: self.concurrency.unwrap_or(defaults.max_concurrency),
        }
    }

    pub(crate) fn provider_settings(&self) -> ProviderSettings {
        let mut settings = ProviderSettings::default();
        let section = &self.classifier;
        if let Some(model) = &section.model {
            settings.model = model.clone();
        }
        if let Some(base_url) = &section.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(api_key_env) = &section.api_key_env {
            settings.api_key_env = api_key_env.clone();
        }
        if let Some(secs) = section.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(max_tokens) = section.max_tokens {
            settings.max_tokens = max_tokens;
        }
        settings
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
