//! Command-line argument parsing for the demo binary
//!
//! Supports:
//! - Chip values as positional arguments
//! - Pasting a raw string of addresses
//! - Overriding threshold, duplicate handling and the config file
//! - JSON output

use chipsinput::ChipsConfig;
use clap::Parser;
use std::path::PathBuf;

/// Turn values and pasted text into chips and print the result
#[derive(Parser, Debug)]
#[command(name = "chips", version, about = "Tokenize text into chips")]
pub struct CliArgs {
    /// Values added as chips, one per argument
    #[arg(value_name = "VALUES")]
    pub values: Vec<String>,

    /// Text pasted into the field after the values are added
    #[arg(short, long, value_name = "TEXT")]
    pub paste: Option<String>,

    /// Minimum token length before suggestions are filtered
    #[arg(long, value_name = "N")]
    pub threshold: Option<usize>,

    /// Skip values whose title already has a chip
    #[arg(long)]
    pub no_duplicates: bool,

    /// Read configuration from this file instead of the user config
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Default domain appended to bare names by the validator
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Suggestion titles offered while typing
    #[arg(long = "suggest", value_name = "TITLE")]
    pub suggestions: Vec<String>,

    /// Field width in pixels used when rendering chips
    #[arg(long, value_name = "PX", default_value_t = 400)]
    pub width: u32,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// How the result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub chips: ChipsConfig,
    pub values: Vec<String>,
    pub paste: Option<String>,
    pub domain: Option<String>,
    pub suggestions: Vec<String>,
    pub width: u32,
    pub output: OutputFormat,
}

impl CliArgs {
    /// Apply the command-line overrides on top of `base`
    pub fn into_config(self, base: ChipsConfig) -> Result<RunConfig, String> {
        if self.width == 0 {
            return Err("Field width must be greater than zero".to_string());
        }
        if self.values.is_empty() && self.paste.is_none() {
            return Err("Nothing to tokenize: pass values or --paste".to_string());
        }

        let mut chips = base;
        if let Some(threshold) = self.threshold {
            chips.threshold = threshold;
        }
        if self.no_duplicates {
            chips.allow_duplicates = false;
        }

        Ok(RunConfig {
            chips,
            values: self.values,
            paste: self.paste,
            domain: self.domain,
            suggestions: self.suggestions,
            width: self.width,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}
