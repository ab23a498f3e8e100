use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::types::OcrEngineKind;

/// Command line of the `contraste` binary.
///
/// Global flags override the configuration file; each one can also be given
/// through the environment variable named in its help.
#[derive(Parser, Debug, Clone)]
#[command(name = "contraste")]
#[command(version)]
#[command(about = "Collect images from social-media posts, extract their text and contrast it")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "CONTRASTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the extraction backend
    #[arg(long, env = "CONTRASTE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// JSON file holding the image collection
    #[arg(long, env = "CONTRASTE_STORE")]
    pub store: Option<PathBuf>,

    /// OCR engine used by `extract` and `contrast`
    #[arg(long, value_enum, env = "CONTRASTE_OCR")]
    pub ocr: Option<OcrEngineKind>,

    /// Timeout in seconds for every HTTP request
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Acquire the image behind a post URL
    Add { url: String },
    /// Show the stored images and their status
    List,
    /// Run OCR on every image that has no text yet
    Extract,
    /// Send the extracted texts for analysis
    Analyze,
    /// Extract pending texts, then analyze all of them
    Contrast,
    /// Delete one image
    Remove { id: String },
    /// Delete every image
    Clear,
    /// Forget OCR errors so the next extraction retries those images
    ResetErrors,
    /// Write every extracted text as a plain-text archive
    Export {
        /// Destination file, stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
