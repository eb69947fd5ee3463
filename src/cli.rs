//! Command-line interface parsing and validation
//!
//! Flags override the stored config for the current session only.

use crate::constants::{MAX_ANIMATION_MS, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagdan")]
#[command(version = "0.0.1")]
#[command(about = "Bookmarks, memos and a daily planner in your terminal", long_about = None)]
pub struct Cli {
    /// Directory for bookmarks, todos, config and local storage
    #[arg(short = 'd', long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Modal open/close transition length in milliseconds (0-2000)
    #[arg(short = 'a', long, value_name = "MS")]
    pub animation_ms: Option<u64>,

    /// Bookmarks shown per page (1-100)
    #[arg(short = 'p', long, value_name = "N")]
    pub page_size: Option<usize>,
}

impl Cli {
    /// Validate CLI arguments
    /// Returns error if animation length or page size is out of bounds
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ms) = self.animation_ms
            && ms > MAX_ANIMATION_MS
        {
            return Err(format!(
                "Animation too long (maximum {} ms)",
                MAX_ANIMATION_MS
            ));
        }
        if let Some(size) = self.page_size {
            if size < MIN_PAGE_SIZE {
                return Err(format!("Page size too small (minimum {})", MIN_PAGE_SIZE));
            }
            if size > MAX_PAGE_SIZE {
                return Err(format!("Page size too large (maximum {})", MAX_PAGE_SIZE));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "tagdan",
            "--data-dir",
            "/tmp/tagdan",
            "--animation-ms",
            "0",
            "-p",
            "10",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tagdan")));
        assert_eq!(cli.animation_ms, Some(0));
        assert_eq!(cli.page_size, Some(10));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        let cli = Cli::parse_from(["tagdan", "--animation-ms", "2001"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["tagdan", "--page-size", "0"]);
        assert!(cli.validate().unwrap_err().contains("minimum"));

        let cli = Cli::parse_from(["tagdan", "--page-size", "101"]);
        assert!(cli.validate().unwrap_err().contains("maximum"));
    }
}
