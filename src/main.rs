//! # img-match CLI
//!
//! Command-line interface for the progressive image matcher.
//!
//! ## Usage
//! ```bash
//! img-match find ~/Pictures --source ~/refs/logo.png
//! img-match find ~/Pictures ~/Downloads --sources-file refs.txt --threshold 0.9
//! ```

mod cli;

use progressive_image_match::Result;

fn main() -> Result<()> {
    cli::run()
}
