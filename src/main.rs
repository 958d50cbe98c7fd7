//! # visual-match CLI
//!
//! Command-line interface for the visual match engine.
//!
//! ## Usage
//! ```bash
//! visual-match search found/wallet.jpg ~/lost-items --limit 5
//! visual-match compare a.jpg b.jpg --strategy keypoint
//! ```

mod cli;

use visual_match::Result;

fn main() -> Result<()> {
    visual_match::init_tracing();
    cli::run()
}
