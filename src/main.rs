//! CLI entry point for greedy exemplar-based inpainting

use clap::Parser;
use greedyfill::io::cli::{Cli, FileProcessor};

fn main() -> greedyfill::Result<()> {
    let cli = Cli::parse();
    simple_logger::init_with_level(cli.log_level()).ok();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
