//! CLI argument definitions using Clap

use clap::Parser;

/// VoiceScribe - record, transcribe, and file voice notes
#[derive(Parser, Debug)]
#[command(name = "voice-scribe")]
#[command(version)]
#[command(about = "Records a voice note, transcribes and summarizes it, and files the results")]
#[command(long_about = None)]
pub struct Cli {
    /// Output file name for the recording (default: derived from the run timestamp)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,
}

/// Parsed run options
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: Option<String>,
}
