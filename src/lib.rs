//! VoiceScribe - voice note recording, transcription, and filing CLI
//!
//! This crate records microphone audio through an external `sox` process,
//! transcribes it with the Whisper API, cleans and summarizes the transcript
//! through a chat-completion service, and files the results under a
//! timestamped, headline-named directory.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: the pipeline state record, value objects, and configuration
//! - **Application**: the stage sequence, pipeline runner, and port traits
//! - **Infrastructure**: adapter implementations (sox, Whisper, chat agents)
//! - **CLI**: argument parsing, output formatting, and the app runner

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
