//! Remote text-editing adapters

pub mod agent;
pub mod editor;
pub mod prompts;

pub use agent::ChatAgent;
pub use editor::AiEditor;
