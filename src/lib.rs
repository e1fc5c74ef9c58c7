pub mod config;
pub mod form;
pub mod generator;
pub mod models;
pub mod page;
pub mod prompt;
pub mod provider;
pub mod routes;

pub use config::Config;
pub use generator::{GenerateError, Generator};
pub use models::{Brief, GeneratedPlan};
pub use provider::{CompletionProvider, CompletionRequest, OpenAiProvider, ProviderError};
pub use routes::create_routes;
