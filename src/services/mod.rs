pub mod answer;
pub mod extractor;
pub mod fetcher;
pub mod llm_service;
pub mod navigator;
pub mod prompt;
pub mod submitter;
pub mod transcriber;

pub use answer::AnswerExtractor;
pub use extractor::EvidenceExtractor;
pub use fetcher::AttachmentFetcher;
pub use llm_service::LlmGateway;
pub use navigator::{PageNavigator, PageSnapshot};
pub use prompt::PromptBuilder;
pub use submitter::SubmissionDispatcher;
pub use transcriber::Transcriber;
