//! Individual LLM client implementations

mod base;
mod cohere;
mod huggingface;
mod openai;

pub use base::HttpClientBase;
pub use cohere::CohereClient;
pub use huggingface::HuggingFaceClient;
pub use openai::OpenAIClient;
