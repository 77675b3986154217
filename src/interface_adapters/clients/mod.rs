// The clients defined here are reqwest clients for external services.
pub mod gemini;

pub use gemini::GeminiClient;
