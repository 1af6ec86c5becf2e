//! Remote embedding and completion provider over HTTP.

mod error;
pub mod gemini;
pub mod keys;

pub use error::RemoteError;
pub use gemini::GeminiClient;
pub use keys::KeyRing;
