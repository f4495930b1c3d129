//! The external AI judge: prompt construction, transport, response decoding
//! and retries. Also hosts the problem-statement translator, which talks to
//! the same generative service.

pub mod client;
pub mod decode;
pub mod prompt;
pub mod translate;
pub mod transport;

pub use client::{JudgeClient, JudgeFailure};
pub use translate::Translator;
pub use transport::{GeminiTransport, GenerativeTransport, TransportError};
