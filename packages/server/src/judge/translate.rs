use std::sync::Arc;

use tracing::{instrument, warn};

use super::decode;
use super::prompt;
use super::transport::GenerativeTransport;

/// Translates problem statements to Uzbek through the generative model.
pub struct Translator {
    transport: Arc<dyn GenerativeTransport>,
}

impl Translator {
    pub fn new(transport: Arc<dyn GenerativeTransport>) -> Self {
        Self { transport }
    }

    /// Single attempt. Any failure, including an empty reply, yields the input unchanged.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn to_uzbek(&self, text: &str) -> String {
        let result = match self.transport.generate(&prompt::translation_request(text)).await {
            Ok(body) => decode::extract_text(&body).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(translated) if !translated.is_empty() => translated,
            Ok(_) => {
                warn!("Translation came back empty, keeping original text");
                text.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}
