//! Speech from the Google Translate TTS endpoint, the same one gTTS uses.
//! The endpoint only takes short inputs, so text is sent in chunks and the
//! returned mp3 pieces are concatenated.
use super::SpeechSynthesizer;
use crate::error::NarrationError;
use crate::utils::chunk_text;
use reqwest::blocking::Client;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleTts {
    client: Client,
    endpoint: Url,
}

impl GoogleTts {
    pub fn new(endpoint: &str) -> Result<Self, NarrationError> {
        let endpoint = Url::parse(endpoint)?;
        // a hung request only delays that one narration
        let client = Client::builder()
            .timeout(None)
            .user_agent(concat!("flashcards-cli-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    fn chunk_url(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("client", "tw-ob")
            .append_pair("tl", language)
            .append_pair("q", chunk)
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &chunk.chars().count().to_string());
        url
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, NarrationError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(NarrationError::EmptyText);
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, language, idx, chunks.len());
            let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
            audio.extend_from_slice(&bytes);
        }
        log::debug!("synthesized {} bytes in {} chunks", audio.len(), chunks.len());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_url_carries_text_and_language() {
        let tts = GoogleTts::new(DEFAULT_ENDPOINT).unwrap();
        let url = tts.chunk_url("what is 2 + 2?", "en", 0, 1);

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".into(), "what is 2 + 2?".into())));
        assert!(pairs.contains(&("tl".into(), "en".into())));
        assert!(pairs.contains(&("client".into(), "tw-ob".into())));
        assert!(pairs.contains(&("textlen".into(), "14".into())));
        assert_eq!(url.host_str(), Some("translate.google.com"));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        assert!(matches!(
            GoogleTts::new("not a url"),
            Err(NarrationError::Url(_))
        ));
    }

    #[test]
    fn blank_text_skips_the_network() {
        // unroutable endpoint: reaching the network would fail differently
        let tts = GoogleTts::new("http://127.0.0.1:9/tts").unwrap();
        assert!(matches!(
            tts.synthesize(" ", "en"),
            Err(NarrationError::EmptyText)
        ));
    }
}
