use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{Lang, SpeechConfig};
use crate::error::{Error, Result};
use crate::http::{self, RetryPolicy};
use crate::language::google_code;
use super::traits::SpeechSynthesizer;

/// Google Translate's speech endpoint, MP3 output.
///
/// The endpoint only reads short texts, so input is split into chunks and the
/// MP3 frames of every chunk are concatenated into one stream.
pub struct GoogleTts {
    client: Client,
    pub api_base: String,
    pub slow: bool,
    pub max_chunk_chars: usize,
    pub retry: RetryPolicy,
}

impl GoogleTts {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            slow: config.slow,
            max_chunk_chars: config.max_chunk_chars,
            retry: RetryPolicy::new(config.retry_count, config.retry_delay_ms),
        })
    }

    async fn fetch_chunk(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.api_base);
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let speed = if self.slow { "0.3" } else { "1" };

        let response = http::send_with_retry(
            || {
                self.client.get(&url).query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk),
                    ("tl", lang),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                    ("client", "tw-ob"),
                    ("ttsspeed", speed),
                ])
            },
            self.retry,
            "google-tts",
        )
        .await
        .map_err(|failure| Error::SynthesisFailed(format!("chunk {idx}: {failure}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::SynthesisFailed(format!("chunk {idx}: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    fn name(&self) -> &'static str {
        "Google TTS"
    }

    async fn synthesize(&self, text: &str, lang: &Lang) -> Result<Vec<u8>> {
        let chunks = split_text(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(Error::SynthesisFailed("no speakable text".to_string()));
        }

        let lang = google_code(lang);
        debug!("Synthesizing {} chunk(s) in {}", chunks.len(), lang);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, &lang, idx, chunks.len()).await?);
        }

        if audio.is_empty() {
            return Err(Error::SynthesisFailed("service returned no audio".to_string()));
        }
        Ok(audio)
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Splits on clause punctuation first, then on whitespace, then inside words
/// that are still too long. Short pieces are packed back together and pieces
/// without any letter or digit are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let pieces = clauses(text)
        .into_iter()
        .filter(|clause| clause.chars().any(char::is_alphanumeric))
        .flat_map(|clause| {
            if clause.chars().count() <= max_chars {
                vec![clause]
            } else {
                split_words(&clause, max_chars)
            }
        });

    pack(pieces, max_chars)
}

const fn ends_clause(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | ';' | ':' | '…' | '\n' | '。' | '，' | '！' | '？' | '；' | '：' | '、'
            | '،' | '؟' | '।'
    )
}

fn clauses(text: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);
        if ends_clause(c) {
            push_trimmed(&mut clauses, &current);
            current.clear();
        }
    }
    push_trimmed(&mut clauses, &current);

    clauses
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

fn split_words(clause: &str, max_chars: usize) -> Vec<String> {
    let mut words = Vec::new();
    for word in clause.split_whitespace() {
        if word.chars().count() <= max_chars {
            words.push(word.to_string());
        } else {
            let chars: Vec<char> = word.chars().collect();
            words.extend(chars.chunks(max_chars).map(|part| part.iter().collect::<String>()));
        }
    }
    words
}

fn pack(pieces: impl IntoIterator<Item = String>, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces {
        let len = piece.chars().count();
        if current.is_empty() {
            current = piece;
            current_len = len;
        } else if current_len + 1 + len <= max_chars {
            current.push(' ');
            current.push_str(&piece);
            current_len += 1 + len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current = piece;
            current_len = len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
