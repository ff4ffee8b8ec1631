pub mod client;

pub use client::TranslationClient;

use crate::utils::Result;

/// Anything that can turn text in one language into another.
#[allow(async_fn_in_trait)]
pub trait Translator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Result of a source -> pivot -> source round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParaphraseOutcome {
    Paraphrased(String),
    Failed(String),
}

pub async fn round_trip<T: Translator>(
    translator: &T,
    text: &str,
    source_lang: &str,
    pivot_lang: &str,
) -> ParaphraseOutcome {
    let pivot = match translator.translate(text, source_lang, pivot_lang).await {
        Ok(pivot) => pivot,
        Err(e) => return ParaphraseOutcome::Failed(format!("{source_lang}->{pivot_lang}: {e}")),
    };

    match translator.translate(&pivot, pivot_lang, source_lang).await {
        Ok(back) if back.trim().is_empty() => {
            ParaphraseOutcome::Failed(format!("{pivot_lang}->{source_lang}: empty translation"))
        }
        Ok(back) => ParaphraseOutcome::Paraphrased(back),
        Err(e) => ParaphraseOutcome::Failed(format!("{pivot_lang}->{source_lang}: {e}")),
    }
}
