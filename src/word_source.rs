use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static WORDSET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/wordsets");

/// Where the words for a run come from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum WordSourceMode {
    /// Random words sampled from the built-in bank
    #[default]
    #[strum(serialize = "words")]
    #[value(name = "words")]
    RandomWords,
    /// One sentence from the built-in quotes
    #[strum(serialize = "quote")]
    #[value(name = "quote")]
    Quote,
}

impl WordSourceMode {
    pub fn toggled(self) -> Self {
        match self {
            WordSourceMode::RandomWords => WordSourceMode::Quote,
            WordSourceMode::Quote => WordSourceMode::RandomWords,
        }
    }
}

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word set file not found: {0}")]
    Missing(String),
    #[error("word set file {0} is not valid utf-8")]
    Encoding(String),
    #[error("failed to parse word set {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("word set {0} is empty")]
    Empty(String),
}

#[derive(Deserialize, Clone, Debug)]
struct WordBank {
    words: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
struct QuoteCorpus {
    quotes: Vec<String>,
}

/// Fixed word bank and quote corpus a run's words are drawn from.
#[derive(Clone, Debug)]
pub struct WordSource {
    bank: Vec<String>,
    quotes: Vec<String>,
}

impl WordSource {
    /// Load the word sets compiled into the binary.
    pub fn embedded() -> Result<Self, WordSourceError> {
        let bank: WordBank = read_wordset("words.json")?;
        let corpus: QuoteCorpus = read_wordset("quotes.json")?;
        Self::new(bank.words, corpus.quotes)
    }

    pub fn new(bank: Vec<String>, quotes: Vec<String>) -> Result<Self, WordSourceError> {
        if bank.is_empty() {
            return Err(WordSourceError::Empty("bank".into()));
        }
        if quotes.iter().all(|q| q.split_whitespace().next().is_none()) {
            return Err(WordSourceError::Empty("quotes".into()));
        }
        Ok(Self { bank, quotes })
    }

    pub fn bank(&self) -> &[String] {
        &self.bank
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    /// Words for one run. `count` only applies to [`WordSourceMode::RandomWords`].
    pub fn select<R: Rng + ?Sized>(
        &self,
        mode: WordSourceMode,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        match mode {
            WordSourceMode::RandomWords => self.sample_words(count, rng),
            WordSourceMode::Quote => self.quote_words(rng),
        }
    }

    /// Uniform sampling with replacement, in draw order.
    pub fn sample_words<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count)
            .filter_map(|_| self.bank.choose(rng).cloned())
            .collect()
    }

    /// A whole quote split on whitespace. Punctuation stays on its word.
    pub fn quote_words<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        self.quotes
            .choose(rng)
            .map(|q| q.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

fn read_wordset<T: serde::de::DeserializeOwned>(file_name: &str) -> Result<T, WordSourceError> {
    let file = WORDSET_DIR
        .get_file(file_name)
        .ok_or_else(|| WordSourceError::Missing(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| WordSourceError::Encoding(file_name.to_string()))?;

    serde_json::from_str(contents).map_err(|source| WordSourceError::Parse {
        file: file_name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_embedded_word_sets_load() {
        let source = WordSource::embedded().unwrap();

        assert!(source.bank().contains(&"time".to_string()));
        assert!(source.bank().contains(&"escape".to_string()));
        assert_eq!(source.quotes().len(), 5);
    }

    #[test]
    fn test_sample_words_draws_from_bank() {
        let source = WordSource::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let words = source.sample_words(90, &mut rng);

        assert_eq!(words.len(), 90);
        assert!(words.iter().all(|w| source.bank().contains(w)));
    }

    #[test]
    fn test_sampling_is_reproducible_with_seed() {
        let source = WordSource::embedded().unwrap();

        let a = source.select(WordSourceMode::RandomWords, 20, &mut StdRng::seed_from_u64(42));
        let b = source.select(WordSourceMode::RandomWords, 20, &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn test_sampling_allows_duplicates() {
        let source = WordSource::new(vec!["only".into()], vec!["a b".into()]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(source.sample_words(3, &mut rng), vec!["only", "only", "only"]);
    }

    #[test]
    fn test_quote_words_keep_punctuation() {
        let source = WordSource::new(
            vec!["x".into()],
            vec!["First, solve the problem. Then, write the code.".into()],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let words = source.select(WordSourceMode::Quote, 0, &mut rng);

        assert_eq!(
            words,
            vec!["First,", "solve", "the", "problem.", "Then,", "write", "the", "code."]
        );
    }

    #[test]
    fn test_quote_comes_from_corpus() {
        let source = WordSource::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let joined = source.quote_words(&mut rng).join(" ");

        assert!(source.quotes().contains(&joined));
    }

    #[test]
    fn test_empty_sets_rejected() {
        assert!(matches!(
            WordSource::new(vec![], vec!["a".into()]),
            Err(WordSourceError::Empty(_))
        ));
        assert!(matches!(
            WordSource::new(vec!["a".into()], vec!["  ".into()]),
            Err(WordSourceError::Empty(_))
        ));
    }

    #[test]
    fn test_mode_toggle_and_display() {
        assert_eq!(WordSourceMode::RandomWords.toggled(), WordSourceMode::Quote);
        assert_eq!(WordSourceMode::Quote.toggled(), WordSourceMode::RandomWords);
        assert_eq!(WordSourceMode::RandomWords.to_string(), "words");
        assert_eq!(WordSourceMode::Quote.to_string(), "quote");
    }

    #[test]
    fn test_read_missing_wordset() {
        let result: Result<WordBank, _> = read_wordset("nonexistent.json");
        assert!(matches!(result, Err(WordSourceError::Missing(_))));
    }
}
