// Heuristic gate separating narrative prose from navigation and boilerplate text.

/// Word and sentence length bounds used by [`DensityThresholds::accepts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityThresholds {
    pub min_chars_per_word: usize,
    pub max_chars_per_word: usize,
    pub min_words_per_sentence: usize,
    pub max_words_per_sentence: usize,
}

impl Default for DensityThresholds {
    fn default() -> Self {
        Self {
            min_chars_per_word: 4,
            max_chars_per_word: 10,
            min_words_per_sentence: 10,
            max_words_per_sentence: 30,
        }
    }
}

impl DensityThresholds {
    pub fn min_chars_per_sentence(&self) -> usize {
        self.min_chars_per_word * self.min_words_per_sentence
    }

    pub fn max_chars_per_sentence(&self) -> usize {
        self.max_chars_per_word * self.max_words_per_sentence
    }

    /// Accept `text` when its average word and sentence lengths fall inside the bounds.
    ///
    /// Word length is approximated as `chars / spaces` and sentence length as
    /// `chars / terminal punctuation`. Text without spaces or without any of
    /// `.`, `?`, `!` is rejected outright.
    pub fn accepts(&self, text: &str) -> bool {
        let spaces = text.matches(' ').count();
        let punctuation = text.chars().filter(|c| matches!(c, '.' | '?' | '!')).count();
        if spaces == 0 || punctuation == 0 {
            return false;
        }

        let length = text.chars().count() as f64;
        let chars_per_word = length / spaces as f64;
        let chars_per_sentence = length / punctuation as f64;

        (self.min_chars_per_word as f64..=self.max_chars_per_word as f64).contains(&chars_per_word)
            && (self.min_chars_per_sentence() as f64..=self.max_chars_per_sentence() as f64)
                .contains(&chars_per_sentence)
    }
}

/// [`DensityThresholds::accepts`] with the default bounds.
pub fn is_prose_like(text: &str) -> bool {
    DensityThresholds::default().accepts(text)
}
