use std::collections::HashSet;

/// Characters that separate tokens. Runs of delimiters never produce empty tokens.
pub const DELIMITERS: &[char] = &[' ', '.', ',', '!', '?', ';', ':', '"', '(', ')', '\n'];

pub const DEFAULT_MAX_TOKENS: usize = 100;

/// NLTK's English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Splits free text into at most `max_tokens` lowercase words.
///
/// With a stopword set attached, listed words and tokens that are not purely
/// alphabetic are dropped before the limit is applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tokenizer {
    max_tokens: usize,
    stopwords: Option<HashSet<String>>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

impl Tokenizer {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            stopwords: None,
        }
    }

    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = Some(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect());
        self
    }

    pub fn with_english_stopwords(self) -> Self {
        self.with_stopwords(ENGLISH_STOPWORDS)
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn filters_stopwords(&self) -> bool {
        self.stopwords.is_some()
    }

    /// Tokens past the limit are dropped silently.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(DELIMITERS)
            .filter(|piece| !piece.is_empty())
            .map(str::to_lowercase)
            .filter(|token| self.keeps(token))
            .take(self.max_tokens)
            .collect()
    }

    fn keeps(&self, token: &str) -> bool {
        match &self.stopwords {
            Some(stopwords) => {
                token.chars().all(char::is_alphabetic) && !stopwords.contains(token)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("The Bank."), vec!["the", "bank"]);
        assert_eq!(
            tokenizer.tokenize("\"Where (do) you bank?\" he asked;\nthen: left!"),
            vec!["where", "do", "you", "bank", "he", "asked", "then", "left"]
        );
    }

    #[test]
    fn same_input_same_tokens() {
        let tokenizer = Tokenizer::default();
        let text = "The bank gave me a loan.";
        assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
    }

    #[test]
    fn truncates_to_max_tokens() {
        let tokenizer = Tokenizer::new(3);
        assert_eq!(tokenizer.tokenize("one two three four five"), vec!["one", "two", "three"]);
        let long: String = (0..250).map(|i| format!("w{i} ")).collect();
        let tokens = Tokenizer::default().tokenize(&long);
        assert_eq!(tokens.len(), DEFAULT_MAX_TOKENS);
        assert_eq!(tokens.last().map(String::as_str), Some("w99"));
    }

    #[test]
    fn empty_and_delimiter_only_input() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize(" .,!?;:\"()\n").is_empty());
        assert!(Tokenizer::new(0).tokenize("words here").is_empty());
    }

    #[test]
    fn other_whitespace_is_kept_inside_tokens() {
        assert_eq!(Tokenizer::default().tokenize("a\tb"), vec!["a\tb"]);
    }

    #[test]
    fn keeps_function_words_by_default() {
        let tokenizer = Tokenizer::default();
        assert!(!tokenizer.filters_stopwords());
        assert_eq!(
            tokenizer.tokenize("The bank gave me a loan in 1999."),
            vec!["the", "bank", "gave", "me", "a", "loan", "in", "1999"]
        );
    }

    #[test]
    fn english_stopwords_and_non_alphabetic_tokens_are_dropped() {
        let tokenizer = Tokenizer::default().with_english_stopwords();
        assert!(tokenizer.filters_stopwords());
        assert_eq!(
            tokenizer.tokenize("The bank gave me a loan in 1999."),
            vec!["bank", "gave", "loan"]
        );
        assert_eq!(tokenizer.tokenize("I sat on the bank"), vec!["sat", "bank"]);
        assert!(tokenizer.tokenize("the a of 42").is_empty());
    }

    #[test]
    fn custom_stopwords_are_case_folded() {
        let tokenizer = Tokenizer::default().with_stopwords(["Bank", "LOAN"]);
        assert_eq!(tokenizer.tokenize("The bank gave a Loan"), vec!["the", "gave", "a"]);
    }

    #[test]
    fn limit_counts_kept_tokens() {
        let tokenizer = Tokenizer::new(2).with_english_stopwords();
        assert_eq!(tokenizer.tokenize("the river and the bank and the sea"), vec!["river", "bank"]);
    }
}
