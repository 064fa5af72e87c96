use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::Rng;

pub const DEFAULT_WORDS: [&str; 10] = [
    "java", "code", "typing", "game", "fun", "random", "fast", "react", "keyboard", "rain",
];

/// Words the game can drop. Never empty, and no entry contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();

        if let Some(bad) = words.iter().find(|w| w.is_empty() || w.chars().any(char::is_whitespace)) {
            bail!("word {bad:?} must be non-empty and contain no whitespace");
        }
        if words.is_empty() {
            bail!("word list is empty");
        }

        Ok(Self { words })
    }

    /// One word per line. Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut words = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.chars().any(char::is_whitespace) {
                bail!("line {}: {line:?} holds more than one word", number + 1);
            }
            words.push(line.to_string());
        }
        Self::new(words)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid word list {}", path.display()))
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.words[rng.random_range(0..self.words.len())]
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_list_matches_the_classic_ten() {
        let vocabulary = Vocabulary::default();
        assert_eq!(vocabulary.len(), 10);
        assert!(vocabulary.words().iter().any(|w| w == "keyboard"));
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let vocabulary = Vocabulary::parse("# animals\ncat\n\n  dog  \n#birds\nowl\n").unwrap();
        assert_eq!(vocabulary.words(), ["cat", "dog", "owl"]);
    }

    #[test]
    fn parse_rejects_phrases() {
        let err = Vocabulary::parse("cat\nhot dog\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn parse_rejects_empty_lists() {
        assert!(Vocabulary::parse("# nothing here\n\n").is_err());
    }

    #[test]
    fn new_rejects_empty_words() {
        assert!(Vocabulary::new(["ok", ""]).is_err());
    }

    #[test]
    fn choose_only_returns_known_words() {
        let vocabulary = Vocabulary::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let word = vocabulary.choose(&mut rng);
            assert!(DEFAULT_WORDS.contains(&word));
        }
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Vocabulary::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read word list"));
    }
}
