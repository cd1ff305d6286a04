//! Tokenization: splitting color names into word tokens.
//!
//! The default [`TreebankTokenizer`] follows the Penn Treebank conventions:
//! punctuation is split from words, a sentence-final period becomes its own
//! token while abbreviation periods inside the text stay attached, double
//! quotes become ``` `` ``` / `''`, and clitics such as `'s` and `n't` are
//! split from their host word.
//!
//! ```
//! use swatch_names::token::{Tokenizer, TreebankTokenizer};
//!
//! let tokens = TreebankTokenizer.tokenize("Mr. Blue's sky.");
//! assert_eq!(tokens, vec!["Mr.", "Blue", "'s", "sky", "."]);
//! ```

/// Anything that can split text into word tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Penn Treebank style word tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreebankTokenizer;

impl Tokenizer for TreebankTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let padded = pad_punctuation(text);
        let mut tokens = Vec::new();

        for word in padded.split_whitespace() {
            split_clitics(word, &mut tokens);
        }

        tokens
    }
}

const CLOSERS: &[char] = &[']', ')', '}', '>', '"', '\''];

/// Surround punctuation with spaces so that whitespace splitting isolates it.
fn pad_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(text.len() * 2);
    let mut i = 0;

    let pad = |out: &mut String, token: &str| {
        out.push(' ');
        out.push_str(token);
        out.push(' ');
    };

    while i < len {
        let ch = chars[i];
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        match ch {
            ';' | '@' | '#' | '$' | '%' | '&' | '?' | '!' | '[' | ']' | '(' | ')' | '{' | '}'
            | '<' | '>' => pad(&mut out, &ch.to_string()),
            // Separators inside numbers (1,000 or 12:30) stay put
            ':' | ',' if next.is_some_and(|c| c.is_ascii_digit()) => out.push(ch),
            ':' | ',' => pad(&mut out, &ch.to_string()),
            '"' => {
                let opening = match prev {
                    None => true,
                    Some(p) => p.is_whitespace() || matches!(p, '(' | '[' | '{' | '<'),
                };
                pad(&mut out, if opening { "``" } else { "''" });
            }
            '.' if next == Some('.') && chars.get(i + 2) == Some(&'.') => {
                pad(&mut out, "...");
                i += 3;
                continue;
            }
            '.' if prev.is_some_and(|p| p != '.') && is_final(&chars[i + 1..]) => {
                pad(&mut out, ".");
            }
            '-' if next == Some('-') => {
                pad(&mut out, "--");
                i += 2;
                continue;
            }
            _ => out.push(ch),
        }
        i += 1;
    }

    out
}

/// True when only closing brackets, quotes and whitespace remain.
fn is_final(rest: &[char]) -> bool {
    let mut trailing = rest.iter().skip_while(|c| CLOSERS.contains(c));
    trailing.all(|c| c.is_whitespace())
}

const CLITICS: &[&str] = &["'s", "'m", "'d", "'ll", "'re", "'ve"];

fn split_clitics(word: &str, tokens: &mut Vec<String>) {
    let lower = word.to_lowercase();

    // lowercase only changes the byte length for a handful of non-ascii
    // characters; fall back to the word itself when it does
    if lower.len() == word.len() {
        if lower.len() > 3 && lower.ends_with("n't") {
            let split = word.len() - 3;
            tokens.push(word[..split].to_string());
            tokens.push(word[split..].to_string());
            return;
        }

        for clitic in CLITICS {
            if lower.len() > clitic.len() && lower.ends_with(clitic) {
                let split = word.len() - clitic.len();
                if !word[..split].ends_with('\'') {
                    tokens.push(word[..split].to_string());
                    tokens.push(word[split..].to_string());
                    return;
                }
            }
        }

        if word.len() > 1 && word.ends_with('\'') && !word.ends_with("''") {
            tokens.push(word[..word.len() - 1].to_string());
            tokens.push("'".to_string());
            return;
        }
    }

    tokens.push(word.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<String> {
        TreebankTokenizer.tokenize(text)
    }

    #[test]
    fn final_period_is_split() {
        assert_eq!(tokenize("red."), vec!["red", "."]);
        assert_eq!(tokenize("crimson red."), vec!["crimson", "red", "."]);
    }

    #[test]
    fn inner_periods_stay_attached() {
        assert_eq!(tokenize("St. Tropez Blue"), vec!["St.", "Tropez", "Blue"]);
    }

    #[test]
    fn punctuation_is_isolated() {
        assert_eq!(
            tokenize("Red, White & Blue!"),
            vec!["Red", ",", "White", "&", "Blue", "!"]
        );
        assert_eq!(tokenize("(Dusk)"), vec!["(", "Dusk", ")"]);
    }

    #[test]
    fn numbers_keep_their_separators() {
        assert_eq!(tokenize("Route 1,000"), vec!["Route", "1,000"]);
    }

    #[test]
    fn clitics_are_split() {
        assert_eq!(tokenize("Baker's Chocolate"), vec!["Baker", "'s", "Chocolate"]);
        assert_eq!(tokenize("Don't Blink"), vec!["Do", "n't", "Blink"]);
        assert_eq!(tokenize("Sailors' Knot"), vec!["Sailors", "'", "Knot"]);
    }

    #[test]
    fn quotes_become_treebank_quotes() {
        assert_eq!(tokenize("\"Sunny\" Day"), vec!["``", "Sunny", "''", "Day"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("   ").is_empty());
    }
}
