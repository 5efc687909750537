/// One argument token after the command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Starts with the marker character and references an option.
    Marker(&'a str),
    Value(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Self::Marker(s) | Self::Value(s) => s,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

/// A raw line split into the command candidate and its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    /// Empty when the line held nothing but whitespace.
    pub command: &'a str,
    pub rest: Vec<Token<'a>>,
}

/// Split `raw` on runs of whitespace.
///
/// There is no quoting or escaping: a value containing whitespace always
/// arrives as several tokens.
pub fn tokenize(raw: &str, marker: char) -> Tokens<'_> {
    let mut words = raw.split_whitespace();
    let command = words.next().unwrap_or("");
    let rest = words
        .map(|w| {
            if w.starts_with(marker) {
                Token::Marker(w)
            } else {
                Token::Value(w)
            }
        })
        .collect();
    Tokens { command, rest }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse() {
        let t = tokenize("  move\ta.txt   b.txt \n --cp ", '-');
        assert_eq!(t.command, "move");
        assert_eq!(
            t.rest,
            vec![
                Token::Value("a.txt"),
                Token::Value("b.txt"),
                Token::Marker("--cp"),
            ]
        );
    }

    #[test]
    fn blank_input_has_empty_command() {
        let t = tokenize("   ", '-');
        assert_eq!(t.command, "");
        assert!(t.rest.is_empty());
    }

    #[test]
    fn markers_follow_the_configured_character() {
        let t = tokenize("copy /y a -b", '/');
        assert_eq!(t.rest[0], Token::Marker("/y"));
        assert_eq!(t.rest[2], Token::Value("-b"));
        assert!(t.rest[0].is_marker());
        assert_eq!(t.rest[1].as_str(), "a");
    }
}
