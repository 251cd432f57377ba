use std::fmt;

/// A lexical token of a placeholder-bearing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    /// `$name` or `${name}`.
    Var(&'a str),
    /// A `$` that does not start a variable, e.g. the result sentinel in `$.status`.
    Bare,
}

/// Splits `input` into text, variable placeholders and bare `$` sentinels.
///
/// `$$` is an escaped literal `$` and always comes back as text.
pub fn scan(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        if text_start < i {
            tokens.push(Token::Text(&input[text_start..i]));
        }

        match bytes.get(i + 1) {
            Some(b'$') => {
                tokens.push(Token::Text("$"));
                i += 2;
            }
            Some(b'{') => match ident_len(&bytes[i + 2..]) {
                n if n > 0 && bytes.get(i + 2 + n) == Some(&b'}') => {
                    tokens.push(Token::Var(&input[i + 2..i + 2 + n]));
                    i += n + 3;
                }
                _ => {
                    tokens.push(Token::Bare);
                    i += 1;
                }
            },
            _ => match ident_len(&bytes[i + 1..]) {
                0 => {
                    tokens.push(Token::Bare);
                    i += 1;
                }
                n => {
                    tokens.push(Token::Var(&input[i + 1..i + 1 + n]));
                    i += n + 1;
                }
            },
        }
        text_start = i;
    }

    if text_start < bytes.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// Length of the identifier at the start of `bytes`, or 0 if there is none.
fn ident_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == b'_' => bytes
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == b'_')
            .count(),
        _ => 0,
    }
}

/// One piece of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Text(String),
    Var(String),
}

/// A string whose variable references have been lifted out of the text.
///
/// Templates are rendered as string literals or as code fragments; in both
/// cases a [`Segment::Var`] becomes a lookup into the runtime variable bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// A template holding `text` verbatim, with no placeholder parsing.
    pub fn literal(text: impl Into<String>) -> Self {
        let mut t = Self::default();
        t.push_text(text);
        t
    }

    /// A template referencing a single variable.
    pub fn var(name: impl Into<String>) -> Self {
        let mut t = Self::default();
        t.push_var(name);
        t
    }

    /// Parses `$name` / `${name}` placeholders out of user-supplied text.
    /// A bare `$` is kept as text.
    pub fn parse(input: &str) -> Self {
        let mut t = Self::default();
        for token in scan(input) {
            match token {
                Token::Text(s) => t.push_text(s),
                Token::Var(name) => t.push_var(name),
                Token::Bare => t.push_text("$"),
            }
        }
        t
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(prev)) => prev.push_str(&text),
            _ => self.segments.push(Segment::Text(text)),
        }
    }

    pub fn push_var(&mut self, name: impl Into<String>) {
        self.segments.push(Segment::Var(name.into()));
    }

    pub fn append(&mut self, other: Template) {
        for segment in other.segments {
            match segment {
                Segment::Text(s) => self.push_text(s),
                Segment::Var(v) => self.push_var(v),
            }
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of every variable referenced, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn has_variables(&self) -> bool {
        self.variables().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Shows the template with `${name}` placeholders, mostly for diagnostics.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(s) => f.write_str(s)?,
                Segment::Var(v) => write!(f, "${{{}}}", v)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_both_placeholder_shapes() {
        assert_eq!(
            scan("Bearer $token and ${user_id}!"),
            vec![
                Token::Text("Bearer "),
                Token::Var("token"),
                Token::Text(" and "),
                Token::Var("user_id"),
                Token::Text("!"),
            ]
        );
    }

    #[test]
    fn bare_dollar_and_escapes() {
        assert_eq!(
            scan("$.status === $value"),
            vec![
                Token::Bare,
                Token::Text(".status === "),
                Token::Var("value"),
            ]
        );
        assert_eq!(scan("cost $$5"), vec![Token::Text("cost "), Token::Text("$"), Token::Text("5")]);
        assert_eq!(scan("${not closed"), vec![Token::Bare, Token::Text("{not closed")]);
    }

    #[test]
    fn parse_merges_adjacent_text() {
        let t = Template::parse("price: $$10 for $1");
        assert_eq!(t.segments(), &[Segment::Text("price: $10 for $1".to_string())]);
        assert!(!t.has_variables());

        let t = Template::parse("${a}$b");
        assert_eq!(t.variables().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(t.to_string(), "${a}${b}");
    }
}
