//! Character-level scanning for the column expression grammar.
//!
//! The grammar is scannerless: the parser works directly on a [`Cursor`],
//! an immutable position inside the input text. Every scanning step returns
//! a new cursor instead of moving a shared one, so a failed alternative
//! leaves the caller's cursor exactly where it was.

/// An immutable read position inside an expression string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, position: 0 }
    }

    /// Unconsumed suffix of the input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Byte offset into the original input.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    /// Cursor moved past the current character.
    pub fn advance(self) -> Self {
        match self.current_char() {
            Some(ch) => Cursor {
                input: self.input,
                position: self.position + ch.len_utf8(),
            },
            None => self,
        }
    }

    pub fn skip_whitespace(self) -> Self {
        self.skip_while(char::is_whitespace).1
    }

    /// Consumes `expected` if it is the current character.
    pub fn eat(self, expected: char) -> Option<Self> {
        (self.current_char() == Some(expected)).then(|| self.advance())
    }

    /// Consumes one of `options` if the current character is among them.
    pub fn eat_any(self, options: &[char]) -> Option<(char, Self)> {
        let ch = self.current_char()?;
        options.contains(&ch).then(|| (ch, self.advance()))
    }

    /// Consumes characters while `pred` holds and returns the consumed slice.
    pub fn skip_while(self, pred: impl Fn(char) -> bool) -> (&'a str, Self) {
        let rest = self.remaining();
        let len = rest
            .char_indices()
            .find(|&(_, ch)| !pred(ch))
            .map_or(rest.len(), |(idx, _)| idx);
        (
            &rest[..len],
            Cursor {
                input: self.input,
                position: self.position + len,
            },
        )
    }

    /// `IDENT = letter|'_' , { letter|digit|'_' }`
    pub fn read_identifier(self) -> Option<(&'a str, Self)> {
        match self.current_char() {
            Some(ch) if is_ident_start(ch) => Some(self.skip_while(is_ident_continue)),
            _ => None,
        }
    }

    /// `DIGITS = digit { digit }`
    pub fn read_digits(self) -> Option<(&'a str, Self)> {
        let (digits, next) = self.skip_while(|ch| ch.is_ascii_digit());
        (!digits.is_empty()).then_some((digits, next))
    }

    /// `COL_NAME = (letter|digit|'_'|'('|')') , { letter|digit|'_'|'('|')'|' ' }`
    ///
    /// Trailing spaces before the closing `$` are not part of the name.
    pub fn read_col_name(self) -> Option<(&'a str, Self)> {
        match self.current_char() {
            Some(ch) if is_col_name_start(ch) => {
                let (name, next) = self.skip_while(is_col_name_continue);
                Some((name.trim_end_matches(' '), next))
            }
            _ => None,
        }
    }
}

pub fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

pub fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_col_name_start(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '(' | ')')
}

fn is_col_name_continue(ch: char) -> bool {
    is_col_name_start(ch) || ch == ' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_step_leaves_cursor_untouched() {
        let start = Cursor::new("abc");
        assert!(start.eat('x').is_none());
        assert_eq!(start.remaining(), "abc");

        let next = start.eat('a').unwrap();
        assert_eq!(next.remaining(), "bc");
        assert_eq!(start.remaining(), "abc");
    }

    #[test]
    fn test_identifier() {
        let (ident, rest) = Cursor::new("_sin2(x)").read_identifier().unwrap();
        assert_eq!(ident, "_sin2");
        assert_eq!(rest.remaining(), "(x)");
        assert!(Cursor::new("2abc").read_identifier().is_none());
    }

    #[test]
    fn test_col_name_with_spaces_and_parens() {
        let (name, rest) = Cursor::new("Signal (raw)  $ + 1").read_col_name().unwrap();
        assert_eq!(name, "Signal (raw)");
        assert_eq!(rest.remaining(), "$ + 1");
        assert!(Cursor::new(" leading$").read_col_name().is_none());
    }

    #[test]
    fn test_multibyte_input() {
        let (ident, rest) = Cursor::new("größe = 1").read_identifier().unwrap();
        assert_eq!(ident, "größe");
        assert_eq!(rest.skip_whitespace().remaining(), "= 1");
    }
}
