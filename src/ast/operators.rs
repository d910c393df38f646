/// Binding strength of a binary operator, loosest first.
///
/// Every level is left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// `+` and `-`
    Additive,
    /// `*` and `/`
    Multiplicative,
    /// `%` and `^`
    Exponential,
}

impl Precedence {
    /// Operator characters accepted at this level.
    pub fn operators(self) -> &'static [char] {
        match self {
            Precedence::Additive => &['+', '-'],
            Precedence::Multiplicative => &['*', '/'],
            Precedence::Exponential => &['%', '^'],
        }
    }

    /// The next tighter level, `None` for the innermost one.
    pub fn tighter(self) -> Option<Precedence> {
        match self {
            Precedence::Additive => Some(Precedence::Multiplicative),
            Precedence::Multiplicative => Some(Precedence::Exponential),
            Precedence::Exponential => None,
        }
    }
}

/// Precedence of an operator character, `None` if the grammar has no such operator.
pub fn precedence_of(op: char) -> Option<Precedence> {
    [
        Precedence::Additive,
        Precedence::Multiplicative,
        Precedence::Exponential,
    ]
    .into_iter()
    .find(|level| level.operators().contains(&op))
}
