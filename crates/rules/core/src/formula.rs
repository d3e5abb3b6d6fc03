//! Textual dice-formula manipulation.
//!
//! This is *not* a dice evaluator - rolling happens behind the external
//! [`crate::env::FormulaEvaluator`] capability. The scaler only needs to
//! recognize die terms textually so it can multiply die counts (altering)
//! and merge like terms (`3d6` + `2d6` -> `5d6`). Anything it cannot
//! recognize (parentheses, multiplication, variables) is carried opaquely
//! and simply never merged.

use std::fmt;

// ============================================================================
// Terms
// ============================================================================

/// A single die term: `NdF` plus any trailing modifier text (`r1`, `kh1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DieTerm {
    pub count: u32,
    pub faces: u32,
    pub modifiers: String,
}

impl fmt::Display for DieTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}{}", self.count, self.faces, self.modifiers)
    }
}

/// One additive term of a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Die(DieTerm),
    Number(i64),
    /// Anything else: variables (`@mod`), parenthesized math, etc.
    Other(String),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Die(die) => die.fmt(f),
            Self::Number(value) => value.fmt(f),
            Self::Other(text) => text.fmt(f),
        }
    }
}

/// A term with its additive sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTerm {
    pub negative: bool,
    pub term: Term,
}

// ============================================================================
// Formula
// ============================================================================

/// An additive sequence of recognized terms.
///
/// Parsing is total: a formula that uses operators beyond `+`/`-` collapses
/// into a single opaque [`Term::Other`], which disables merging but keeps
/// the text intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceFormula {
    pub terms: Vec<SignedTerm>,
}

impl DiceFormula {
    /// Parses formula text into additive terms.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        // Operators beyond +/- make term splitting unsound; treat the whole
        // expression as opaque.
        if trimmed.contains(['(', ')', '*', '/']) {
            return Self {
                terms: vec![SignedTerm {
                    negative: false,
                    term: Term::Other(trimmed.to_string()),
                }],
            };
        }

        let mut terms = Vec::new();
        let mut negative = false;
        let mut current = String::new();

        for ch in trimmed.chars() {
            match ch {
                '+' | '-' => {
                    push_term(&mut terms, &current, negative);
                    current.clear();
                    negative = ch == '-';
                }
                _ => current.push(ch),
            }
        }
        push_term(&mut terms, &current, negative);

        Self { terms }
    }

    /// Multiplies every die count by `multiplier`, leaving numeric and
    /// opaque terms untouched (the alter operation used by scaling).
    #[must_use]
    pub fn alter(mut self, multiplier: u32) -> Self {
        for signed in &mut self.terms {
            if let Term::Die(die) = &mut signed.term {
                die.count *= multiplier;
            }
        }
        self
    }

    /// The sole term of this formula, if it is a single positive die term.
    /// This is the precondition for like-term merging.
    pub fn single_die(&self) -> Option<&DieTerm> {
        match self.terms.as_slice() {
            [SignedTerm {
                negative: false,
                term: Term::Die(die),
            }] => Some(die),
            _ => None,
        }
    }

    /// Mutable access to the leading term when it is a positive die.
    pub fn leading_die_mut(&mut self) -> Option<&mut DieTerm> {
        match self.terms.first_mut() {
            Some(SignedTerm {
                negative: false,
                term: Term::Die(die),
            }) => Some(die),
            _ => None,
        }
    }
}

fn push_term(terms: &mut Vec<SignedTerm>, text: &str, negative: bool) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    terms.push(SignedTerm {
        negative,
        term: parse_term(text),
    });
}

fn parse_term(text: &str) -> Term {
    if let Ok(value) = text.parse::<i64>() {
        return Term::Number(value);
    }
    if let Some(die) = parse_die(text) {
        return Term::Die(die);
    }
    Term::Other(text.to_string())
}

fn parse_die(text: &str) -> Option<DieTerm> {
    let (count_text, rest) = text.split_once(['d', 'D'])?;
    let count = if count_text.is_empty() {
        1
    } else {
        count_text.parse::<u32>().ok()?
    };

    let faces_end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let faces = rest[..faces_end].parse::<u32>().ok()?;
    let modifiers = rest[faces_end..].to_string();

    // Modifiers are a trailing alphanumeric run ("r1", "kh1"); anything else
    // is not a plain die term.
    if !modifiers.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }

    Some(DieTerm {
        count,
        faces,
        modifiers,
    })
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, signed) in self.terms.iter().enumerate() {
            if index == 0 {
                if signed.negative {
                    write!(f, "-")?;
                }
            } else if signed.negative {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            write!(f, "{}", signed.term)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_die_terms() {
        let formula = DiceFormula::parse("3d6");
        let die = formula.single_die().unwrap();
        assert_eq!((die.count, die.faces), (3, 6));
        assert!(die.modifiers.is_empty());
    }

    #[test]
    fn bare_die_defaults_to_count_one() {
        let formula = DiceFormula::parse("d20");
        assert_eq!(formula.single_die().unwrap().count, 1);
    }

    #[test]
    fn parses_mixed_terms_with_signs() {
        let formula = DiceFormula::parse("2d8 + 3 - 1d4");
        assert_eq!(formula.terms.len(), 3);
        assert!(!formula.terms[0].negative);
        assert_eq!(formula.terms[1].term, Term::Number(3));
        assert!(formula.terms[2].negative);
        assert_eq!(formula.to_string(), "2d8 + 3 - 1d4");
    }

    #[test]
    fn keeps_die_modifiers() {
        let formula = DiceFormula::parse("4d6r1");
        assert_eq!(formula.single_die().unwrap().modifiers, "r1");
        assert_eq!(formula.to_string(), "4d6r1");
    }

    #[test]
    fn variables_are_opaque() {
        let formula = DiceFormula::parse("1d8 + @mod");
        assert_eq!(
            formula.terms[1].term,
            Term::Other("@mod".to_string())
        );
        assert!(formula.single_die().is_none());
    }

    #[test]
    fn complex_expressions_collapse_to_one_opaque_term() {
        let formula = DiceFormula::parse("(1d6 + 2) * 3");
        assert_eq!(formula.terms.len(), 1);
        assert!(formula.single_die().is_none());
        assert_eq!(formula.to_string(), "(1d6 + 2) * 3");
    }

    #[test]
    fn alter_multiplies_die_counts_only() {
        let altered = DiceFormula::parse("1d8 + 1").alter(3);
        assert_eq!(altered.to_string(), "3d8 + 1");
    }

    #[test]
    fn compact_formulas_round_trip_normalized() {
        assert_eq!(DiceFormula::parse("3d6+2").to_string(), "3d6 + 2");
    }
}
