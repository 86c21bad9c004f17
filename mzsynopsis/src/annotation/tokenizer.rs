use serde::{Deserialize, Serialize};

/// The modification syntax used by a search tool in its peptide strings
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ModificationDialect {
    /// Signed masses directly following a residue as in `M+15.995PEPTIDE` (MODa)
    pub unwrapped_masses: bool,
    /// Masses or names in square brackets as in `M[15.995]PEPTIDE` or `M[Oxidation]PEPTIDE` (TopPIC)
    pub bracketed: bool,
    /// Parenthesized residue groups as in `(ST)[79.966]` where the modification is placed on one
    /// residue of the group, it is annotated on the first residue of the group
    pub ambiguous_groups: bool,
}

impl ModificationDialect {
    /// Only signed masses after residues
    pub const UNWRAPPED: Self = Self {
        unwrapped_masses: true,
        bracketed: false,
        ambiguous_groups: false,
    };
    /// Bracketed masses and names with ambiguous groups
    pub const BRACKETED: Self = Self {
        unwrapped_masses: false,
        bracketed: true,
        ambiguous_groups: true,
    };
    /// All syntax
    pub const ALL: Self = Self {
        unwrapped_masses: true,
        bracketed: true,
        ambiguous_groups: true,
    };
}

impl Default for ModificationDialect {
    fn default() -> Self {
        Self::ALL
    }
}

/// The content of a single modification token
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    /// A mass shift
    Mass(f64),
    /// A non numeric token, the name of a modification
    Name(String),
    /// A single character modification symbol
    Symbol(char),
}

/// A modification token placed on a residue
#[derive(Clone, Debug, PartialEq)]
pub struct ModificationToken {
    /// 1 based location of the residue in the clean sequence
    pub position: usize,
    /// The value
    pub value: TokenValue,
}

/// A peptide string split in its residues and modification tokens
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenizedPeptide {
    /// The residues (uppercase)
    pub clean_sequence: String,
    /// All modification tokens in order of appearance
    pub tokens: Vec<ModificationToken>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Idle,
    AccumulatingMass { start: usize, seen_digit: bool },
    AccumulatingBracket { start: usize, depth: usize },
}

/// Split a peptide with modifications into the clean sequence and the modification tokens.
/// Any modification is placed on the last seen residue, or when inside (or directly after) a
/// parenthesized group on the first residue of that group. Modifications before the first residue
/// are placed on location 1. Characters that are not understood are ignored. The `is_symbol`
/// function determines which characters are modification symbols.
pub fn tokenize_peptide(
    peptide: &str,
    dialect: ModificationDialect,
    is_symbol: impl Fn(char) -> bool,
) -> TokenizedPeptide {
    let mut result = TokenizedPeptide::default();
    let mut state = State::Idle;
    // The first residue of the currently open (or just closed) group
    let mut group: Option<Option<usize>> = None;
    let mut group_open = false;

    let anchor = |result: &TokenizedPeptide, group: Option<Option<usize>>| {
        group
            .flatten()
            .unwrap_or_else(|| result.clean_sequence.len().max(1))
    };

    for (index, ch) in peptide.char_indices() {
        // Finish or continue the current accumulation
        match state {
            State::AccumulatingBracket { start, depth } => {
                if ch == '[' {
                    state = State::AccumulatingBracket {
                        start,
                        depth: depth + 1,
                    };
                } else if ch == ']' {
                    if depth == 1 {
                        let position = anchor(&result, group);
                        push_token(&mut result, position, &peptide[start..index]);
                        state = State::Idle;
                    } else {
                        state = State::AccumulatingBracket {
                            start,
                            depth: depth - 1,
                        };
                    }
                }
                continue;
            }
            State::AccumulatingMass { start, seen_digit } => {
                if ch.is_ascii_digit() {
                    state = State::AccumulatingMass {
                        start,
                        seen_digit: true,
                    };
                    continue;
                } else if ch == '.' {
                    continue;
                } else if (ch == '+' || ch == '-') && !seen_digit && index == start + 1 {
                    // A double sign, keep the last one
                    state = State::AccumulatingMass {
                        start: index,
                        seen_digit: false,
                    };
                    continue;
                }
                let position = anchor(&result, group);
                push_token(&mut result, position, &peptide[start..index]);
                state = State::Idle;
            }
            State::Idle => (),
        }

        // Idle, handle the character
        match ch {
            c if c.is_ascii_alphabetic() => {
                result.clean_sequence.push(c.to_ascii_uppercase());
                if group_open {
                    if group == Some(None) {
                        group = Some(Some(result.clean_sequence.len()));
                    }
                } else {
                    group = None;
                }
            }
            '+' | '-' if dialect.unwrapped_masses => {
                state = State::AccumulatingMass {
                    start: index,
                    seen_digit: false,
                };
            }
            c if c.is_ascii_digit() && dialect.unwrapped_masses => {
                state = State::AccumulatingMass {
                    start: index,
                    seen_digit: true,
                };
            }
            '[' if dialect.bracketed => {
                state = State::AccumulatingBracket {
                    start: index + 1,
                    depth: 1,
                };
            }
            '(' if dialect.ambiguous_groups => {
                group = Some(None);
                group_open = true;
            }
            ')' if dialect.ambiguous_groups => group_open = false,
            c if is_symbol(c) => {
                let position = anchor(&result, group);
                result.tokens.push(ModificationToken {
                    position,
                    value: TokenValue::Symbol(c),
                });
            }
            _ => (), // Ignore
        }
    }

    // Recover a trailing open token
    match state {
        State::AccumulatingMass { start, .. } | State::AccumulatingBracket { start, .. } => {
            let position = anchor(&result, group);
            push_token(&mut result, position, &peptide[start..]);
        }
        State::Idle => (),
    }
    result
}

fn push_token(result: &mut TokenizedPeptide, position: usize, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let value = text.parse::<f64>().map_or_else(
        |_| TokenValue::Name(text.to_string()),
        |mass| {
            if mass.is_finite() {
                TokenValue::Mass(mass)
            } else {
                TokenValue::Name(text.to_string())
            }
        },
    );
    result.tokens.push(ModificationToken { position, value });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;

    fn masses(tokenized: &TokenizedPeptide) -> Vec<(usize, f64)> {
        tokenized
            .tokens
            .iter()
            .filter_map(|t| match t.value {
                TokenValue::Mass(m) => Some((t.position, m)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn unwrapped() {
        let tokenized = tokenize_peptide("M+15.9949PEPTIDE", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(tokenized.clean_sequence, "MPEPTIDE");
        assert_eq!(masses(&tokenized), vec![(1, 15.9949)]);
        let tokenized = tokenize_peptide("PEPT+79.966IDE-18.011", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(tokenized.clean_sequence, "PEPTIDE");
        assert_eq!(masses(&tokenized), vec![(4, 79.966), (7, -18.011)]);
    }

    #[test]
    fn unwrapped_adjacent_masses() {
        let tokenized = tokenize_peptide("K+14.016-0.984AR", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(tokenized.clean_sequence, "KAR");
        assert_eq!(masses(&tokenized), vec![(1, 14.016), (1, -0.984)]);
    }

    #[test]
    fn n_terminal() {
        let tokenized = tokenize_peptide("+42.011PEPTIDE", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(masses(&tokenized), vec![(1, 42.011)]);
        let tokenized = tokenize_peptide("[Acetyl]PEPTIDE", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(
            tokenized.tokens,
            vec![ModificationToken {
                position: 1,
                value: TokenValue::Name("Acetyl".to_string())
            }]
        );
    }

    #[test]
    fn bracketed() {
        let tokenized = tokenize_peptide(
            "PEM[Oxidation]PC[57.021]IDE",
            ModificationDialect::BRACKETED,
            |_| false,
        );
        assert_eq!(tokenized.clean_sequence, "PEMPCIDE");
        assert_eq!(
            tokenized.tokens,
            vec![
                ModificationToken {
                    position: 3,
                    value: TokenValue::Name("Oxidation".to_string())
                },
                ModificationToken {
                    position: 5,
                    value: TokenValue::Mass(57.021)
                }
            ]
        );
    }

    #[test]
    fn nested_brackets() {
        let tokenized = tokenize_peptide("AK[Label[13C]]R", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(tokenized.clean_sequence, "AKR");
        assert_eq!(
            tokenized.tokens[0],
            ModificationToken {
                position: 2,
                value: TokenValue::Name("Label[13C]".to_string())
            }
        );
    }

    #[test]
    fn ambiguous_group() {
        let tokenized = tokenize_peptide("AC(STY)[79.966]KR", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(tokenized.clean_sequence, "ACSTYKR");
        assert_eq!(masses(&tokenized), vec![(3, 79.966)]);
        let tokenized = tokenize_peptide("A(S[79.966]TY)KR", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(masses(&tokenized), vec![(2, 79.966)]);
        let tokenized = tokenize_peptide("A(STY[79.966])K[14.016]R", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(masses(&tokenized), vec![(2, 79.966), (5, 14.016)]);
    }

    #[test]
    fn symbols() {
        let tokenized = tokenize_peptide("PEM*PT#IDE", ModificationDialect::UNWRAPPED, |c| {
            c == '*' || c == '#'
        });
        assert_eq!(tokenized.clean_sequence, "PEMPTIDE");
        assert_eq!(
            tokenized.tokens,
            vec![
                ModificationToken {
                    position: 3,
                    value: TokenValue::Symbol('*')
                },
                ModificationToken {
                    position: 5,
                    value: TokenValue::Symbol('#')
                }
            ]
        );
    }

    #[test]
    fn lenient() {
        let tokenized = tokenize_peptide("PE_P%TI DE", ModificationDialect::ALL, |_| false);
        assert_eq!(tokenized.clean_sequence, "PEPTIDE");
        assert!(tokenized.tokens.is_empty());
        let tokenized = tokenize_peptide("PEPTIDE+15.99", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(masses(&tokenized), vec![(7, 15.99)]);
        let tokenized = tokenize_peptide("PEPTIDE[15.99", ModificationDialect::BRACKETED, |_| false);
        assert_eq!(masses(&tokenized), vec![(7, 15.99)]);
        let tokenized = tokenize_peptide("PEPTIDE+", ModificationDialect::UNWRAPPED, |_| false);
        assert_eq!(
            tokenized.tokens,
            vec![ModificationToken {
                position: 7,
                value: TokenValue::Name("+".to_string())
            }]
        );
    }
}
