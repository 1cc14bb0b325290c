//! Song selection expressions
//!
//! A selection is `all`, `none`, or a comma-separated list of 1-based
//! positions and inclusive ranges such as `1-3,5`. Positions refer to the
//! order songs were listed in.

use std::collections::BTreeSet;

/// One comma-separated part of a selection expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPart {
    /// A single 1-based position
    Single(usize),

    /// An inclusive 1-based range
    Range(usize, usize),
}

/// A parsed selection expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Nothing,
    Parts(Vec<SelectionPart>),
}

impl Selection {
    /// Parses a selection expression
    ///
    /// Malformed expressions select everything rather than failing.
    ///
    /// # Examples
    ///
    /// ```
    /// use lyric_miner::crawler::{Selection, SelectionPart};
    ///
    /// assert_eq!(Selection::parse(" ALL "), Selection::All);
    /// assert_eq!(Selection::parse("none"), Selection::Nothing);
    /// assert_eq!(
    ///     Selection::parse("1-3,5"),
    ///     Selection::Parts(vec![SelectionPart::Range(1, 3), SelectionPart::Single(5)])
    /// );
    /// assert_eq!(Selection::parse("1-x"), Selection::All);
    /// ```
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim().to_lowercase();
        match expr.as_str() {
            "all" => return Self::All,
            "none" => return Self::Nothing,
            _ => {}
        }

        match parse_parts(&expr) {
            Some(parts) => Self::Parts(parts),
            None => {
                tracing::warn!("Invalid selection '{}'. Processing all songs.", expr);
                Self::All
            }
        }
    }

    /// Applies the selection to a song list
    ///
    /// Ranges are clamped to the list and single positions outside it are
    /// skipped. The result keeps listing order and holds each song once,
    /// however the parts were written.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        match self {
            Self::All => items.to_vec(),
            Self::Nothing => Vec::new(),
            Self::Parts(parts) => {
                let mut positions = BTreeSet::new();
                for part in parts {
                    match *part {
                        SelectionPart::Single(position) => {
                            if (1..=items.len()).contains(&position) {
                                positions.insert(position - 1);
                            }
                        }
                        SelectionPart::Range(start, end) => {
                            let from = start.saturating_sub(1).min(items.len());
                            let to = end.min(items.len());
                            positions.extend(from..to);
                        }
                    }
                }
                positions.into_iter().map(|i| items[i].clone()).collect()
            }
        }
    }
}

fn parse_parts(expr: &str) -> Option<Vec<SelectionPart>> {
    expr.split(',').map(|part| parse_part(part.trim())).collect()
}

fn parse_part(part: &str) -> Option<SelectionPart> {
    if part.contains('-') {
        let bounds: Vec<&str> = part.split('-').collect();
        if bounds.len() != 2 {
            return None;
        }
        let start = bounds[0].trim().parse().ok()?;
        let end = bounds[1].trim().parse().ok()?;
        Some(SelectionPart::Range(start, end))
    } else {
        part.parse().ok().map(SelectionPart::Single)
    }
}

/// Source of a selection expression when none was given up front
pub trait SelectionPrompt {
    /// Asks for a selection over `items`, returning the raw expression
    fn ask(&mut self, items: &[String]) -> String;
}

/// Always answers with the same expression
#[derive(Debug, Clone)]
pub struct FixedSelection(pub String);

impl SelectionPrompt for FixedSelection {
    fn ask(&mut self, _items: &[String]) -> String {
        self.0.clone()
    }
}
