use commitlens_astlens::StructuralSignal;
use serde::{Deserialize, Serialize};

/// Signed per-field change of a structural signal between two snapshots.
///
/// Created and deleted files are one-sided deltas: creation reports the
/// after-signal verbatim, deletion reports the negated before-signal.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::StructuralSignal;
/// use commitlens_classify::delta::{reduce, StructuralDelta};
///
/// let created = StructuralSignal { functions: 2, exports: 1, classes: 0, branches: 1 };
/// let delta = reduce(None, Some(created));
/// assert_eq!(delta, StructuralDelta { functions: 2, exports: 1, classes: 0, branches: 1 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralDelta {
    /// Change in named function declarations.
    pub functions: i64,
    /// Change in export declarations.
    pub exports: i64,
    /// Change in class declarations.
    pub classes: i64,
    /// Change in branch constructs.
    pub branches: i64,
}

/// Reduce a (before, after) pair of structural signals to one delta.
///
/// Both present → per-field `after − before`; only after present (file
/// created) → after verbatim; only before present (file deleted) → negated
/// before; neither present → all zero.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::StructuralSignal;
/// use commitlens_classify::delta::{reduce, StructuralDelta};
///
/// let before = StructuralSignal { functions: 3, exports: 2, classes: 1, branches: 4 };
/// let after = StructuralSignal { functions: 4, exports: 2, classes: 0, branches: 6 };
/// let delta = reduce(Some(before), Some(after));
/// assert_eq!(delta, StructuralDelta { functions: 1, exports: 0, classes: -1, branches: 2 });
/// ```
pub fn reduce(before: Option<StructuralSignal>, after: Option<StructuralSignal>) -> StructuralDelta {
    match (before, after) {
        (Some(b), Some(a)) => StructuralDelta {
            functions: diff(b.functions, a.functions),
            exports: diff(b.exports, a.exports),
            classes: diff(b.classes, a.classes),
            branches: diff(b.branches, a.branches),
        },
        (None, Some(a)) => StructuralDelta {
            functions: a.functions.into(),
            exports: a.exports.into(),
            classes: a.classes.into(),
            branches: a.branches.into(),
        },
        (Some(b), None) => StructuralDelta {
            functions: -i64::from(b.functions),
            exports: -i64::from(b.exports),
            classes: -i64::from(b.classes),
            branches: -i64::from(b.branches),
        },
        (None, None) => StructuralDelta::default(),
    }
}

fn diff(before: u32, after: u32) -> i64 {
    i64::from(after) - i64::from(before)
}
