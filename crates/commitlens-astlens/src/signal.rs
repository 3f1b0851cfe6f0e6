use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser};

/// Counts of four syntax-tree construct categories for one file snapshot.
///
/// All fields are non-negative; an all-zero signal means the file exists
/// but is structurally empty, which is distinct from the file being absent.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::StructuralSignal;
///
/// let signal = StructuralSignal {
///     functions: 2,
///     exports: 1,
///     classes: 0,
///     branches: 1,
/// };
/// assert_eq!(signal.functions, 2);
/// assert_ne!(signal, StructuralSignal::default());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSignal {
    /// Named function declarations, top-level or nested.
    pub functions: u32,
    /// Named or default export declarations.
    pub exports: u32,
    /// Class declarations.
    pub classes: u32,
    /// Conditional (`if`) and multi-way (`switch`) constructs.
    pub branches: u32,
}

/// Source dialect, chosen from the file extension.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::Dialect;
///
/// assert_eq!(Dialect::from_extension("ts"), Some(Dialect::TypeScript));
/// assert_eq!(Dialect::from_extension("tsx"), Some(Dialect::Tsx));
/// assert_eq!(Dialect::from_extension("mjs"), Some(Dialect::JavaScript));
/// assert_eq!(Dialect::from_extension("py"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain TypeScript: typed annotations, decorators, modern operators.
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
    /// JavaScript; the grammar natively covers JSX.
    JavaScript,
}

impl Dialect {
    /// Detect the dialect from a file extension string (without the dot).
    ///
    /// Returns `None` for extensions outside the JS/TS family.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            _ => None,
        }
    }

    /// Get the tree-sitter grammar for this dialect.
    fn grammar(self) -> tree_sitter::Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

/// Outcome of one parse attempt.
///
/// `Failed` covers syntax errors, unloadable grammars, and oversized or
/// non-source input; downstream it maps to the zero signal so a commit
/// touching an unparseable file is still classifiable from line-level
/// signals alone.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::{ParseOutcome, StructuralSignal};
///
/// let failed = ParseOutcome::Failed;
/// assert_eq!(failed.signal(), StructuralSignal::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The snapshot parsed cleanly; its structural counts follow.
    Parsed(StructuralSignal),
    /// The snapshot could not be parsed; treat as the zero signal.
    Failed,
}

impl ParseOutcome {
    /// The signal to use downstream: the parsed counts, or zero on failure.
    pub fn signal(self) -> StructuralSignal {
        match self {
            ParseOutcome::Parsed(signal) => signal,
            ParseOutcome::Failed => StructuralSignal::default(),
        }
    }
}

/// Extract the structural signal from one snapshot of source text.
///
/// The whole tree is traversed once, counting:
/// - `functions`: `function_declaration`, `generator_function_declaration`
/// - `exports`: `export_statement` (named and default)
/// - `classes`: `class_declaration`
/// - `branches`: `if_statement`, `switch_statement`
///
/// A tree whose root contains syntax errors counts as a failed parse — the
/// policy is "unparseable snapshot ⇒ zero signal", not partial credit.
///
/// # Examples
///
/// ```
/// use commitlens_astlens::{extract_signal, Dialect, ParseOutcome, StructuralSignal};
///
/// let source = "export function greet(name: string) { if (!name) { return; } }";
/// let outcome = extract_signal(source, Dialect::TypeScript);
/// assert_eq!(
///     outcome,
///     ParseOutcome::Parsed(StructuralSignal {
///         functions: 1,
///         exports: 1,
///         classes: 0,
///         branches: 1,
///     })
/// );
///
/// let broken = extract_signal("function (((", Dialect::TypeScript);
/// assert_eq!(broken, ParseOutcome::Failed);
/// ```
pub fn extract_signal(source: &str, dialect: Dialect) -> ParseOutcome {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&dialect.grammar()) {
        log::warn!("failed to load {dialect:?} grammar: {e}");
        return ParseOutcome::Failed;
    }

    let Some(tree) = parser.parse(source, None) else {
        return ParseOutcome::Failed;
    };

    let root = tree.root_node();
    if root.has_error() {
        return ParseOutcome::Failed;
    }

    let mut signal = StructuralSignal::default();
    count_nodes(root, &mut signal);
    ParseOutcome::Parsed(signal)
}

fn count_nodes(node: Node, signal: &mut StructuralSignal) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => signal.functions += 1,
        "export_statement" => signal.exports += 1,
        "class_declaration" => signal.classes += 1,
        "if_statement" | "switch_statement" => signal.branches += 1,
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count_nodes(child, signal);
    }
}
