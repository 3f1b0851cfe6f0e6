use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification label for a single commit.
///
/// # Examples
///
/// ```
/// use commitlens_core::Label;
///
/// let label: Label = serde_json::from_str("\"major\"").unwrap();
/// assert_eq!(label, Label::Major);
/// assert_eq!(label.to_string(), "major");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Structurally significant change: new public surface or control flow.
    Major,
    /// Cosmetic or incremental change.
    Minor,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Major => write!(f, "major"),
            Label::Minor => write!(f, "minor"),
        }
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Label::Major),
            "minor" => Ok(Label::Minor),
            other => Err(format!("unknown label: {other}")),
        }
    }
}

/// The classifier's verdict for one commit.
///
/// `reasons` holds one short string per triggered rule, in fixed
/// rule-evaluation order.
///
/// # Examples
///
/// ```
/// use commitlens_core::{Classification, Label};
///
/// let c = Classification {
///     label: Label::Major,
///     score: 5,
///     reasons: vec!["Public API changed".into(), "New functions introduced".into()],
/// };
/// assert_eq!(c.label, Label::Major);
/// assert_eq!(c.reasons.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Major or minor verdict.
    pub label: Label,
    /// Accumulated rule weight.
    pub score: u32,
    /// One entry per triggered rule, in rule order.
    pub reasons: Vec<String>,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use commitlens_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_str() {
        assert_eq!("major".parse::<Label>().unwrap(), Label::Major);
        assert_eq!("MINOR".parse::<Label>().unwrap(), Label::Minor);
        assert!("huge".parse::<Label>().is_err());
    }

    #[test]
    fn label_roundtrips_through_json() {
        let json = serde_json::to_string(&Label::Major).unwrap();
        assert_eq!(json, "\"major\"");

        let parsed: Label = serde_json::from_str("\"minor\"").unwrap();
        assert_eq!(parsed, Label::Minor);
    }

    #[test]
    fn classification_serializes_camel_case() {
        let c = Classification {
            label: Label::Minor,
            score: 1,
            reasons: vec!["Large code change".into()],
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["label"], "minor");
        assert_eq!(json["score"], 1);
        assert_eq!(json["reasons"][0], "Large code change");
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
