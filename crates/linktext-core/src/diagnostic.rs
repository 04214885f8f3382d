use serde::Serialize;

use crate::rule::{Finding, RuleInfo};

/// Longest context shown before it is cut with an ellipsis.
pub const CONTEXT_MAX_CHARS: usize = 30;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub line_number: usize,
    pub rule_names: &'static [&'static str],
    pub rule_description: &'static str,
    pub error_context: String,
    /// `(column, length)` of the flagged text.
    pub error_range: (usize, usize),
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    pub fn from_finding(rule: &RuleInfo, finding: &Finding) -> Self {
        Self {
            line_number: finding.line,
            rule_names: rule.names,
            rule_description: rule.description,
            error_context: ellipsize(&finding.text),
            error_range: (finding.range.column, finding.range.length),
            severity: DiagnosticSeverity::Warning,
        }
    }

    pub fn to_pretty(&self, path: &str) -> String {
        format!(
            "{}:{}:{} {} {} [Context: \"{}\"]",
            path,
            self.line_number,
            self.error_range.0,
            self.rule_names.join("/"),
            self.rule_description,
            self.error_context
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
}

pub fn ellipsize(text: &str) -> String {
    match text.char_indices().nth(CONTEXT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticSeverity, ellipsize};
    use crate::rule::{ColumnRange, DESCRIPTIVE_LINK_TEXT, Finding};

    #[test]
    fn long_context_is_cut() {
        assert_eq!(ellipsize("[here]"), "[here]");
        let exact = "a".repeat(30);
        assert_eq!(ellipsize(&exact), exact);
        let long = format!("{}é tail", "b".repeat(29));
        assert_eq!(ellipsize(&long), format!("{}é...", "b".repeat(29)));
    }

    #[test]
    fn pretty_output_names_rule_and_position() {
        let finding = Finding {
            line: 4,
            text: "[Click Here]".to_string(),
            range: ColumnRange {
                column: 8,
                length: 12,
            },
        };
        let diagnostic = Diagnostic::from_finding(&DESCRIPTIVE_LINK_TEXT, &finding);

        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(
            diagnostic.to_pretty("README.md"),
            "README.md:4:8 MD059/descriptive-link-text Link text should be descriptive [Context: \"[Click Here]\"]"
        );
    }

    #[test]
    fn json_output_uses_lint_result_keys() -> Result<(), serde_json::Error> {
        let finding = Finding {
            line: 1,
            text: "[more]".to_string(),
            range: ColumnRange {
                column: 2,
                length: 6,
            },
        };
        let value = serde_json::to_value(Diagnostic::from_finding(&DESCRIPTIVE_LINK_TEXT, &finding))?;
        assert_eq!(
            value,
            serde_json::json!({
                "lineNumber": 1,
                "ruleNames": ["MD059", "descriptive-link-text"],
                "ruleDescription": "Link text should be descriptive",
                "errorContext": "[more]",
                "errorRange": [2, 6],
                "severity": "warning"
            })
        );
        Ok(())
    }
}
