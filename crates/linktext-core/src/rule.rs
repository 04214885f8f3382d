use serde::Serialize;
use tracing::debug;

use crate::config::{BannedPhrases, RuleConfig};
use crate::index::TypeIndex;
use crate::normalize::normalize;
use crate::syntax::{LABEL, LABEL_TEXT, LINK, Node, SyntaxTree};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RuleInfo {
    pub names: &'static [&'static str],
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

impl RuleInfo {
    pub fn is_named(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }
}

pub const DESCRIPTIVE_LINK_TEXT: RuleInfo = RuleInfo {
    names: &["MD059", "descriptive-link-text"],
    description: "Link text should be descriptive",
    tags: &["links", "accessibility"],
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnRange {
    pub column: usize,
    pub length: usize,
}

/// One link whose text says nothing about its target.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Finding {
    pub line: usize,
    /// The label text exactly as written in the source.
    pub text: String,
    pub range: ColumnRange,
}

impl Finding {
    fn at(run: Node<'_>, text: &str) -> Self {
        Self {
            line: run.start_line(),
            text: text.to_string(),
            range: ColumnRange {
                column: run.start_column(),
                length: text.chars().count(),
            },
        }
    }
}

/// Receives findings as they are produced.
pub trait FindingSink {
    fn report(&mut self, finding: Finding);
}

impl<F: FnMut(Finding)> FindingSink for F {
    fn report(&mut self, finding: Finding) {
        self(finding)
    }
}

impl FindingSink for Vec<Finding> {
    fn report(&mut self, finding: Finding) {
        self.push(finding);
    }
}

/// Lazily yields a finding for every text run of a link label whose whole
/// label text normalizes to a banned phrase.
///
/// Labels outside links (reference definitions and the like) are ignored,
/// as are nodes with no usable parent or position.
pub fn find_non_descriptive_links<'a>(
    index: &'a TypeIndex<'a>,
    banned: &'a BannedPhrases,
) -> impl Iterator<Item = Finding> + 'a {
    index
        .query_by_types(&[LABEL])
        .into_iter()
        .filter(|label| label.parent().is_some_and(|parent| parent.kind() == LINK))
        .flat_map(move |label| {
            let mut runs = label
                .children()
                .filter(|child| child.kind() == LABEL_TEXT && child.start_line() > 0)
                .peekable();
            // The label is judged as a whole, so formatting splits still match.
            let flagged = runs.peek().is_some() && banned.contains(&normalize(label.text()));
            runs.filter(move |_| flagged)
                .map(move |run| Finding::at(run, label.text()))
        })
}

/// Reports every finding to `sink` and returns how many there were.
pub fn check(index: &TypeIndex<'_>, banned: &BannedPhrases, sink: &mut impl FindingSink) -> usize {
    let mut count = 0;
    for finding in find_non_descriptive_links(index, banned) {
        sink.report(finding);
        count += 1;
    }
    count
}

/// Resolves `config`, indexes `tree` and collects its findings.
pub fn check_document(tree: &SyntaxTree, config: &RuleConfig) -> Vec<Finding> {
    if !config.enabled {
        debug!("descriptive link text check disabled");
        return Vec::new();
    }
    let banned = config.banned_phrases();
    let index = TypeIndex::new(tree);
    let mut findings = Vec::new();
    let count = check(&index, &banned, &mut findings);
    debug!(nodes = tree.len(), phrases = banned.len(), findings = count, "checked link text");
    findings
}
