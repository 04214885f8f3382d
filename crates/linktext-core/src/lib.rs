mod config;
mod diagnostic;
mod index;
mod normalize;
mod rule;
mod source_map;
mod span;
mod syntax;

pub use config::{BannedPhrases, ConfigError, DEFAULT_LINK_TEXTS, LintConfig, RuleConfig};
pub use diagnostic::{CONTEXT_MAX_CHARS, Diagnostic, DiagnosticSeverity, ellipsize};
pub use index::TypeIndex;
pub use normalize::{is_normalized, normalize};
pub use rule::{
    ColumnRange, DESCRIPTIVE_LINK_TEXT, Finding, FindingSink, RuleInfo, check, check_document,
    find_non_descriptive_links,
};
pub use source_map::{Position, SourceMap};
pub use span::{Span, SpanError};
pub use syntax::{LABEL, LABEL_TEXT, LINK, Node, NodeId, SyntaxTree, TreeBuilder, TreeError};
