//! Reflow of raw scraped lyric fragments into one clean lyrics block.
//!
//! HTML extraction yields one fragment per visual line break, which splits
//! logical lines apart: a parenthetical aside lands on its own line, a comma
//! starts a new line, a stanza loses the blank line before its `[Chorus]` tag.
//! [`normalize`] repairs this with an ordered list of [`MergeRule`]s that
//! only ever join adjacent lines, then restores section spacing.
//!
//! Normalizing already-normalized text is a no-op.

/// Characters that make up a "punctuation only" line.
const PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', '…'];

/// A rule deciding whether two adjacent lines belong together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// `"oh ("` + `"yeah)"`
    OpenParenJoinsNext,
    /// `"(oh yeah"` + `")"`, also `]`
    ClosingBracketJoinsPrevious,
    /// `"I said "` + `"hello"`
    TrailingSpaceJoinsNext,
    /// `"I said"` + `" hello"`
    LeadingSpaceJoinsPrevious,
    /// `"hello"` + `", goodbye"` or `"hello"` + `"!"`
    PunctuationJoinsPrevious,
    /// `"'"` + `"Cause I"`
    ApostropheJoinsNext,
}

/// Merge rules in the order they are consulted.
pub const MERGE_RULES: &[MergeRule] = &[
    MergeRule::OpenParenJoinsNext,
    MergeRule::ClosingBracketJoinsPrevious,
    MergeRule::TrailingSpaceJoinsNext,
    MergeRule::LeadingSpaceJoinsPrevious,
    MergeRule::PunctuationJoinsPrevious,
    MergeRule::ApostropheJoinsNext,
];

impl MergeRule {
    /// Whether this rule joins `current` onto the end of `previous`.
    pub fn applies(self, previous: &str, current: &str) -> bool {
        match self {
            Self::OpenParenJoinsNext => previous.ends_with('('),
            Self::ClosingBracketJoinsPrevious => current.starts_with([')', ']']),
            Self::TrailingSpaceJoinsNext => previous.ends_with(char::is_whitespace),
            Self::LeadingSpaceJoinsPrevious => current.starts_with(char::is_whitespace),
            Self::PunctuationJoinsPrevious => {
                current.starts_with(',') || current.chars().all(|c| PUNCTUATION.contains(&c))
            }
            Self::ApostropheJoinsNext => previous == "'",
        }
    }
}

/// Whether a line is a section tag such as `[Chorus]` or `[Verse 2: Artist]`.
pub fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// The first rule joining two adjacent lines, if any.
///
/// Empty lines and section headers never take part in a merge.
pub fn joining_rule(previous: &str, current: &str) -> Option<MergeRule> {
    if previous.is_empty()
        || current.is_empty()
        || is_section_header(previous)
        || is_section_header(current)
    {
        return None;
    }
    MERGE_RULES
        .iter()
        .copied()
        .find(|rule| rule.applies(previous, current))
}

/// Turn raw fragments into a newline-delimited lyrics block.
///
/// Fragments may themselves contain line breaks; they are split first.
pub fn normalize<S: AsRef<str>>(raw_lines: &[S]) -> String {
    let mut lines: Vec<String> = raw_lines
        .iter()
        .flat_map(|fragment| fragment.as_ref().split('\n'))
        .map(str::to_string)
        .collect();

    loop {
        let merged = merge_pass(&lines);
        if merged == lines {
            break;
        }
        lines = merged;
    }

    space_sections(lines).join("\n")
}

/// One left-to-right pass joining every adjacent pair a rule accepts.
fn merge_pass(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        match out.last_mut() {
            Some(previous) if joining_rule(previous, line).is_some() => {
                previous.push_str(line);
            }
            _ => out.push(line.clone()),
        }
    }
    out
}

/// Exactly one blank line before every section header that follows text,
/// no blank lines at either end.
fn space_sections(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && out.is_empty() {
            continue;
        }
        if is_section_header(&line) {
            while out.last().is_some_and(|l| l.is_empty()) {
                out.pop();
            }
            if !out.is_empty() {
                out.push(String::new());
            }
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}
