//! Documentation written into the working tree by `tribal init`

pub const TRIBAL_MD_FILE: &str = "TRIBAL.md";
pub const CLAUDE_MD_FILE: &str = "CLAUDE.md";

pub const TRIBAL_MD: &str = r#"# Tribal Framework

This repository uses the Tribal framework for graph-based development.

## Overview

Tribal is a framework for organizing and managing development work through graph structures.
Each graph represents a specific feature, component, or concept within the codebase.

## Usage

- Use 'tribal checkout -g "<graph title>"' to create or retrieve a graph
- Use 'tribal search --context "<description>"' to find related graphs
- Use 'tribal add -A' to stage your graph changes
- Use 'tribal commit -m "<message>"' to commit your graph
- Use 'tribal push' to push changes to the remote
- Use 'tribal status' to see where the repository stands

## Graph Structure

Graphs consist of nodes and edges that represent relationships between code components,
features, or concepts. Each node can contain markup for documentation and context.
"#;

pub const CLAUDE_MD_NOTICE: &str = "This repository is developed using the TRIBAL framework. \
Whenever planning or making changes to the codebase, be sure to first consult TRIBAL.md \
in the root repository for reference.\n\n";

/// New CLAUDE.md content: the notice followed by any existing content.
/// Existing content that already starts with the notice is returned as is.
pub fn claude_md_with_notice(existing: Option<&str>) -> String {
    match existing {
        Some(content) if content.starts_with(CLAUDE_MD_NOTICE) => content.to_string(),
        Some(content) => format!("{}{}", CLAUDE_MD_NOTICE, content),
        None => CLAUDE_MD_NOTICE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_is_prepended_once() {
        let fresh = claude_md_with_notice(None);
        assert_eq!(fresh, CLAUDE_MD_NOTICE);

        let with_existing = claude_md_with_notice(Some("# Project notes\n"));
        assert!(with_existing.starts_with(CLAUDE_MD_NOTICE));
        assert!(with_existing.ends_with("# Project notes\n"));

        assert_eq!(claude_md_with_notice(Some(&with_existing)), with_existing);
    }
}
