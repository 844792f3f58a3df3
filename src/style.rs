//! Style transplantation: re-home `<style>` blocks from ingested content.
//!
//! Authors write `body { ... }` or `html { ... }` expecting page-wide scope.
//! Inside the shadow root the equivalent scope is the host element, so
//! top-level style-rule selectors have those keywords replaced with the host
//! selector before the rules are re-injected.
//!
//! The replacement is a literal, case-sensitive substring substitution on the
//! selector text, not a selector-aware rewrite: `.body-copy` becomes
//! `.:host-copy`. Nested rules inside at-rules are not rewritten.
//!
//! Selectors are otherwise unvalidated, except that a style rule whose
//! prelude holds an unmatched `}`, `)` or `]` is dropped.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

use crate::dom::Node;

const ROOT_KEYWORDS: [&str; 2] = ["body", "html"];

/// A single top-level rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    /// A qualified rule: selector list plus declaration block.
    Style {
        /// Selector text with whitespace runs collapsed.
        selector: String,
        /// Declarations in source order.
        declarations: Vec<Declaration>,
    },
    /// An at-rule, kept as its original source text.
    At {
        /// Keyword without the leading `@`.
        name: String,
        /// The whole rule as written.
        text: String,
    },
}

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// ASCII-lowercased property name.
    pub property: String,
    /// Value text, including any `!important`.
    pub value: String,
}

/// The rules parsed from one `<style>` block.
///
/// # Examples
///
/// ```
/// use content_view::style::RuleSet;
///
/// let mut rules = RuleSet::parse("body { color: red; } p{margin:0}");
/// rules.rewrite_root_selectors(":host");
/// assert_eq!(rules.to_css_text(), ":host { color: red; } p { margin: 0; }");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CssRule>,
}

impl RuleSet {
    /// Parses style sheet text.
    ///
    /// Parsing never fails: rules with an empty selector or an unmatched
    /// closing bracket in the selector are dropped, as are `@import` and
    /// `@charset`, which a constructed style sheet ignores. Malformed
    /// declarations are skipped.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        while let Some(raw) = next_raw_rule(&mut parser) {
            if let Some(rule) = raw.into_rule() {
                rules.push(rule);
            }
        }

        Self { rules }
    }

    /// Rules in source order.
    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Number of rules kept.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule survived parsing.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replaces `body` and `html` in every style-rule selector with
    /// `host_selector`. Returns the number of selectors changed.
    pub fn rewrite_root_selectors(&mut self, host_selector: &str) -> usize {
        let mut changed = 0;
        for rule in &mut self.rules {
            if let CssRule::Style { selector, .. } = rule {
                let rewritten = replace_root_keywords(selector, host_selector);
                if rewritten != *selector {
                    *selector = rewritten;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Serializes the rules, separated by a single space.
    pub fn to_css_text(&self) -> String {
        self.rules
            .iter()
            .map(CssRule::to_css_text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CssRule {
    /// Serializes the rule. Style rules are normalized to
    /// `selector { property: value; ... }`.
    pub fn to_css_text(&self) -> String {
        match self {
            CssRule::Style {
                selector,
                declarations,
            } => {
                if declarations.is_empty() {
                    return format!("{} {{ }}", selector);
                }
                let body = declarations
                    .iter()
                    .map(|d| format!("{}: {};", d.property, d.value))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{} {{ {} }}", selector, body)
            }
            CssRule::At { text, .. } => text.clone(),
        }
    }
}

/// Detaches every `<style>` element from `doc` and returns its rules with
/// root selectors rewritten to `host_selector`, in document order.
///
/// The original elements are discarded; callers inject fresh elements built
/// from the returned rule sets.
pub fn extract_styles(doc: &mut Node, host_selector: &str) -> Vec<RuleSet> {
    let mut sheets = Vec::new();
    doc.walk_tree(&mut |node| {
        if is_style(node) {
            sheets.push(node.text_content());
        }
    });
    doc.remove_descendants(&mut is_style);

    sheets
        .iter()
        .map(|css| {
            let mut rules = RuleSet::parse(css);
            rules.rewrite_root_selectors(host_selector);
            rules
        })
        .collect()
}

fn is_style(node: &Node) -> bool {
    node.tag_name()
        .is_some_and(|tag| tag.eq_ignore_ascii_case("style"))
}

/// Substitutes every occurrence of a root keyword in `selector`.
pub fn replace_root_keywords(selector: &str, host_selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;
    while !rest.is_empty() {
        match ROOT_KEYWORDS.iter().find(|kw| rest.starts_with(**kw)) {
            Some(kw) => {
                out.push_str(host_selector);
                rest = &rest[kw.len()..];
            }
            None => {
                let Some(c) = rest.chars().next() else { break };
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

struct RawRule {
    at_keyword: Option<String>,
    prelude: String,
    valid_prelude: bool,
    block: Option<String>,
    source: String,
}

impl RawRule {
    fn into_rule(self) -> Option<CssRule> {
        match self.at_keyword {
            Some(name) => {
                if name.eq_ignore_ascii_case("import") || name.eq_ignore_ascii_case("charset") {
                    tracing::warn!(at_rule = %name, "dropping at-rule from transplanted style");
                    return None;
                }
                Some(CssRule::At {
                    name,
                    text: self.source,
                })
            }
            None if !self.valid_prelude => {
                tracing::debug!(prelude = %self.prelude, "dropping style rule with invalid selector");
                None
            }
            None => {
                let selector = collapse_whitespace(&self.prelude);
                if selector.is_empty() {
                    return None;
                }
                let declarations = self
                    .block
                    .as_deref()
                    .map(parse_declarations)
                    .unwrap_or_default();
                Some(CssRule::Style {
                    selector,
                    declarations,
                })
            }
        }
    }
}

/// Reads the next top-level rule, or `None` once the input is exhausted.
fn next_raw_rule(parser: &mut Parser<'_, '_>) -> Option<RawRule> {
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            return None;
        }

        let start = parser.position();
        let mut at_keyword = None;
        let mut valid_prelude = true;
        let mut first = true;

        loop {
            let before = parser.position();
            let token = match parser.next() {
                Ok(token) => token.clone(),
                // Trailing prelude with no block: discard it.
                Err(_) => return None,
            };

            if first {
                first = false;
                match &token {
                    Token::CDO | Token::CDC => break,
                    Token::AtKeyword(name) => at_keyword = Some(name.to_string()),
                    _ => {}
                }
            }

            match token {
                Token::CurlyBracketBlock => {
                    let prelude = parser.slice(start..before).to_string();
                    let block = parser.parse_nested_block(consume_block_text).ok();
                    let source = parser.slice_from(start).trim().to_string();
                    return Some(RawRule {
                        at_keyword,
                        prelude,
                        valid_prelude,
                        block,
                        source,
                    });
                }
                Token::Semicolon if at_keyword.is_some() => {
                    let prelude = parser.slice(start..before).to_string();
                    let source = parser.slice_from(start).trim().to_string();
                    return Some(RawRule {
                        at_keyword,
                        prelude,
                        valid_prelude,
                        block: None,
                        source,
                    });
                }
                Token::CloseCurlyBracket
                | Token::CloseParenthesis
                | Token::CloseSquareBracket => valid_prelude = false,
                _ => {}
            }
        }
    }
}

fn consume_block_text<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<String, ParseError<'i, ()>> {
    let start = parser.position();
    while parser.next_including_whitespace_and_comments().is_ok() {}
    Ok(parser.slice_from(start).to_string())
}

fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(block);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    while !parser.is_exhausted() {
        if let Ok(declaration) = parser.parse_until_after(Delimiter::Semicolon, parse_declaration) {
            declarations.push(declaration);
        }
    }
    declarations
}

fn parse_declaration<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<Declaration, ParseError<'i, ()>> {
    let property = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;
    parser.skip_whitespace();
    let start = parser.position();
    while parser.next().is_ok() {}
    let value = collapse_whitespace(parser.slice_from(start));
    if value.is_empty() {
        return Err(parser.new_custom_error(()));
    }
    Ok(Declaration { property, value })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
