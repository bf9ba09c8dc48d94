//! CSS Selector parsing and matching
//!
//! This module implements selector parsing and matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), restricted to
//! the subset the cascade needs: elemental selectors, class and ID
//! selectors, presence/value attribute selectors, and the descendant
//! combinator with a single ancestor compound. Anything richer degrades to
//! a selector that never matches, so the rule's other selectors survive.

use marmot_common::warning::warn_once;
use marmot_dom::{DomTree, ElementData, NodeId};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `p`, `span`, `body`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.btn`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Examples: `#main`, `#header`, `#nav-bar`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    /// `[attr]` presence check, or `[attr=value]` exact-value check.
    ///
    /// Examples: `[href]`, `[type=text]`, `[data-theme="dark"]`
    Attribute {
        /// The attribute name.
        name: String,
        /// The required value; `None` for a bare presence check.
        value: Option<String>,
    },

    /// A selector feature outside the supported subset (pseudo-classes,
    /// pseudo-elements, sibling and child combinators). Matching always
    /// fails, but the selector still parses so sibling selectors in the
    /// same rule keep working.
    NeverMatch,
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            // "A type selector written in the style sheet as an identifier represents
            // an element in the document tree with the same qualified name as the identifier."
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            Self::Class(class_name) => element.classes().contains(class_name.as_str()),

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "An ID selector represents an element instance that has an identifier
            // that matches the identifier in the ID selector."
            Self::Id(id) => element.id().is_some_and(|el_id| el_id == id),

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            // "The universal selector...represents the qualified name of any element type."
            Self::Universal => true,

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            // "[att] Represents an element with the att attribute"
            // "[att=val] Represents an element with the att attribute whose
            // value is exactly 'val'."
            Self::Attribute { name, value } => match value {
                None => element.attr(name).is_some(),
                Some(expected) => element.attr(name).is_some_and(|v| v == expected),
            },

            Self::NeverMatch => false,
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Check if every simple selector in this compound matches the element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(element))
    }
}

/// A parsed CSS selector ready for matching.
///
/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "The elements represented by a complex selector are the elements matched
/// by the last compound selector in the complex selector." One descendant
/// step is supported: `A B` matches a `B` element with some `A` ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,
    /// The ancestor compound for a descendant selector, if any.
    ///
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    pub ancestor: Option<CompoundSelector>,
}

impl ParsedSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    /// "count the number of ID selectors in the selector (= A)
    ///  count the number of class selectors, attributes selectors, and
    ///  pseudo-classes in the selector (= B)
    ///  count the number of type selectors and pseudo-elements in the
    ///  selector (= C)"
    ///
    /// The three counts collapse into a single ordinal: 100 per ID, 10 per
    /// class or attribute selector, 1 per type selector. Universal and
    /// never-matching parts contribute nothing.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        let mut spec = compound_specificity(&self.subject);
        if let Some(ancestor) = &self.ancestor {
            spec += compound_specificity(ancestor);
        }
        spec
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    /// "A selector is said to match an element when..."
    ///
    /// Match this selector against an element with full DOM tree context,
    /// so the descendant step can walk the ancestor chain.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        let Some(element) = tree.as_element(node_id) else {
            return false;
        };

        // The subject (rightmost compound) must match the element itself
        if !self.subject.matches(element) {
            return false;
        }

        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "an element B that is an arbitrary descendant of some ancestor
        // element A" — any matching ancestor satisfies the step.
        match &self.ancestor {
            None => true,
            Some(ancestor) => tree.ancestors(node_id).any(|ancestor_id| {
                tree.as_element(ancestor_id)
                    .is_some_and(|e| ancestor.matches(e))
            }),
        }
    }
}

/// Sum the specificity contributions of one compound selector.
fn compound_specificity(compound: &CompoundSelector) -> u32 {
    let mut spec = 0u32;
    for simple in &compound.simple_selectors {
        match simple {
            SimpleSelector::Id(_) => spec += 100,
            SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => spec += 10,
            SimpleSelector::Type(_) => spec += 1,
            // "ignore the universal selector"
            SimpleSelector::Universal | SimpleSelector::NeverMatch => {}
        }
    }
    spec
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Collect an identifier from the character stream into `out`.
fn collect_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(&ch) = chars.peek() {
        if is_ident_char(ch) {
            out.push(ch);
            let _ = chars.next();
        } else {
            break;
        }
    }
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
fn parse_attr_value(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next(); // consume opening quote
            let mut val = String::new();
            for ch in chars.by_ref() {
                if ch == q {
                    return Some(val);
                }
                val.push(ch);
            }
            None // unterminated string
        }
        Some(_) => {
            let mut val = String::new();
            while chars
                .peek()
                .is_some_and(|&ch| is_ident_char(ch) || ch == '.')
            {
                if let Some(ch) = chars.next() {
                    val.push(ch);
                }
            }
            if val.is_empty() { None } else { Some(val) }
        }
        None => None,
    }
}

/// Parse one compound selector (no combinators) from the character stream.
///
/// Returns `None` when nothing parseable remains; a compound containing
/// `NeverMatch` when an unsupported feature appears (the parse still
/// consumes the feature so following selectors in the list are unaffected).
fn parse_compound(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<CompoundSelector> {
    let mut simple_selectors = Vec::new();

    loop {
        match chars.peek() {
            None => break,
            Some(&c) if c.is_ascii_whitespace() => break,
            Some(&('>' | '+' | '~')) => break,

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            Some('*') => {
                let _ = chars.next();
                simple_selectors.push(SimpleSelector::Universal);
            }

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            // "The class selector is given as a full stop (. U+002E)
            // immediately followed by an identifier."
            Some('.') => {
                let _ = chars.next();
                let mut name = String::new();
                collect_ident(chars, &mut name);
                if name.is_empty() {
                    simple_selectors.push(SimpleSelector::NeverMatch);
                } else {
                    simple_selectors.push(SimpleSelector::Class(name));
                }
            }

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            Some('#') => {
                let _ = chars.next();
                let mut name = String::new();
                collect_ident(chars, &mut name);
                if name.is_empty() {
                    simple_selectors.push(SimpleSelector::NeverMatch);
                } else {
                    simple_selectors.push(SimpleSelector::Id(name));
                }
            }

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            Some('[') => {
                let _ = chars.next();
                match parse_attribute_selector(chars) {
                    Some(sel) => simple_selectors.push(sel),
                    None => simple_selectors.push(SimpleSelector::NeverMatch),
                }
            }

            // [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
            // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
            // Outside the supported subset: consume the name (and any
            // functional argument) so the rest of the selector list parses,
            // and record a never-matching part.
            Some(':') => {
                let _ = chars.next();
                if chars.peek() == Some(&':') {
                    let _ = chars.next();
                }
                let mut name = String::new();
                collect_ident(chars, &mut name);
                if chars.peek() == Some(&'(') {
                    let _ = chars.next();
                    let mut depth = 1u32;
                    for ch in chars.by_ref() {
                        match ch {
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                }
                simple_selectors.push(SimpleSelector::NeverMatch);
            }

            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            Some(&c) if is_ident_start_char(c) || c == '-' => {
                let mut name = String::new();
                collect_ident(chars, &mut name);
                simple_selectors.push(SimpleSelector::Type(name));
            }

            // Unknown character: drop it and mark the compound unmatched
            Some(_) => {
                let _ = chars.next();
                simple_selectors.push(SimpleSelector::NeverMatch);
            }
        }
    }

    if simple_selectors.is_empty() {
        None
    } else {
        Some(CompoundSelector { simple_selectors })
    }
}

/// Parse the inside of an attribute selector, after the opening `[`.
///
/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
/// "[att] Represents an element with the att attribute"
/// "[att=val] ...whose value is exactly 'val'."
///
/// The substring operators (`~=`, `|=`, `^=`, `$=`, `*=`) are consumed but
/// produce a never-matching part.
fn parse_attribute_selector(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Option<SimpleSelector> {
    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    let mut name = String::new();
    collect_ident(chars, &mut name);
    if name.is_empty() {
        return None;
    }

    while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
        let _ = chars.next();
    }

    match chars.peek() {
        Some(']') => {
            let _ = chars.next();
            Some(SimpleSelector::Attribute { name, value: None })
        }
        Some('=') => {
            let _ = chars.next();
            let val = parse_attr_value(chars)?;
            while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
                let _ = chars.next();
            }
            if chars.next() != Some(']') {
                return None;
            }
            Some(SimpleSelector::Attribute {
                name,
                value: Some(val),
            })
        }
        Some('~' | '|' | '^' | '$' | '*') => {
            // Consume through the closing bracket, then give up on the part
            for ch in chars.by_ref() {
                if ch == ']' {
                    break;
                }
            }
            Some(SimpleSelector::NeverMatch)
        }
        _ => None,
    }
}

/// Parse a raw selector string into a `ParsedSelector`.
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Supports:
/// - Type selectors: `div`, `p`, `span`
/// - Class selectors: `.class`
/// - ID selectors: `#id`
/// - Universal selector: `*`
/// - Attribute selectors: `[attr]`, `[attr=value]`
/// - Compound selectors: `div.class#id`
/// - One descendant step: `nav a`
///
/// Child (`>`) and sibling (`+`, `~`) combinators, pseudo-classes, and
/// descendant chains deeper than one ancestor all degrade to a selector
/// that never matches, with a one-time warning. Returns `None` only when
/// the input contains nothing parseable at all.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut chars = trimmed.chars().peekable();
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut degraded = false;

    loop {
        while chars.peek().is_some_and(|&ch| ch.is_ascii_whitespace()) {
            let _ = chars.next();
        }

        match chars.peek() {
            None => break,

            // [§ 16.2-16.4 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            // Child and sibling combinators are outside the supported
            // subset; the selector survives as never-matching.
            Some(&c @ ('>' | '+' | '~')) => {
                let _ = chars.next();
                warn_once(
                    "selector",
                    &format!("combinator '{c}' is not supported in: {trimmed}"),
                );
                degraded = true;
            }

            Some(_) => {
                if let Some(compound) = parse_compound(&mut chars) {
                    compounds.push(compound);
                }
            }
        }
    }

    if compounds.is_empty() {
        return None;
    }

    let subject = compounds.pop()?;

    // One descendant step is supported. Deeper chains (`a b c`) keep only
    // a never-matching selector so specificity bookkeeping stays honest.
    let ancestor = match compounds.len() {
        0 => None,
        1 => compounds.pop(),
        _ => {
            warn_once(
                "selector",
                &format!("descendant chain deeper than one ancestor in: {trimmed}"),
            );
            degraded = true;
            None
        }
    };

    if degraded {
        return Some(ParsedSelector {
            subject: CompoundSelector {
                simple_selectors: vec![SimpleSelector::NeverMatch],
            },
            ancestor: None,
        });
    }

    Some(ParsedSelector { subject, ancestor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use marmot_dom::{DomTree, ElementData, NodeId, NodeType};

    fn make_element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut element = ElementData::new(tag);
        for (k, v) in attrs {
            let _ = element.attrs.insert((*k).to_string(), (*v).to_string());
        }
        element
    }

    fn add_element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = tree.alloc(NodeType::Element(make_element(tag, attrs)));
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn type_selector_matches_case_insensitively() {
        let sel = parse_selector("DIV").unwrap();
        let element = make_element("div", &[]);
        assert!(sel.subject.matches(&element));
        assert_eq!(sel.specificity(), 1);
    }

    #[test]
    fn compound_selector_requires_all_parts() {
        let sel = parse_selector("p.note#intro").unwrap();
        assert!(sel.subject.matches(&make_element(
            "p",
            &[("class", "note wide"), ("id", "intro")]
        )));
        assert!(!sel.subject.matches(&make_element("p", &[("class", "note")])));
        assert_eq!(sel.specificity(), 111);
    }

    #[test]
    fn attribute_selectors() {
        let exists = parse_selector("[href]").unwrap();
        let equals = parse_selector("input[type=\"text\"]").unwrap();
        let a = make_element("a", &[("href", "/")]);
        let text_input = make_element("input", &[("type", "text")]);
        let password_input = make_element("input", &[("type", "password")]);

        assert!(exists.subject.matches(&a));
        assert!(!exists.subject.matches(&text_input));
        assert!(equals.subject.matches(&text_input));
        assert!(!equals.subject.matches(&password_input));
        assert_eq!(exists.specificity(), 10);
        assert_eq!(equals.specificity(), 11);
    }

    #[test]
    fn descendant_selector_walks_ancestors() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let nav = add_element(&mut tree, root, "nav", &[]);
        let ul = add_element(&mut tree, nav, "ul", &[]);
        let link = add_element(&mut tree, ul, "a", &[]);
        let orphan = add_element(&mut tree, root, "a", &[]);

        let sel = parse_selector("nav a").unwrap();
        assert!(sel.matches_in_tree(&tree, link));
        assert!(!sel.matches_in_tree(&tree, orphan));
        assert_eq!(sel.specificity(), 2);
    }

    #[test]
    fn unsupported_combinators_never_match() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let ul = add_element(&mut tree, root, "ul", &[]);
        let li = add_element(&mut tree, ul, "li", &[]);

        let sel = parse_selector("ul > li").unwrap();
        assert!(!sel.matches_in_tree(&tree, li));
    }

    #[test]
    fn pseudo_classes_never_match_but_parse() {
        let sel = parse_selector("a:hover").unwrap();
        assert!(!sel.subject.matches(&make_element("a", &[("href", "/")])));
    }

    #[test]
    fn empty_selector_is_rejected() {
        assert!(parse_selector("   ").is_none());
    }

    #[test]
    fn universal_selector_matches_anything() {
        let sel = parse_selector("*").unwrap();
        assert!(sel.subject.matches(&make_element("section", &[])));
        assert_eq!(sel.specificity(), 0);
    }
}
