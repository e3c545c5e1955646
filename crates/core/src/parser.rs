//! Recursive-descent parser for component markup.
//!
//! Nesting is decided by indentation alone. The parser keeps one counter
//! holding the indentation seen so far on the current line; every block and
//! component captures the counter at entry as its base level and ends at the
//! first line that is indented no deeper than that base.

use crate::error::MarkupError;
use crate::lexer::Lexer;
use crate::node::{ComponentNode, Document, Node, Property, PropertyValue, TextNode};
use crate::token::{Token, TokenKind};

/// Markup parser over a borrowed source string.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    indent: usize,
}

/// Parses `input` into a markup document.
pub fn parse(input: &str) -> Result<Document, MarkupError> {
    Parser::new(input).parse()
}

impl<'a> Parser<'a> {
    /// Creates a parser for `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            indent: 0,
        }
    }

    /// Parses the whole input. Empty input yields an empty document.
    pub fn parse(mut self) -> Result<Document, MarkupError> {
        Ok(Document::new(self.parse_block()?))
    }

    /// Consumes an indent or line break token, updating the line counter.
    ///
    /// Returns the token when it is neither, leaving it unconsumed.
    fn skip_layout(&mut self) -> Result<Option<Token>, MarkupError> {
        loop {
            let token = self.lexer.peek()?;
            match token.kind {
                TokenKind::EndOfInput => return Ok(None),
                TokenKind::Indent => self.indent += 1,
                TokenKind::LineBreak => self.indent = 0,
                _ => return Ok(Some(token)),
            }
            self.lexer.next()?;
        }
    }

    fn parse_block(&mut self) -> Result<Vec<Node>, MarkupError> {
        let mut nodes = Vec::new();
        let base = self.indent;
        self.indent = 0;

        while let Some(token) = self.skip_layout()? {
            if base != 0 && self.indent <= base {
                break;
            }
            match token.kind {
                TokenKind::ComponentMarker => {
                    nodes.push(Node::Component(self.parse_component()?));
                }
                TokenKind::Text => {
                    self.lexer.next()?;
                    nodes.push(Node::Text(TextNode::new(token.value)));
                }
                _ => return Err(unexpected(token)),
            }
        }
        Ok(nodes)
    }

    fn parse_component(&mut self) -> Result<ComponentNode, MarkupError> {
        let marker = self.lexer.next()?;
        let mut node = ComponentNode::new(marker.value, marker.location);
        let base = self.indent;

        while let Some(token) = self.skip_layout()? {
            if self.indent <= base {
                break;
            }
            match token.kind {
                TokenKind::Text => {
                    self.lexer.next()?;
                    node.children.push(Node::Text(TextNode::new(token.value)));
                }
                TokenKind::ComponentMarker => {
                    let child = self.parse_component()?;
                    node.children.push(Node::Component(child));
                }
                TokenKind::BooleanFlag => {
                    self.lexer.next()?;
                    node.properties
                        .push(Property::new(token.value, PropertyValue::Flag));
                }
                TokenKind::PropertyName => {
                    let property = self.parse_property()?;
                    node.properties.push(property);
                }
                _ => return Err(unexpected(token)),
            }
        }
        log::debug!(
            "parsed component {} with {} properties and {} children",
            node.name,
            node.properties.len(),
            node.children.len()
        );
        Ok(node)
    }

    fn parse_property(&mut self) -> Result<Property, MarkupError> {
        let name = self.lexer.next()?;
        let colon = self.lexer.next()?;
        if !colon.is(TokenKind::Colon) {
            return Err(MarkupError::ExpectedColon {
                value: colon.value,
                location: colon.location,
            });
        }
        let value = self.parse_property_value()?;
        Ok(Property::new(name.value, value))
    }

    fn parse_property_value(&mut self) -> Result<PropertyValue, MarkupError> {
        let next = self.lexer.peek()?;
        match next.kind {
            TokenKind::Quote => Ok(PropertyValue::String(self.parse_string()?)),
            TokenKind::Number => {
                self.lexer.next()?;
                Ok(PropertyValue::String(next.value))
            }
            TokenKind::LineBreak => {
                self.lexer.next()?;
                let nodes = self.parse_block()?;
                block_value(nodes, next)
            }
            _ => Err(MarkupError::ExpectedPropertyValue {
                value: next.value,
                location: next.location,
            }),
        }
    }

    fn parse_string(&mut self) -> Result<String, MarkupError> {
        let open = self.lexer.next()?;
        if !open.is(TokenKind::Quote) {
            return Err(MarkupError::malformed_string(
                format!("expected opening quote got {:?}", open.value),
                open.location,
            ));
        }
        let text = self.lexer.next()?;
        if !text.is(TokenKind::Text) {
            return Err(MarkupError::malformed_string(
                format!("expected string contents got {}", text.kind),
                text.location,
            ));
        }
        let close = self.lexer.next()?;
        if !close.is(TokenKind::Quote) {
            return Err(MarkupError::malformed_string(
                format!("expected closing quote got {}", close.kind),
                close.location,
            ));
        }
        Ok(text.value)
    }
}

/// Turns the nodes of an indented property block into a property value.
fn block_value(nodes: Vec<Node>, opening: Token) -> Result<PropertyValue, MarkupError> {
    let components = nodes.iter().filter(|n| n.as_component().is_some()).count();
    if components > 1 {
        return Err(MarkupError::TooManyComponents {
            count: components,
            location: opening.location,
        });
    }
    if components == 0 {
        let lines: Vec<String> = nodes
            .into_iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.value),
                Node::Component(_) => None,
            })
            .collect();
        return Ok(PropertyValue::String(lines.join("\n")));
    }
    let mixed = MarkupError::MixedPropertyValue {
        location: opening.location,
    };
    if nodes.len() > 1 {
        return Err(mixed);
    }
    match nodes.into_iter().next() {
        Some(Node::Component(component)) => Ok(PropertyValue::Component(Box::new(component))),
        _ => Err(mixed),
    }
}

fn unexpected(token: Token) -> MarkupError {
    MarkupError::unexpected(token.kind, token.value, token.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceLocation;

    fn component(node: &Node) -> &ComponentNode {
        node.as_component().expect("expected component node")
    }

    fn string_prop<'a>(node: &'a ComponentNode, index: usize) -> (&'a str, &'a str) {
        let prop = &node.properties[index];
        (
            prop.name.as_str(),
            prop.value.as_str().expect("expected string value"),
        )
    }

    #[test]
    fn test_basic_component_tree() {
        let input = "\\HeroV2\n    Title: \"Congratulations!\"\n    !Visible\n    \\ButtonPrimary\n        Href: \"https://example.com\"\n        See Demo";
        let doc = parse(input).unwrap();
        assert_eq!(doc.nodes.len(), 1);

        let hero = component(&doc.nodes[0]);
        assert_eq!(hero.name, "HeroV2");
        assert_eq!(hero.properties.len(), 2);
        assert_eq!(string_prop(hero, 0), ("Title", "Congratulations!"));
        assert_eq!(hero.properties[1].name, "Visible");
        assert_eq!(hero.properties[1].value, PropertyValue::Flag);

        assert_eq!(hero.children.len(), 1);
        let button = component(&hero.children[0]);
        assert_eq!(button.name, "ButtonPrimary");
        assert_eq!(button.properties.len(), 1);
        assert_eq!(string_prop(button, 0), ("Href", "https://example.com"));
        assert_eq!(button.children, vec![Node::Text(TextNode::new("See Demo"))]);
    }

    #[test]
    fn test_component_valued_property() {
        let input = "\\Features\n    Title: \"### A robust set of features\"\n    Description: \"Based on community suggestions\"\n    \\Card\n        Title: \"Blazing Fast Performance\"\n        Icon: \n            \\IconLightning\n                Size: \"24\"\n                Variant: \"DuoTone\"\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.nodes.len(), 1);

        let features = component(&doc.nodes[0]);
        assert_eq!(string_prop(features, 0), ("Title", "### A robust set of features"));
        assert_eq!(
            string_prop(features, 1),
            ("Description", "Based on community suggestions")
        );
        assert_eq!(features.children.len(), 1);

        let card = component(&features.children[0]);
        assert_eq!(card.properties.len(), 2);
        assert_eq!(string_prop(card, 0), ("Title", "Blazing Fast Performance"));
        assert_eq!(card.properties[1].name, "Icon");

        let icon = card.properties[1].value.as_component().unwrap();
        assert_eq!(icon.name, "IconLightning");
        assert_eq!(string_prop(icon, 0), ("Size", "24"));
        assert_eq!(string_prop(icon, 1), ("Variant", "DuoTone"));
        assert!(card.children.is_empty());
    }

    #[test]
    fn test_multiline_text_property() {
        let input = "\n\\Description\n    Text:\n        This is a multiline description\n        that spans multiple lines.\n    MoreText: \"More single-line text.\"\n";
        let doc = parse(input).unwrap();
        let desc = component(&doc.nodes[0]);
        assert_eq!(desc.properties.len(), 2);
        assert_eq!(
            string_prop(desc, 0),
            (
                "Text",
                "This is a multiline description\nthat spans multiple lines."
            )
        );
        assert_eq!(string_prop(desc, 1), ("MoreText", "More single-line text."));
    }

    #[test]
    fn test_navigation_and_top_level_slot() {
        let pages = [
            ("/features", "Features"),
            ("/services", "Services"),
            ("/about", "About"),
            ("/contact", "Contact"),
            ("/docs", "Docs"),
        ];
        let mut input = String::from("\\Header\n");
        for (href, label) in pages {
            input.push_str(&format!(
                "    \\Link\n        Href: \"{href}\"\n        {label}\n"
            ));
        }
        input.push_str("\\Slot");

        let doc = parse(&input).unwrap();
        assert_eq!(doc.nodes.len(), 2);

        let header = component(&doc.nodes[0]);
        assert!(header.properties.is_empty());
        assert_eq!(header.children.len(), pages.len());
        for (child, (href, label)) in header.children.iter().zip(pages) {
            let link = component(child);
            assert_eq!(link.name, "Link");
            assert_eq!(string_prop(link, 0), ("Href", href));
            assert_eq!(link.children, vec![Node::Text(TextNode::new(label))]);
        }
        assert_eq!(component(&doc.nodes[1]).name, "Slot");
    }

    #[test]
    fn test_component_property_followed_by_child() {
        let input = "\\DocsLayout\n    Header:\n        \\Navbar\n            \\Link\n                Href: \"/blog\"\n                Blog\n            \\Link\n                Href: \"/docs\"\n                Docs\n    \\Slot\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.nodes.len(), 1);

        let layout = component(&doc.nodes[0]);
        assert_eq!(layout.properties.len(), 1);
        let navbar = layout.properties[0].value.as_component().unwrap();
        assert_eq!(navbar.name, "Navbar");
        assert!(navbar.properties.is_empty());
        assert_eq!(navbar.children.len(), 2);

        assert_eq!(layout.children.len(), 1);
        assert_eq!(component(&layout.children[0]).name, "Slot");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_children_end_at_dedent_across_blank_lines() {
        let input = "\\Card\n    First\n\n    \n        \n    Second\n\\Next\n    Third";
        let doc = parse(input).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        let card = component(&doc.nodes[0]);
        assert_eq!(
            card.children,
            vec![
                Node::Text(TextNode::new("First")),
                Node::Text(TextNode::new("Second")),
            ]
        );
        let next = component(&doc.nodes[1]);
        assert_eq!(next.children, vec![Node::Text(TextNode::new("Third"))]);
    }

    #[test]
    fn test_sibling_ends_at_its_own_level() {
        let input = "\\Outer\n    \\Inner\n        Deep\n    Shallow";
        let doc = parse(input).unwrap();
        let outer = component(&doc.nodes[0]);
        assert_eq!(outer.children.len(), 2);
        let inner = component(&outer.children[0]);
        assert_eq!(inner.children, vec![Node::Text(TextNode::new("Deep"))]);
        assert_eq!(outer.children[1], Node::Text(TextNode::new("Shallow")));
    }

    #[test]
    fn test_empty_block_property_is_empty_string() {
        let input = "\\Card\n    Title:\n    Body: \"x\"";
        let card = parse(input).unwrap().nodes.remove(0);
        let card = component(&card);
        assert_eq!(string_prop(card, 0), ("Title", ""));
        assert_eq!(string_prop(card, 1), ("Body", "x"));
    }

    #[test]
    fn test_unquoted_number_property() {
        let input = "\\Icon\n    Size: 24";
        let doc = parse(input).unwrap();
        assert_eq!(string_prop(component(&doc.nodes[0]), 0), ("Size", "24"));
    }

    #[test]
    fn test_rejects_two_components_in_property() {
        let input = "\\Card\n    Icon:\n        \\Star\n        \\Moon";
        let err = parse(input).unwrap_err();
        assert_eq!(
            err,
            MarkupError::TooManyComponents {
                count: 2,
                location: SourceLocation::new(2, 10),
            }
        );
        assert!(err.to_string().contains("only contain one component"));
    }

    #[test]
    fn test_rejects_component_mixed_with_text_in_property() {
        let input = "\\Card\n    Icon:\n        \\Star\n        trailing words";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, MarkupError::MixedPropertyValue { .. }));
    }

    #[test]
    fn test_rejects_inline_component_value() {
        let err = parse("\\Card\n    Icon: \\Star").unwrap_err();
        assert!(matches!(err, MarkupError::ExpectedPropertyValue { .. }));
    }

    #[test]
    fn test_rejects_unclosed_string() {
        let err = parse("\\Card\n    Title: \"unterminated").unwrap_err();
        match err {
            MarkupError::MalformedString { message, location } => {
                assert_eq!(message, "expected closing quote got end of input");
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rejects_flag_outside_component() {
        let err = parse("!Visible").unwrap_err();
        assert_eq!(
            err,
            MarkupError::unexpected(TokenKind::BooleanFlag, "Visible", SourceLocation::new(1, 1))
        );
    }

    #[test]
    fn test_markdown_lines_starting_with_markers_stay_text() {
        let doc = parse("\\Card\n    ![logo](/x.png)\n    \\*not emphasis\\*").unwrap();
        let card = component(&doc.nodes[0]);
        assert!(card.properties.is_empty());
        assert_eq!(
            card.children,
            vec![
                Node::Text(TextNode::new("![logo](/x.png)")),
                Node::Text(TextNode::new("\\*not emphasis\\*")),
            ]
        );
    }

    #[test]
    fn test_lex_errors_abort_the_parse() {
        let err = parse("\\Card\n    First\n  Second").unwrap_err();
        assert!(err.is_lex_error());
        assert_eq!(err.location(), SourceLocation::new(3, 1));
    }

    #[test]
    fn test_quoted_properties_survive_reserialization() {
        let values = [
            "plain",
            "with: colon",
            "has \"quotes\" inside",
            "trailing space ",
            "",
            "\\Looks like a marker",
            "!looks like a flag",
            "https://example.com/?q=a:b",
        ];
        for value in values {
            let mut input = String::from("\\Probe\n");
            input.push_str(&format!(
                "    Value: \"{}\"\n    Other: \"{}\"\n",
                value.replace('"', "\\\""),
                value.replace('"', "\\\"")
            ));
            let first = parse(&input).unwrap();
            let second = parse(&first.to_markup()).unwrap();
            assert_eq!(
                component(&first.nodes[0]).properties,
                component(&second.nodes[0]).properties,
                "value {value:?}"
            );
            assert_eq!(
                component(&first.nodes[0]).property("value").and_then(|v| v.as_str()),
                Some(value)
            );
        }
    }
}
