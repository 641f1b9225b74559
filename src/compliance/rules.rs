//! Rule tables for the structural engine.
//!
//! Each table maps a node kind to its rule. Kinds without an entry have no
//! rule and therefore never violate it: unknown and custom kinds are allowed.
//!
//! Tables follow the standard structure type relationships of
//! ISO 32000-1:2008 Section 14.8.4 and ISO 14289-1 (PDF/UA).

use crate::structure::{NodeKind, ATTR_ACTUAL_TEXT, ATTR_ALT};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

/// A child requirement: at least one child of any `satisfied_by` kind.
#[derive(Debug, Clone)]
pub struct RequiredChild {
    /// Kind named in the issue's `missingChild` context
    pub reported: NodeKind,
    /// Kinds that satisfy the requirement
    pub satisfied_by: Vec<NodeKind>,
}

/// An attribute requirement: any listed attribute non-blank, or (when
/// allowed) non-empty text content in the subtree.
#[derive(Debug, Clone)]
pub struct AttributeRequirement {
    /// Attributes that satisfy the requirement
    pub attributes: &'static [&'static str],
    /// Whether text content in the node's subtree also satisfies it
    pub text_content_suffices: bool,
}

impl AttributeRequirement {
    /// Human-readable list of alternatives, e.g. `"Alt or ActualText"`.
    pub fn describe(&self) -> String {
        let mut alternatives: Vec<&str> = Vec::new();
        if self.text_content_suffices {
            alternatives.push("text content");
        }
        alternatives.extend(self.attributes.iter().copied());
        match alternatives.len() {
            0 => String::new(),
            1 => alternatives[0].to_string(),
            n => format!("{} or {}", alternatives[..n - 1].join(", "), alternatives[n - 1]),
        }
    }
}

const TEXT_ALTERNATIVES: &[&str] = &[ATTR_ALT, ATTR_ACTUAL_TEXT];

fn kinds(list: &[NodeKind]) -> HashSet<NodeKind> {
    list.iter().cloned().collect()
}

fn required(reported: NodeKind, satisfied_by: &[NodeKind]) -> RequiredChild {
    RequiredChild {
        reported,
        satisfied_by: satisfied_by.to_vec(),
    }
}

lazy_static! {
    /// Kinds that may legitimately have no content.
    static ref PERMITTED_EMPTY: HashSet<NodeKind> = kinds(&[
        NodeKind::Artifact,
        NodeKind::DocumentHeader,
        NodeKind::DocumentFooter,
        NodeKind::Note,
        NodeKind::NonStruct,
        NodeKind::Private,
        NodeKind::TD,
        NodeKind::Annot,
        NodeKind::Form,
    ]);

    /// Container kind -> child kinds it admits.
    static ref NESTING_RULES: HashMap<NodeKind, HashSet<NodeKind>> = {
        let mut m = HashMap::new();
        m.insert(NodeKind::L, kinds(&[NodeKind::LI, NodeKind::Caption]));
        m.insert(NodeKind::LI, kinds(&[NodeKind::Lbl, NodeKind::LBody]));
        m.insert(
            NodeKind::Table,
            kinds(&[
                NodeKind::TR,
                NodeKind::THead,
                NodeKind::TBody,
                NodeKind::TFoot,
                NodeKind::Caption,
            ]),
        );
        m.insert(NodeKind::THead, kinds(&[NodeKind::TR]));
        m.insert(NodeKind::TBody, kinds(&[NodeKind::TR]));
        m.insert(NodeKind::TFoot, kinds(&[NodeKind::TR]));
        m.insert(NodeKind::TR, kinds(&[NodeKind::TH, NodeKind::TD]));
        m.insert(NodeKind::TOC, kinds(&[NodeKind::TOCI, NodeKind::TOC, NodeKind::Caption]));
        m.insert(
            NodeKind::TOCI,
            kinds(&[
                NodeKind::Lbl,
                NodeKind::Reference,
                NodeKind::P,
                NodeKind::NonStruct,
                NodeKind::TOC,
                NodeKind::Link,
            ]),
        );
        m
    };

    /// Container kind -> children it must contain.
    static ref REQUIRED_CHILDREN: HashMap<NodeKind, Vec<RequiredChild>> = {
        let mut m = HashMap::new();
        m.insert(
            NodeKind::LI,
            vec![
                required(NodeKind::Lbl, &[NodeKind::Lbl]),
                required(NodeKind::LBody, &[NodeKind::LBody]),
            ],
        );
        m.insert(NodeKind::L, vec![required(NodeKind::LI, &[NodeKind::LI])]);
        m.insert(
            NodeKind::Table,
            vec![required(
                NodeKind::TR,
                &[NodeKind::TR, NodeKind::THead, NodeKind::TBody, NodeKind::TFoot],
            )],
        );
        m.insert(NodeKind::THead, vec![required(NodeKind::TR, &[NodeKind::TR])]);
        m.insert(NodeKind::TBody, vec![required(NodeKind::TR, &[NodeKind::TR])]);
        m.insert(NodeKind::TFoot, vec![required(NodeKind::TR, &[NodeKind::TR])]);
        m.insert(NodeKind::TR, vec![required(NodeKind::TD, &[NodeKind::TH, NodeKind::TD])]);
        m.insert(NodeKind::TOC, vec![required(NodeKind::TOCI, &[NodeKind::TOCI, NodeKind::TOC])]);
        m
    };

    /// Kind -> attribute-or-content it must provide.
    static ref REQUIRED_ATTRIBUTES: HashMap<NodeKind, AttributeRequirement> = {
        let mut m = HashMap::new();
        m.insert(
            NodeKind::Figure,
            AttributeRequirement {
                attributes: TEXT_ALTERNATIVES,
                text_content_suffices: false,
            },
        );
        m.insert(
            NodeKind::Formula,
            AttributeRequirement {
                attributes: TEXT_ALTERNATIVES,
                text_content_suffices: false,
            },
        );
        m.insert(
            NodeKind::Link,
            AttributeRequirement {
                attributes: TEXT_ALTERNATIVES,
                text_content_suffices: true,
            },
        );
        m
    };
}

/// Whether `kind` is exempt from the empty-element rule.
pub fn is_permitted_empty(kind: &NodeKind) -> bool {
    PERMITTED_EMPTY.contains(kind)
}

/// Child kinds admitted by `parent`, or `None` when there is no rule.
pub fn admitted_children(parent: &NodeKind) -> Option<&'static HashSet<NodeKind>> {
    NESTING_RULES.get(parent)
}

/// Whether `parent` may contain `child`. Kinds without a rule admit anything.
pub fn admits_child(parent: &NodeKind, child: &NodeKind) -> bool {
    admitted_children(parent).map_or(true, |allowed| allowed.contains(child))
}

/// Child requirements for `kind` (empty when there is no rule).
pub fn required_children(kind: &NodeKind) -> &'static [RequiredChild] {
    REQUIRED_CHILDREN.get(kind).map(Vec::as_slice).unwrap_or(&[])
}

/// Attribute requirement for `kind`, if any.
pub fn attribute_requirement(kind: &NodeKind) -> Option<&'static AttributeRequirement> {
    REQUIRED_ATTRIBUTES.get(kind)
}
