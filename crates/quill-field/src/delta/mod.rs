//! Rich-text deltas.
//!
//! A delta is the `{ "ops": [...] }` format Quill uses both for whole
//! documents and for changes to them. Each op does exactly one thing:
//! - `{"insert": "text" | {embed}, "attributes"?: {...}}`: add content
//! - `{"retain": n, "attributes"?: {...}}`: skip `n` units, optionally
//!   reformatting them
//! - `{"delete": n}`: remove `n` units
//!
//! A *document* delta contains inserts only and always ends with `"\n"`.
//! Lengths count characters; an embed counts as one.

pub mod attributes;
pub(crate) mod iter;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use attributes::Attributes;
use iter::{OpIter, OpKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("op has no insert, retain or delete")]
    MissingAction,
    #[error("op has more than one of insert, retain and delete")]
    ConflictingActions,
    #[error("insert must be a string or an object")]
    InvalidInsert,
    #[error("delete op cannot carry attributes")]
    AttributesOnDelete,
}

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("expected an array of ops or an object with an `ops` array")]
    NotADelta,
    #[error("invalid op at index {index}: {source}")]
    InvalidOp {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("document contents may only contain insert ops")]
    NotADocument,
}

/// Inserted content: text or a single embed such as `{"image": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Insert {
    Text(String),
    Embed(Map<String, Value>),
}

impl Insert {
    pub fn len(&self) -> usize {
        match self {
            Insert::Text(text) => text.chars().count(),
            Insert::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOp", into = "RawOp")]
pub enum DeltaOp {
    Insert {
        insert: Insert,
        attributes: Option<Attributes>,
    },
    Retain {
        retain: usize,
        attributes: Option<Attributes>,
    },
    Delete {
        delete: usize,
    },
}

impl DeltaOp {
    pub fn len(&self) -> usize {
        match self {
            DeltaOp::Insert { insert, .. } => insert.len(),
            DeltaOp::Retain { retain, .. } => *retain,
            DeltaOp::Delete { delete } => *delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, DeltaOp::Insert { .. })
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            DeltaOp::Insert { attributes, .. } | DeltaOp::Retain { attributes, .. } => {
                attributes.as_ref()
            }
            DeltaOp::Delete { .. } => None,
        }
    }
}

/// Wire shape of an op. Validated into [`DeltaOp`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insert: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retain: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Attributes>,
}

impl TryFrom<RawOp> for DeltaOp {
    type Error = OpError;

    fn try_from(raw: RawOp) -> Result<Self, Self::Error> {
        let attributes = raw.attributes.filter(|attrs| !attrs.is_empty());
        match (raw.insert, raw.retain, raw.delete) {
            (Some(insert), None, None) => {
                let insert = match insert {
                    Value::String(text) => Insert::Text(text),
                    Value::Object(embed) => Insert::Embed(embed),
                    _ => return Err(OpError::InvalidInsert),
                };
                Ok(DeltaOp::Insert { insert, attributes })
            }
            (None, Some(retain), None) => Ok(DeltaOp::Retain { retain, attributes }),
            (None, None, Some(delete)) => match attributes {
                Some(_) => Err(OpError::AttributesOnDelete),
                None => Ok(DeltaOp::Delete { delete }),
            },
            (None, None, None) => Err(OpError::MissingAction),
            _ => Err(OpError::ConflictingActions),
        }
    }
}

impl From<DeltaOp> for RawOp {
    fn from(op: DeltaOp) -> Self {
        match op {
            DeltaOp::Insert { insert, attributes } => RawOp {
                insert: Some(match insert {
                    Insert::Text(text) => Value::String(text),
                    Insert::Embed(embed) => Value::Object(embed),
                }),
                delete: None,
                retain: None,
                attributes,
            },
            DeltaOp::Retain { retain, attributes } => RawOp {
                insert: None,
                delete: None,
                retain: Some(retain),
                attributes,
            },
            DeltaOp::Delete { delete } => RawOp {
                insert: None,
                delete: Some(delete),
                retain: None,
                attributes: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub ops: Vec<DeltaOp>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty document: a single newline.
    pub fn blank_document() -> Self {
        Self::new().insert("\n", None)
    }

    /// Build a delta from loosely shaped JSON.
    ///
    /// Accepts an array of ops, an object holding an `ops` array, or the empty
    /// object (the empty delta).
    pub fn from_value(value: &Value) -> Result<Self, DeltaError> {
        let ops = match value {
            Value::Array(ops) => ops,
            Value::Object(map) => match map.get("ops") {
                Some(Value::Array(ops)) => ops,
                None if map.is_empty() => return Ok(Self::new()),
                _ => return Err(DeltaError::NotADelta),
            },
            _ => return Err(DeltaError::NotADelta),
        };
        let mut delta = Self::new();
        for (index, op) in ops.iter().enumerate() {
            let op = DeltaOp::deserialize(op)
                .map_err(|source| DeltaError::InvalidOp { index, source })?;
            delta.push(op);
        }
        Ok(delta)
    }

    pub fn insert(mut self, text: impl Into<String>, attributes: Option<Attributes>) -> Self {
        self.push(DeltaOp::Insert {
            insert: Insert::Text(text.into()),
            attributes,
        });
        self
    }

    pub fn insert_embed(mut self, embed: Map<String, Value>, attributes: Option<Attributes>) -> Self {
        self.push(DeltaOp::Insert {
            insert: Insert::Embed(embed),
            attributes,
        });
        self
    }

    pub fn retain(mut self, length: usize, attributes: Option<Attributes>) -> Self {
        self.push(DeltaOp::Retain {
            retain: length,
            attributes,
        });
        self
    }

    pub fn delete(mut self, length: usize) -> Self {
        self.push(DeltaOp::Delete { delete: length });
        self
    }

    /// Append an op, merging it into the previous one where possible.
    ///
    /// Inserts are kept in front of an adjacent delete so equivalent deltas
    /// have one canonical form.
    pub fn push(&mut self, op: DeltaOp) -> &mut Self {
        if op.is_empty() {
            return self;
        }
        if op.is_insert() && matches!(self.ops.last(), Some(DeltaOp::Delete { .. })) {
            if let Some(delete) = self.ops.pop() {
                self.push(op);
                self.ops.push(delete);
            }
            return self;
        }
        match (self.ops.last_mut(), &op) {
            (Some(DeltaOp::Delete { delete: n }), DeltaOp::Delete { delete: m }) => {
                *n += m;
                return self;
            }
            (
                Some(DeltaOp::Insert {
                    insert: Insert::Text(s),
                    attributes: a,
                }),
                DeltaOp::Insert {
                    insert: Insert::Text(t),
                    attributes: b,
                },
            ) if *a == *b => {
                s.push_str(t);
                return self;
            }
            (
                Some(DeltaOp::Retain {
                    retain: n,
                    attributes: a,
                }),
                DeltaOp::Retain {
                    retain: m,
                    attributes: b,
                },
            ) if *a == *b => {
                *n += m;
                return self;
            }
            _ => {}
        }
        self.ops.push(op);
        self
    }

    /// Drop a trailing retain that carries no formatting.
    pub fn chop(mut self) -> Self {
        if let Some(DeltaOp::Retain {
            attributes: None, ..
        }) = self.ops.last()
        {
            self.ops.pop();
        }
        self
    }

    pub fn length(&self) -> usize {
        self.ops.iter().map(DeltaOp::len).sum()
    }

    /// Plain text of the inserted content. Embeds contribute nothing.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DeltaOp::Insert {
                    insert: Insert::Text(text),
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_document(&self) -> bool {
        self.ops.iter().all(DeltaOp::is_insert)
    }

    pub fn ends_with_newline(&self) -> bool {
        matches!(
            self.ops.last(),
            Some(DeltaOp::Insert { insert: Insert::Text(text), .. }) if text.ends_with('\n')
        )
    }

    /// True for exactly one insert whose text is a single newline, whatever
    /// its attributes. Whitespace-only or multi-op documents are not blank.
    pub fn is_blank_document(&self) -> bool {
        matches!(
            self.ops.as_slice(),
            [DeltaOp::Insert { insert: Insert::Text(text), .. }] if text == "\n"
        )
    }

    /// Canonical document form: merged ops, no erasures, trailing newline.
    pub fn into_document(self) -> Result<Self, DeltaError> {
        let mut document = Self::new();
        for op in self.ops {
            match op {
                DeltaOp::Insert { insert, attributes } => {
                    document.push(DeltaOp::Insert {
                        insert,
                        attributes: attributes::strip_erasures(attributes.as_ref()),
                    });
                }
                DeltaOp::Retain { .. } | DeltaOp::Delete { .. } => {
                    return Err(DeltaError::NotADocument)
                }
            }
        }
        if !document.ends_with_newline() {
            document.push(DeltaOp::Insert {
                insert: Insert::Text("\n".into()),
                attributes: None,
            });
        }
        Ok(document)
    }

    /// Apply `other` after `self`.
    pub fn compose(&self, other: &Delta) -> Delta {
        let mut this_iter = OpIter::new(&self.ops);
        let mut other_iter = OpIter::new(&other.ops);
        let mut out = Delta::new();
        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_kind() == OpKind::Insert {
                out.push(other_iter.next(usize::MAX));
            } else if this_iter.peek_kind() == OpKind::Delete {
                out.push(this_iter.next(usize::MAX));
            } else {
                let length = this_iter.peek_length().min(other_iter.peek_length());
                let this_op = this_iter.next(length);
                let other_op = other_iter.next(length);
                match other_op {
                    DeltaOp::Retain {
                        attributes: other_attrs,
                        ..
                    } => {
                        let op = match this_op {
                            DeltaOp::Retain { retain, attributes } => DeltaOp::Retain {
                                retain,
                                attributes: attributes::compose(
                                    attributes.as_ref(),
                                    other_attrs.as_ref(),
                                    true,
                                ),
                            },
                            DeltaOp::Insert { insert, attributes } => DeltaOp::Insert {
                                insert,
                                attributes: attributes::compose(
                                    attributes.as_ref(),
                                    other_attrs.as_ref(),
                                    false,
                                ),
                            },
                            delete @ DeltaOp::Delete { .. } => delete,
                        };
                        out.push(op);
                    }
                    DeltaOp::Delete { delete } => {
                        // Deleting freshly inserted content cancels both.
                        if let DeltaOp::Retain { .. } = this_op {
                            out.push(DeltaOp::Delete { delete });
                        }
                    }
                    DeltaOp::Insert { .. } => {}
                }
            }
        }
        out.chop()
    }
}
