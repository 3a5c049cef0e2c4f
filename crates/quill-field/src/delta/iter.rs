//! Cursor over a slice of ops that can hand out partial ops.

use super::{DeltaOp, Insert};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    Insert,
    Retain,
    Delete,
}

pub(crate) struct OpIter<'a> {
    ops: &'a [DeltaOp],
    index: usize,
    offset: usize,
}

impl<'a> OpIter<'a> {
    pub(crate) fn new(ops: &'a [DeltaOp]) -> Self {
        Self { ops, index: 0, offset: 0 }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.index < self.ops.len()
    }

    /// Remaining length of the current op. Unbounded once exhausted.
    pub(crate) fn peek_length(&self) -> usize {
        match self.ops.get(self.index) {
            Some(op) => op.len() - self.offset,
            None => usize::MAX,
        }
    }

    /// Kind of the current op. An exhausted iterator behaves as an endless
    /// retain.
    pub(crate) fn peek_kind(&self) -> OpKind {
        match self.ops.get(self.index) {
            Some(DeltaOp::Insert { .. }) => OpKind::Insert,
            Some(DeltaOp::Delete { .. }) => OpKind::Delete,
            Some(DeltaOp::Retain { .. }) | None => OpKind::Retain,
        }
    }

    /// Take up to `length` units from the current op.
    pub(crate) fn next(&mut self, length: usize) -> DeltaOp {
        let Some(op) = self.ops.get(self.index) else {
            return DeltaOp::Retain {
                retain: length,
                attributes: None,
            };
        };
        let offset = self.offset;
        let remaining = op.len() - offset;
        let take = length.min(remaining);
        if take == remaining {
            self.index += 1;
            self.offset = 0;
        } else {
            self.offset += take;
        }
        match op {
            DeltaOp::Delete { .. } => DeltaOp::Delete { delete: take },
            DeltaOp::Retain { attributes, .. } => DeltaOp::Retain {
                retain: take,
                attributes: attributes.clone(),
            },
            DeltaOp::Insert {
                insert: Insert::Text(text),
                attributes,
            } => DeltaOp::Insert {
                insert: Insert::Text(text.chars().skip(offset).take(take).collect()),
                attributes: attributes.clone(),
            },
            DeltaOp::Insert {
                insert: embed @ Insert::Embed(_),
                attributes,
            } => DeltaOp::Insert {
                insert: embed.clone(),
                attributes: attributes.clone(),
            },
        }
    }
}
