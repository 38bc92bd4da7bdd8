//! Arena-backed formula trees
//!
//! An [`Expression`] owns a flat vector of [`Node`]s. Relations between nodes
//! are plain indices into that vector, so there are no ownership cycles and a
//! copy of an expression is an ordinary deep `Clone`.
//!
//! ## Layout
//!
//! Nodes are stored in pre-order: the root sits at index 0 and every subtree
//! occupies a contiguous index range starting at its own root. Every operation
//! in this module preserves the layout, which turns subtree extraction into a
//! range slice plus renumbering.
//!
//! Unary negation nodes keep their operand in `right`; `left` is `None`.

use super::connective::Connective;
use super::term::{AtomId, Term};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// One tree node: a term plus its self, child and parent indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    pub term: Term,
    pub index: usize,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub parent: Option<usize>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A propositional formula stored as an indexed tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    nodes: Vec<Node>,
}

/// Append a contiguous subtree `src` (whose root has index `base`) to `dst`,
/// renumbering every reference and attaching the copied root to `root_parent`.
fn relocate(dst: &mut Vec<Node>, src: &[Node], base: usize, root_parent: Option<usize>) {
    let offset = dst.len();
    let shift = move |i: usize| i - base + offset;
    for node in src {
        dst.push(Node {
            term: node.term,
            index: shift(node.index),
            left: node.left.map(shift),
            right: node.right.map(shift),
            parent: if node.index == base {
                root_parent
            } else {
                node.parent.map(shift)
            },
        });
    }
}

impl Expression {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Single-node expression. `term` must be a constant or a variable.
    pub fn leaf(term: Term) -> Self {
        debug_assert!(term.is_leaf(), "leaf expressions cannot hold a connective");
        Expression {
            nodes: vec![Node {
                term,
                index: 0,
                left: None,
                right: None,
                parent: None,
            }],
        }
    }

    pub fn constant(id: AtomId) -> Self {
        Expression::leaf(Term::constant(id))
    }

    pub fn variable(id: AtomId) -> Self {
        Expression::leaf(Term::variable(id))
    }

    /// Build `lhs op rhs` for a binary connective.
    ///
    /// The new root is followed by the nodes of `lhs` and then those of `rhs`;
    /// cost is linear in the size of both operands.
    pub fn construct(lhs: &Expression, op: Connective, rhs: &Expression) -> Self {
        debug_assert!(!op.is_unary(), "use Expression::negation for `!`");
        let mut nodes = Vec::with_capacity(1 + lhs.len() + rhs.len());
        nodes.push(Node {
            term: Term::Connective(op),
            index: 0,
            left: Some(1),
            right: Some(1 + lhs.len()),
            parent: None,
        });
        relocate(&mut nodes, &lhs.nodes, 0, Some(0));
        relocate(&mut nodes, &rhs.nodes, 0, Some(0));
        Expression { nodes }
    }

    /// Build `!operand`. A leaf operand just flips its polarity.
    pub fn negation(operand: &Expression) -> Self {
        if operand.is_leaf() {
            return Expression::leaf(operand.root().term.flipped());
        }
        let mut nodes = Vec::with_capacity(1 + operand.len());
        nodes.push(Node {
            term: Term::Connective(Connective::Negation),
            index: 0,
            left: None,
            right: Some(1),
            parent: None,
        });
        relocate(&mut nodes, &operand.nodes, 0, Some(0));
        Expression { nodes }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Connective at the root, `None` for a single atom
    pub fn root_connective(&self) -> Option<Connective> {
        self.root().term.connective()
    }

    /// Number of nodes (atoms plus connectives)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: an expression has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn atom_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.term.is_leaf()).count()
    }

    pub fn connective_count(&self) -> usize {
        self.nodes.len() - self.atom_count()
    }

    /// Largest variable id, 0 when the formula is ground
    pub fn max_variable(&self) -> AtomId {
        self.nodes
            .iter()
            .filter_map(|n| n.term.variable_id())
            .max()
            .unwrap_or(0)
    }

    /// Largest constant id, 0 when there are no constants
    pub fn max_constant(&self) -> AtomId {
        self.nodes
            .iter()
            .filter_map(|n| match n.term {
                Term::Constant { id, .. } => Some(id),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Distinct variable ids in ascending order
    pub fn variables(&self) -> BTreeSet<AtomId> {
        self.nodes
            .iter()
            .filter_map(|n| n.term.variable_id())
            .collect()
    }

    pub fn contains_variable(&self, var: AtomId) -> bool {
        self.nodes.iter().any(|n| n.term.variable_id() == Some(var))
    }

    pub fn is_ground(&self) -> bool {
        !self.nodes.iter().any(|n| n.term.is_variable())
    }

    /// One past the last index of the subtree rooted at `idx`
    pub fn subtree_end(&self, idx: usize) -> usize {
        let mut cur = idx;
        loop {
            let node = &self.nodes[cur];
            match (node.left, node.right) {
                (_, Some(r)) => cur = r,
                (Some(l), None) => cur = l,
                (None, None) => return cur + 1,
            }
        }
    }

    /// Size of the subtree rooted at `idx`
    pub fn subtree_len(&self, idx: usize) -> usize {
        self.subtree_end(idx) - idx
    }

    /// Standalone copy of the subtree rooted at `idx` with renumbered indices
    /// and no parent link.
    pub fn subtree_copy(&self, idx: usize) -> Expression {
        let end = self.subtree_end(idx);
        let mut nodes = Vec::with_capacity(end - idx);
        relocate(&mut nodes, &self.nodes[idx..end], idx, None);
        Expression { nodes }
    }

    /// Copy of the root's left operand
    pub fn left_operand(&self) -> Option<Expression> {
        self.root().left.map(|l| self.subtree_copy(l))
    }

    /// Copy of the root's right operand (the operand of a negation)
    pub fn right_operand(&self) -> Option<Expression> {
        self.root().right.map(|r| self.subtree_copy(r))
    }

    // =========================================================================
    // In-place rewriting
    // =========================================================================

    /// Overwrite the term at `idx`. Leaves stay leaves and connectives keep
    /// their arity.
    pub fn set_term(&mut self, idx: usize, term: Term) {
        let node = &mut self.nodes[idx];
        debug_assert_eq!(node.term.is_leaf(), term.is_leaf());
        debug_assert_eq!(
            node.term.connective().map(Connective::is_unary),
            term.connective().map(Connective::is_unary)
        );
        node.term = term;
    }

    /// Substitute every leaf of variable `var` with a copy of `value`.
    ///
    /// A negated occurrence `!X` receives the De Morgan negation of `value`.
    pub fn replace(&mut self, var: AtomId, value: &Expression) {
        self.splice_variables(|id| (id == var).then_some(value));
    }

    /// Apply every binding of `bindings` simultaneously
    pub fn apply_bindings(&mut self, bindings: &HashMap<AtomId, Expression>) {
        if bindings.is_empty() {
            return;
        }
        self.splice_variables(|id| bindings.get(&id));
    }

    /// Replace variable leaves for which `lookup` yields a value.
    ///
    /// Occurrences are visited in increasing index order; each splice shifts
    /// everything after it by `value.len() - 1`, and the running offset is
    /// folded into the index map before any node is written.
    fn splice_variables<'v>(&mut self, lookup: impl Fn(AtomId) -> Option<&'v Expression>) {
        let mut remap = Vec::with_capacity(self.nodes.len());
        let mut offset = 0usize;
        let mut hit = false;
        for node in &self.nodes {
            remap.push(node.index + offset);
            if let Some(value) = node.term.variable_id().and_then(&lookup) {
                offset += value.len() - 1;
                hit = true;
            }
        }
        if !hit {
            return;
        }

        let old = std::mem::take(&mut self.nodes);
        let mut nodes = Vec::with_capacity(old.len() + offset);
        for node in &old {
            let parent = node.parent.map(|p| remap[p]);
            if let Term::Variable { id, positive } = node.term {
                if let Some(value) = lookup(id) {
                    debug_assert_eq!(nodes.len(), remap[node.index]);
                    if positive {
                        relocate(&mut nodes, &value.nodes, 0, parent);
                    } else {
                        let mut negated = value.clone();
                        negated.negate(0);
                        relocate(&mut nodes, &negated.nodes, 0, parent);
                    }
                    continue;
                }
            }
            nodes.push(Node {
                term: node.term,
                index: remap[node.index],
                left: node.left.map(|i| remap[i]),
                right: node.right.map(|i| remap[i]),
                parent,
            });
        }
        self.nodes = nodes;
    }

    /// Push a negation into the subtree rooted at `idx` (De Morgan form).
    ///
    /// Leaves flip polarity; connectives switch to their opposite and the
    /// negation continues into the operands named by the connective's spread.
    /// The tree shape never changes.
    pub fn negate(&mut self, idx: usize) {
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            let node = &mut self.nodes[i];
            match node.term {
                Term::Connective(op) => {
                    node.term = Term::Connective(op.opposite());
                    let spread = op.negation_spread();
                    if spread.left {
                        stack.extend(node.left);
                    }
                    if spread.right {
                        stack.extend(node.right);
                    }
                }
                leaf => node.term = leaf.flipped(),
            }
        }
    }

    /// Renumber variables to 1, 2, ... in first-occurrence order
    pub fn normalize(&mut self) {
        let mut renumber: HashMap<AtomId, AtomId> = HashMap::new();
        // Pre-order visits leaves left to right.
        for node in &mut self.nodes {
            if let Term::Variable { id, positive } = node.term {
                let next = renumber.len() as AtomId + 1;
                let fresh = *renumber.entry(id).or_insert(next);
                node.term = Term::Variable { id: fresh, positive };
            }
        }
    }

    /// Normalized copy
    pub fn normalized(&self) -> Expression {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Printed form of the normalized formula; equal keys mean equal formulas
    pub fn canonical_key(&self) -> String {
        self.normalized().to_string()
    }

    /// Add `offset` to every variable id
    pub fn shift_variables(&mut self, offset: AtomId) {
        if offset == 0 {
            return;
        }
        for node in &mut self.nodes {
            if let Term::Variable { id, positive } = node.term {
                node.term = Term::Variable { id: id + offset, positive };
            }
        }
    }

    /// Turn every constant into the variable with the same id (axiom schemas)
    pub fn generalize(&mut self) {
        for node in &mut self.nodes {
            if let Term::Constant { id, positive } = node.term {
                node.term = Term::Variable { id, positive };
            }
        }
    }

    /// Turn every variable into a constant that does not clash with the
    /// constants already present
    pub fn freeze(&mut self) {
        let offset = self.max_constant();
        for node in &mut self.nodes {
            if let Term::Variable { id, positive } = node.term {
                node.term = Term::Constant { id: id + offset, positive };
            }
        }
    }

    /// Check the structural invariants of the arena layout
    pub fn is_well_formed(&self) -> bool {
        if self.nodes.is_empty() || self.nodes[0].parent.is_some() {
            return false;
        }
        let mut referenced = vec![0usize; self.nodes.len()];
        for (pos, node) in self.nodes.iter().enumerate() {
            if node.index != pos {
                return false;
            }
            match node.term {
                Term::Connective(op) if op.is_unary() => {
                    if node.left.is_some() || node.right != Some(pos + 1) {
                        return false;
                    }
                }
                Term::Connective(_) => {
                    let (Some(l), Some(r)) = (node.left, node.right) else {
                        return false;
                    };
                    if l != pos + 1 || r >= self.nodes.len() || r != self.subtree_end(l) {
                        return false;
                    }
                }
                _ => {
                    if !node.is_leaf() {
                        return false;
                    }
                }
            }
            for child in node.left.into_iter().chain(node.right) {
                if child >= self.nodes.len() || self.nodes[child].parent != Some(pos) {
                    return false;
                }
                referenced[child] += 1;
            }
        }
        referenced[0] == 0 && referenced[1..].iter().all(|&count| count == 1)
    }
}

// =============================================================================
// Display
// =============================================================================

enum Frame {
    Node(usize),
    Text(&'static str),
    Symbol(Connective),
}

impl fmt::Display for Expression {
    /// Infix form; every non-leaf sub-formula except the root is parenthesized
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Frame::Node(0)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Text(text) => f.write_str(text)?,
                Frame::Symbol(op) => write!(f, "{}", op)?,
                Frame::Node(i) => {
                    let node = &self.nodes[i];
                    match node.term {
                        Term::Connective(op) => {
                            let bracket = i != 0;
                            if bracket {
                                stack.push(Frame::Text(")"));
                            }
                            stack.extend(node.right.map(Frame::Node));
                            stack.push(Frame::Symbol(op));
                            stack.extend(node.left.map(Frame::Node));
                            if bracket {
                                stack.push(Frame::Text("("));
                            }
                        }
                        leaf => write!(f, "{}", leaf)?,
                    }
                }
            }
        }
        Ok(())
    }
}
