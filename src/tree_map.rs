//! OrderedMap: red-black tree over a slot arena.
//!
//! Nodes live in a `SlotMap` and refer to each other by id; an absent
//! child or parent is `None`, which reads as a BLACK leaf wherever a color
//! is asked for. The root's parent is `None`.
//!
//! Deletion of a node with two children relinks its in-order successor
//! into the vacated position instead of moving the successor's payload.
//! Every surviving node therefore keeps its id, which is what lets a
//! cursor hold the id of the next node across `remove_current`.

use crate::cursor::Cursor;
use crate::error::RemoveError;
use crate::ordering::{KeyOrder, NaturalOrder};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use slotmap::SlotMap;

slotmap::new_key_type! {
    struct NodeId;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Clone)]
pub struct OrderedMap<K, V, O = NaturalOrder> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
    order: O,
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::with_order(NaturalOrder)
    }
}

impl<K, V, O: Default> Default for OrderedMap<K, V, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

// Structural helpers: links, colors, rotations, traversal.
impl<K, V, O> OrderedMap<K, V, O> {
    pub fn with_order(order: O) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    fn color(&self, n: Option<NodeId>) -> Color {
        n.map_or(Color::Black, |id| self.nodes[id].color)
    }

    #[inline]
    fn set_color(&mut self, n: Option<NodeId>, color: Color) {
        if let Some(id) = n {
            self.nodes[id].color = color;
        }
    }

    #[inline]
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Point whatever referred to `old` (its parent's child slot, or the
    /// root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.nodes[p].left == Some(old) {
                    self.nodes[p].left = new;
                } else {
                    self.nodes[p].right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].right else {
            return;
        };
        let inner = self.nodes[y].left;
        self.nodes[x].right = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(x);
        }
        let xp = self.nodes[x].parent;
        self.nodes[y].parent = xp;
        self.replace_child(xp, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].left else {
            return;
        };
        let inner = self.nodes[y].right;
        self.nodes[x].left = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(x);
        }
        let xp = self.nodes[x].parent;
        self.nodes[y].parent = xp;
        self.replace_child(xp, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.nodes[id].left {
            id = l;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.nodes[id].right {
            id = r;
        }
        id
    }

    fn first_node(&self) -> Option<NodeId> {
        self.root.map(|r| self.leftmost(r))
    }

    fn last_node(&self) -> Option<NodeId> {
        self.root.map(|r| self.rightmost(r))
    }

    /// In-order successor: leftmost of the right subtree, or the first
    /// ancestor reached from a left child.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(r) = self.nodes[id].right {
            return Some(self.leftmost(r));
        }
        let mut node = id;
        let mut parent = self.parent(node);
        while let Some(p) = parent {
            if self.nodes[p].right != Some(node) {
                break;
            }
            node = p;
            parent = self.parent(p);
        }
        parent
    }

    fn insert_rebalance(&mut self, mut node: NodeId) {
        while let Some(parent) = self.parent(node) {
            if self.nodes[parent].color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.parent(parent) else {
                break;
            };
            if self.nodes[grand].left == Some(parent) {
                let uncle = self.nodes[grand].right;
                if self.color(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[grand].color = Color::Red;
                    node = grand;
                } else {
                    if self.nodes[parent].right == Some(node) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let Some(p) = self.parent(node) else { break };
                    let Some(g) = self.parent(p) else { break };
                    self.nodes[p].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[grand].left;
                if self.color(uncle) == Color::Red {
                    self.nodes[parent].color = Color::Black;
                    self.set_color(uncle, Color::Black);
                    self.nodes[grand].color = Color::Red;
                    node = grand;
                } else {
                    if self.nodes[parent].left == Some(node) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let Some(p) = self.parent(node) else { break };
                    let Some(g) = self.parent(p) else { break };
                    self.nodes[p].color = Color::Black;
                    self.nodes[g].color = Color::Red;
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Unlink `node` and release its slot. `node`'s successor, if it takes
    /// `node`'s place, is moved as a node, not copied.
    fn remove_node(&mut self, node: NodeId) -> Option<(K, V)> {
        let (left, right) = (self.nodes[node].left, self.nodes[node].right);
        let splice = match (left, right) {
            (Some(_), Some(r)) => self.leftmost(r),
            _ => node,
        };
        let child = if splice == node {
            left.or(right)
        } else {
            self.nodes[splice].right
        };

        let mut child_parent = self.nodes[splice].parent;
        if let Some(c) = child {
            self.nodes[c].parent = child_parent;
        }
        self.replace_child(child_parent, splice, child);

        let splice_color = self.nodes[splice].color;
        if splice != node {
            let np = self.nodes[node].parent;
            self.replace_child(np, node, Some(splice));
            let (nl, nr, nc) = {
                let n = &self.nodes[node];
                (n.left, n.right, n.color)
            };
            let s = &mut self.nodes[splice];
            s.parent = np;
            s.left = nl;
            s.right = nr;
            s.color = nc;
            if let Some(l) = nl {
                self.nodes[l].parent = Some(splice);
            }
            if let Some(r) = nr {
                self.nodes[r].parent = Some(splice);
            }
            if child_parent == Some(node) {
                child_parent = Some(splice);
            }
        }

        if splice_color == Color::Black {
            self.delete_rebalance(child, child_parent);
        }

        let n = self.nodes.remove(node)?;
        Some((n.key, n.value))
    }

    /// Double-black repair. `node` may be `None`, so its parent is tracked
    /// alongside it.
    fn delete_rebalance(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && self.color(node) == Color::Black {
            let Some(p) = parent else { break };
            if self.nodes[p].left == node {
                let mut sibling = self.nodes[p].right;
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    sibling = self.nodes[p].right;
                }
                let Some(s) = sibling else {
                    node = Some(p);
                    parent = self.parent(p);
                    continue;
                };
                let (sl, sr) = (self.nodes[s].left, self.nodes[s].right);
                if self.color(sl) == Color::Black && self.color(sr) == Color::Black {
                    self.nodes[s].color = Color::Red;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    let mut s = s;
                    if self.color(sr) == Color::Black {
                        self.set_color(sl, Color::Black);
                        self.nodes[s].color = Color::Red;
                        self.rotate_right(s);
                        let Some(ns) = self.nodes[p].right else { break };
                        s = ns;
                    }
                    self.nodes[s].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let far = self.nodes[s].right;
                    self.set_color(far, Color::Black);
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.nodes[p].left;
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    sibling = self.nodes[p].left;
                }
                let Some(s) = sibling else {
                    node = Some(p);
                    parent = self.parent(p);
                    continue;
                };
                let (sl, sr) = (self.nodes[s].left, self.nodes[s].right);
                if self.color(sl) == Color::Black && self.color(sr) == Color::Black {
                    self.nodes[s].color = Color::Red;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    let mut s = s;
                    if self.color(sl) == Color::Black {
                        self.set_color(sr, Color::Black);
                        self.nodes[s].color = Color::Red;
                        self.rotate_left(s);
                        let Some(ns) = self.nodes[p].left else { break };
                        s = ns;
                    }
                    self.nodes[s].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let far = self.nodes[s].left;
                    self.set_color(far, Color::Black);
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }
        self.set_color(node, Color::Black);
    }

    pub fn first_key(&self) -> Option<&K> {
        self.first_node().map(|id| &self.nodes[id].key)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.last_node().map(|id| &self.nodes[id].key)
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.first_node().map(|id| {
            let n = &self.nodes[id];
            (&n.key, &n.value)
        })
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.last_node().map(|id| {
            let n = &self.nodes[id];
            (&n.key, &n.value)
        })
    }

    /// In-order scan.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        log::trace!("tree_map: clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter {
            map: self,
            next: self.first_node(),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn value_cursor(&mut self) -> TreeValueCursor<'_, K, V, O> {
        let next = self.first_node();
        TreeValueCursor {
            map: self,
            next,
            last: None,
        }
    }
}

// Key-directed operations.
impl<K, V, O> OrderedMap<K, V, O> {
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = &self.nodes[id];
            cur = match self.order.compare(key, n.key.borrow()) {
                Ordering::Greater => n.right,
                Ordering::Less => n.left,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        self.find(key).is_some()
    }

    /// Insert `key -> value`. An equal key keeps its node and stored key;
    /// only the value is replaced and the previous one returned.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        O: KeyOrder<K>,
    {
        let mut parent = None;
        let mut cur = self.root;
        let mut side = Ordering::Equal;
        while let Some(id) = cur {
            parent = cur;
            side = self.order.compare(&key, &self.nodes[id].key);
            cur = match side {
                Ordering::Greater => self.nodes[id].right,
                Ordering::Less => self.nodes[id].left,
                Ordering::Equal => {
                    return Some(core::mem::replace(&mut self.nodes[id].value, value));
                }
            };
        }

        let id = self.nodes.insert(Node {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => {
                self.root = Some(id);
                self.nodes[id].color = Color::Black;
                return None;
            }
            Some(p) if side == Ordering::Greater => self.nodes[p].right = Some(id),
            Some(p) => self.nodes[p].left = Some(id),
        }
        self.insert_rebalance(id);
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        let id = self.find(key)?;
        self.remove_node(id).map(|(_, v)| v)
    }
}

#[cfg(test)]
impl<K, V, O> OrderedMap<K, V, O>
where
    O: KeyOrder<K>,
{
    /// Walk the whole tree and assert the red-black and search-tree
    /// invariants. Returns the black height.
    pub(crate) fn validate(&self) -> usize {
        let Some(root) = self.root else {
            assert_eq!(self.nodes.len(), 0, "empty tree with live nodes");
            return 0;
        };
        assert_eq!(self.nodes[root].color, Color::Black, "red root");
        assert_eq!(self.nodes[root].parent, None, "root has a parent");
        let (bh, count) = self.validate_subtree(root);
        assert_eq!(count, self.nodes.len(), "unreachable nodes");
        bh
    }

    fn validate_subtree(&self, id: NodeId) -> (usize, usize) {
        let n = &self.nodes[id];
        let mut heights = [0usize; 2];
        let mut count = 1;
        for (i, child) in [n.left, n.right].into_iter().enumerate() {
            let Some(c) = child else {
                heights[i] = 1;
                continue;
            };
            let cn = &self.nodes[c];
            assert_eq!(cn.parent, Some(id), "broken parent link");
            if n.color == Color::Red {
                assert_eq!(cn.color, Color::Black, "red node with red child");
            }
            let expected = if i == 0 {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            assert_eq!(self.order.compare(&cn.key, &n.key), expected, "order violated");
            let (h, k) = self.validate_subtree(c);
            heights[i] = h;
            count += k;
        }
        assert_eq!(heights[0], heights[1], "unequal black height");
        let own = usize::from(n.color == Color::Black);
        (heights[0] + own, count)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, O> fmt::Debug for OrderedMap<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Ascending iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V, O> {
    map: &'a OrderedMap<K, V, O>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, O> Iterator for Iter<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let map = self.map;
        self.next = map.successor(id);
        self.remaining -= 1;
        let n = &map.nodes[id];
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, O> ExactSizeIterator for Iter<'a, K, V, O> {}

/// In-order value cursor. The successor of each yielded node is computed
/// before the node can be removed.
pub struct TreeValueCursor<'a, K, V, O> {
    map: &'a mut OrderedMap<K, V, O>,
    next: Option<NodeId>,
    last: Option<NodeId>,
}

impl<'a, K, V, O> TreeValueCursor<'a, K, V, O> {
    fn advance(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.last = Some(id);
        self.next = self.map.successor(id);
        Some(id)
    }

    /// Key of the entry last returned by `next`.
    pub fn current_key(&self) -> Option<&K> {
        let id = self.last?;
        self.map.nodes.get(id).map(|n| &n.key)
    }
}

impl<'a, K, V, O> Cursor for TreeValueCursor<'a, K, V, O> {
    type Item = V;

    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next(&mut self) -> Option<&V> {
        let id = self.advance()?;
        Some(&self.map.nodes[id].value)
    }

    fn next_mut(&mut self) -> Option<&mut V> {
        let id = self.advance()?;
        Some(&mut self.map.nodes[id].value)
    }

    fn remove_current(&mut self) -> Result<V, RemoveError> {
        let id = self.last.take().ok_or(RemoveError::NoCurrent)?;
        if !self.map.nodes.contains_key(id) {
            return Err(RemoveError::NoCurrent);
        }
        self.map
            .remove_node(id)
            .map(|(_, v)| v)
            .ok_or(RemoveError::NoCurrent)
    }

    fn restart(&mut self) {
        self.next = self.map.first_node();
        self.last = None;
    }
}
