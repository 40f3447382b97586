//! Line item tree engine
//!
//! `LineItemTree` is the forest of top-level line items of a budget. Every
//! edit returns a new tree and leaves the receiver untouched, so callers can
//! keep the previous state around (or simply replace it).
//!
//! The containment invariant (a node's children should not exceed its own
//! amount) is never enforced on write. Trees may be transiently invalid and
//! stay fully editable; the aggregate queries below report the problems.
//!
//! Aggregates are recomputed from scratch on every call. Trees are expected
//! to hold tens of nodes, so there is no incremental bookkeeping.

use serde::{Deserialize, Serialize};

use super::ids::LineItemId;
use super::line_item::{CostType, LineItem, LineItemUpdate};
use super::money::Money;

/// Top-level amounts bucketed by cost type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CostSplit {
    pub soft: Money,
    pub hard: Money,
    pub uncategorized: Money,
}

impl CostSplit {
    /// Sum of all three buckets
    pub fn total(&self) -> Money {
        self.soft + self.hard + self.uncategorized
    }
}

/// The forest of line items belonging to one budget.
///
/// Always holds at least one top-level item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItemTree {
    items: Vec<LineItem>,
}

impl LineItemTree {
    /// Create a tree holding a single empty line item
    pub fn new() -> Self {
        Self {
            items: vec![LineItem::new()],
        }
    }

    /// Build a tree from top-level items; an empty list gets one blank item
    pub fn from_items(items: Vec<LineItem>) -> Self {
        if items.is_empty() {
            Self::new()
        } else {
            Self { items }
        }
    }

    /// Top-level items in display order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Find a node anywhere in the forest
    pub fn find(&self, id: LineItemId) -> Option<&LineItem> {
        self.iter().map(|(_, item)| item).find(|item| item.id == id)
    }

    /// Whether a node with this id exists anywhere in the forest
    pub fn contains(&self, id: LineItemId) -> bool {
        self.find(id).is_some()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Depth-first, pre-order traversal yielding `(depth, item)`
    pub fn iter(&self) -> Walk<'_> {
        Walk {
            stack: self.items.iter().rev().map(|item| (0, item)).collect(),
        }
    }

    /// Append a fresh empty item under `parent_id`, or at the top level.
    ///
    /// Children inherit the parent's cost type and linked entities. An unknown
    /// `parent_id` leaves the tree unchanged and returns `None` for the id.
    pub fn add(&self, parent_id: Option<LineItemId>) -> (Self, Option<LineItemId>) {
        let mut next = self.clone();

        let Some(parent_id) = parent_id else {
            let item = LineItem::new();
            let id = item.id;
            next.items.push(item);
            return (next, Some(id));
        };

        match find_mut(&mut next.items, parent_id) {
            Some(parent) => {
                let child = parent.child_template();
                let id = child.id;
                parent.children.push(child);
                (next, Some(id))
            }
            None => (next, None),
        }
    }

    /// Remove a node and its whole subtree.
    ///
    /// The sole top-level item, when it has no children, is reset to a blank
    /// item with the same id instead of being removed. If a removal would
    /// otherwise leave no top-level item, a fresh blank one is inserted.
    pub fn remove(&self, id: LineItemId) -> Self {
        if let [only] = self.items.as_slice() {
            if only.id == id && !only.has_children() {
                return Self {
                    items: vec![LineItem::with_id(id)],
                };
            }
        }

        let mut next = self.clone();
        remove_from(&mut next.items, id);
        if next.items.is_empty() {
            next.items.push(LineItem::new());
        }
        next
    }

    /// Apply a field update to the node `id`; unknown ids are a no-op
    pub fn update(&self, id: LineItemId, update: LineItemUpdate) -> Self {
        let mut next = self.clone();
        if let Some(item) = find_mut(&mut next.items, id) {
            item.apply(update);
        }
        next
    }

    /// Sum of the top-level amounts.
    ///
    /// Children are not added again: they are already part of their parent's
    /// own amount.
    pub fn top_level_total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Top-level amounts bucketed by cost type
    pub fn cost_split(&self) -> CostSplit {
        self.items
            .iter()
            .fold(CostSplit::default(), |mut split, item| {
                match item.cost_type {
                    Some(CostType::Soft) => split.soft += item.amount,
                    Some(CostType::Hard) => split.hard += item.amount,
                    None => split.uncategorized += item.amount,
                }
                split
            })
    }

    /// Sum of every negative node overflow in the forest (zero or negative)
    pub fn total_negative_overflow(&self) -> Money {
        self.iter()
            .map(|(_, item)| item.overflow())
            .filter(Money::is_negative)
            .sum()
    }

    /// Whether any node's children exceed its own amount
    pub fn has_negative_overflow(&self) -> bool {
        self.iter().any(|(_, item)| item.overflow().is_negative())
    }

    /// Whether any node has at least one child
    pub fn has_any_nested_items(&self) -> bool {
        self.items.iter().any(LineItem::has_children)
    }
}

impl Default for LineItemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<LineItem>> for LineItemTree {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<LineItemTree> for Vec<LineItem> {
    fn from(tree: LineItemTree) -> Self {
        tree.items
    }
}

impl<'a> IntoIterator for &'a LineItemTree {
    type Item = (usize, &'a LineItem);
    type IntoIter = Walk<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over a `LineItemTree`
pub struct Walk<'a> {
    stack: Vec<(usize, &'a LineItem)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a LineItem);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, item) = self.stack.pop()?;
        self.stack
            .extend(item.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, item))
    }
}

fn find_mut(items: &mut [LineItem], id: LineItemId) -> Option<&mut LineItem> {
    for item in items.iter_mut() {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_from(items: &mut Vec<LineItem>, id: LineItemId) -> bool {
    let before = items.len();
    items.retain(|item| item.id != id);
    if items.len() != before {
        return true;
    }
    items
        .iter_mut()
        .any(|item| remove_from(&mut item.children, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn item(amount: i64) -> LineItem {
        LineItem::new().with_amount(units(amount))
    }

    /// One root item of 1000 with the given child amounts
    fn scenario(children: &[i64]) -> LineItemTree {
        LineItemTree::from_items(vec![
            item(1000).with_children(children.iter().map(|a| item(*a)).collect())
        ])
    }

    #[test]
    fn test_new_tree_has_one_blank_item() {
        let tree = LineItemTree::new();
        assert_eq!(tree.items().len(), 1);
        assert!(tree.items()[0].amount.is_zero());
    }

    #[test]
    fn test_empty_input_gets_blank_item() {
        let tree: LineItemTree = serde_json::from_str("[]").unwrap();
        assert_eq!(tree.items().len(), 1);
    }

    #[test]
    fn test_unallocated_headroom_is_not_an_error() {
        let tree = scenario(&[600, 300]);
        assert_eq!(tree.items()[0].overflow(), units(100));
        assert!(!tree.has_negative_overflow());
        assert_eq!(tree.total_negative_overflow(), Money::zero());
    }

    #[test]
    fn test_over_allocation_is_flagged() {
        let tree = scenario(&[600, 500]);
        assert_eq!(tree.items()[0].overflow(), units(-100));
        assert!(tree.has_negative_overflow());
        assert_eq!(tree.total_negative_overflow(), units(-100));
    }

    #[test]
    fn test_negative_overflow_found_at_depth() {
        let deep = item(100).with_children(vec![item(80), item(70)]);
        let tree = LineItemTree::from_items(vec![
            item(1000).with_children(vec![deep, item(200)]),
            item(50).with_children(vec![item(60)]),
        ]);
        assert!(tree.has_negative_overflow());
        // -50 from the nested node, -10 from the second root
        assert_eq!(tree.total_negative_overflow(), units(-60));
    }

    #[test]
    fn test_add_top_level() {
        let tree = LineItemTree::new();
        let (next, id) = tree.add(None);
        let id = id.unwrap();
        assert_eq!(next.items().len(), 2);
        assert_eq!(next.items()[1].id, id);
        // input untouched
        assert_eq!(tree.items().len(), 1);
    }

    #[test]
    fn test_add_child_inherits_cost_type_and_links() {
        let entity = EntityId::new();
        let mut root = item(500).named("Construction").with_cost_type(Some(CostType::Hard));
        root.linked_entity_ids = vec![entity];
        let root_id = root.id;
        let tree = LineItemTree::from_items(vec![root]);

        let (next, child_id) = tree.add(Some(root_id));
        let child = next.find(child_id.unwrap()).unwrap();
        assert_eq!(child.cost_type, Some(CostType::Hard));
        assert_eq!(child.linked_entity_ids, vec![entity]);
        assert!(child.amount.is_zero());
        assert!(child.name.is_empty());
        assert_eq!(next.items()[0].children.len(), 1);
    }

    #[test]
    fn test_add_nested_grandchild() {
        let tree = scenario(&[600]);
        let child_id = tree.items()[0].children[0].id;
        let (next, grandchild) = tree.add(Some(child_id));
        assert_eq!(next.items()[0].children[0].children[0].id, grandchild.unwrap());
        assert!(next.has_any_nested_items());
    }

    #[test]
    fn test_add_unknown_parent_is_noop() {
        let tree = scenario(&[600]);
        let (next, id) = tree.add(Some(LineItemId::new()));
        assert!(id.is_none());
        assert_eq!(next, tree);
    }

    #[test]
    fn test_remove_nested_subtree() {
        let tree = scenario(&[600, 300]);
        let target = tree.items()[0].children[0].id;
        let next = tree.remove(target);
        assert_eq!(next.items()[0].children.len(), 1);
        assert!(!next.contains(target));
        assert!(tree.contains(target));
    }

    #[test]
    fn test_remove_then_add_does_not_resurrect_children() {
        let tree = LineItemTree::from_items(vec![item(100), scenario(&[600, 300]).items()[0].clone()]);
        let parent_id = tree.items()[1].id;
        let removed_children: Vec<_> = tree.items()[1].children.iter().map(|c| c.id).collect();

        let next = tree.remove(parent_id);
        let (next, _) = next.add(None);

        assert_eq!(next.items().len(), 2);
        for id in removed_children {
            assert!(!next.contains(id));
        }
        assert!(!next.items()[1].has_children());
    }

    #[test]
    fn test_removing_sole_item_resets_it() {
        let original = item(250).named("Permits").with_cost_type(Some(CostType::Soft));
        let id = original.id;
        let tree = LineItemTree::from_items(vec![original]);

        let next = tree.remove(id);
        assert_eq!(next.items().len(), 1);
        assert_eq!(next.items()[0], LineItem::with_id(id));
    }

    #[test]
    fn test_removing_sole_item_with_children_leaves_fresh_item() {
        let tree = scenario(&[600]);
        let id = tree.items()[0].id;
        let next = tree.remove(id);
        assert_eq!(next.items().len(), 1);
        assert_ne!(next.items()[0].id, id);
        assert!(!next.has_any_nested_items());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let tree = scenario(&[600]);
        assert_eq!(tree.remove(LineItemId::new()), tree);
    }

    #[test]
    fn test_update_nested_field() {
        let tree = scenario(&[600, 300]);
        let target = tree.items()[0].children[1].id;
        let next = tree.update(target, LineItemUpdate::SetAmount(units(500)));
        assert_eq!(next.find(target).unwrap().amount, units(500));
        assert_eq!(tree.find(target).unwrap().amount, units(300));
        assert!(next.has_negative_overflow());
    }

    #[test]
    fn test_top_level_total_ignores_children() {
        let tree = LineItemTree::from_items(vec![
            item(1000).with_children(vec![item(600), item(300)]),
            item(250),
        ]);
        assert_eq!(tree.top_level_total(), units(1250));
    }

    #[test]
    fn test_top_level_total_is_order_independent() {
        let items = vec![item(10), item(250), item(3000)];
        let mut reversed = items.clone();
        reversed.reverse();
        assert_eq!(
            LineItemTree::from_items(items).top_level_total(),
            LineItemTree::from_items(reversed).top_level_total()
        );
    }

    #[test]
    fn test_cost_split_matches_total() {
        let tree = LineItemTree::from_items(vec![
            item(1000)
                .with_cost_type(Some(CostType::Hard))
                .with_children(vec![item(400).with_cost_type(Some(CostType::Soft))]),
            item(300).with_cost_type(Some(CostType::Soft)),
            item(200),
        ]);
        let split = tree.cost_split();
        assert_eq!(split.hard, units(1000));
        assert_eq!(split.soft, units(300));
        assert_eq!(split.uncategorized, units(200));
        assert_eq!(split.total(), tree.top_level_total());
    }

    #[test]
    fn test_walk_is_depth_first() {
        let tree = LineItemTree::from_items(vec![
            item(1).with_children(vec![item(2).with_children(vec![item(3)]), item(4)]),
            item(5),
        ]);
        let walked: Vec<_> = tree.iter().map(|(d, i)| (d, i.amount.units())).collect();
        assert_eq!(walked, vec![(0, 1), (1, 2), (2, 3), (1, 4), (0, 5)]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_has_any_nested_items() {
        assert!(!LineItemTree::new().has_any_nested_items());
        assert!(scenario(&[1]).has_any_nested_items());
    }

    #[test]
    fn test_serialization_round_trip_keeps_structure() {
        let tree = scenario(&[600, 300]);
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.starts_with('['));
        let back: LineItemTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
