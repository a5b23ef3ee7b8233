//! The tiling region tree: a binary space partition of the terminal screen
//! into panes, held as an arena of handles rather than owned pointers.
//!
//! Every interior node has exactly two children and no window; every leaf
//! has a window and no children. Splitting, closing, swapping, and
//! resizing all operate purely on the tree's geometry — no text buffer or
//! view state is known to this crate, which is why a leaf carries an
//! opaque [`WindowId`] instead of a concrete window type: the window arena
//! lives one layer up, in `mosaic-state`/`mosaic-view`.

use thiserror::Error;

pub const WINDOW_MINIMUM_WIDTH: i32 = 40;
pub const WINDOW_MINIMUM_HEIGHT: i32 = 10;

/// Opaque handle to whatever the owning layer considers a "window". This
/// crate never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("region has no parent to resize against")]
    NoParent,
    #[error("split would leave a pane below the minimum size")]
    WouldViolateMinimum,
}

#[derive(Debug, Clone)]
struct RegionNode {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    split: f32,
    stacked: bool,
    parent: Option<RegionId>,
    children: Option<[RegionId; 2]>,
    window: Option<WindowId>,
}

/// The full region tree for one terminal frame.
#[derive(Debug)]
pub struct LayoutTree {
    regions: Vec<Option<RegionNode>>,
    root: RegionId,
}

fn limit(x: i32, lower: i32, upper: i32) -> i32 {
    x.min(upper).max(lower)
}

impl LayoutTree {
    /// Creates a tree with a single leaf region covering the whole screen,
    /// holding `window`.
    pub fn new(width: i32, height: i32, window: WindowId) -> Self {
        let root_node = RegionNode {
            x: 0,
            y: 0,
            width,
            height,
            split: 0.5,
            stacked: false,
            parent: None,
            children: None,
            window: Some(window),
        };
        LayoutTree {
            regions: vec![Some(root_node)],
            root: RegionId(0),
        }
    }

    pub fn root(&self) -> RegionId {
        self.root
    }

    fn node(&self, id: RegionId) -> &RegionNode {
        self.regions[id.0].as_ref().expect("dangling RegionId")
    }

    fn node_mut(&mut self, id: RegionId) -> &mut RegionNode {
        self.regions[id.0].as_mut().expect("dangling RegionId")
    }

    fn alloc(&mut self, node: RegionNode) -> RegionId {
        self.regions.push(Some(node));
        RegionId(self.regions.len() - 1)
    }

    pub fn geometry(&self, id: RegionId) -> (i32, i32, i32, i32) {
        let n = self.node(id);
        (n.x, n.y, n.width, n.height)
    }

    pub fn window_of(&self, id: RegionId) -> Option<WindowId> {
        self.node(id).window
    }

    pub fn is_leaf(&self, id: RegionId) -> bool {
        self.node(id).window.is_some()
    }

    /// Splits `leaf` in two. The existing window stays in the first child;
    /// `new_window` is placed in the second. `vertical` stacks the two
    /// children top/bottom instead of side by side.
    pub fn split(
        &mut self,
        leaf: RegionId,
        vertical: bool,
        new_window: WindowId,
    ) -> Result<RegionId, LayoutError> {
        let (width, height) = {
            let n = self.node(leaf);
            (n.width, n.height)
        };
        let would_fit = if vertical {
            height / 2 >= WINDOW_MINIMUM_HEIGHT
        } else {
            width / 2 >= WINDOW_MINIMUM_WIDTH
        };
        if !would_fit {
            return Err(LayoutError::WouldViolateMinimum);
        }

        let existing_window = self.node(leaf).window.expect("split target must be a leaf");

        let left = self.alloc(RegionNode {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            split: 0.5,
            stacked: false,
            parent: Some(leaf),
            children: None,
            window: Some(existing_window),
        });
        let right = self.alloc(RegionNode {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            split: 0.5,
            stacked: false,
            parent: Some(leaf),
            children: None,
            window: Some(new_window),
        });

        let parent = self.node_mut(leaf);
        parent.window = None;
        parent.children = Some([left, right]);
        parent.split = 0.5;
        parent.stacked = vertical;

        self.resize_children(leaf);
        tracing::debug!(leaf = leaf.0, vertical, "split region");
        Ok(right)
    }

    /// Recomputes `region` and its descendants' geometry from its own
    /// `x`/`y`/`width`/`height`/`split`/`stacked` fields.
    fn resize_children(&mut self, region: RegionId) {
        if self.node(region).window.is_some() {
            return;
        }
        let [left, right] = self.node(region).children.expect("interior region");
        let (x, y, width, height, split, stacked) = {
            let n = self.node(region);
            (n.x, n.y, n.width, n.height, n.split, n.stacked)
        };

        if stacked {
            let h = limit(
                (height as f32 * split) as i32,
                WINDOW_MINIMUM_HEIGHT,
                height - WINDOW_MINIMUM_HEIGHT,
            );
            let actual_split = h as f32 / height as f32;
            self.node_mut(region).split = actual_split;

            {
                let l = self.node_mut(left);
                l.x = x;
                l.y = y;
                l.width = width;
                l.height = h;
            }
            {
                let r = self.node_mut(right);
                r.x = x;
                r.y = y + h;
                r.width = width;
                r.height = height - h;
            }
        } else {
            let w = limit(
                (width as f32 * split) as i32,
                WINDOW_MINIMUM_WIDTH,
                width - WINDOW_MINIMUM_WIDTH - 1,
            );
            let actual_split = w as f32 / width as f32;
            self.node_mut(region).split = actual_split;

            {
                let l = self.node_mut(left);
                l.x = x;
                l.y = y;
                l.width = w;
                l.height = height;
            }
            {
                let r = self.node_mut(right);
                r.x = x + w;
                r.y = y;
                r.width = width - w - 1;
                r.height = height;
            }
        }

        self.resize_children(left);
        self.resize_children(right);
    }

    /// Adjusts the split ratio of `leaf`'s parent by `amount` cells,
    /// doubled when the leaf is in a side-by-side (non-stacked) split to
    /// match the perceived resize speed of a stacked split.
    pub fn resize(&mut self, leaf: RegionId, amount: i32) -> Result<(), LayoutError> {
        let parent = self.node(leaf).parent.ok_or(LayoutError::NoParent)?;
        let (total, leaf_stacked) = {
            let p = self.node(parent);
            let total = if p.stacked { p.height } else { p.width };
            (total, self.node(leaf).stacked)
        };
        let amount = if !leaf_stacked { amount * 2 } else { amount };

        self.node_mut(parent).split += amount as f32 / total as f32;
        self.resize_children(parent);
        Ok(())
    }

    /// Swaps `leaf`'s position with its sibling.
    pub fn swap(&mut self, leaf: RegionId) {
        let Some(parent) = self.node(leaf).parent else {
            return;
        };
        let children = self.node(parent).children.expect("interior region");
        self.node_mut(parent).children = Some([children[1], children[0]]);
        self.resize_children(parent);
    }

    /// Removes `leaf`, collapsing its parent into the sibling subtree.
    /// Returns the window that should become focused (the next region in
    /// traversal order, computed before the removal) and the window that
    /// was closed.
    pub fn close(&mut self, leaf: RegionId) -> Option<(WindowId, WindowId)> {
        let parent_id = self.node(leaf).parent?;
        let closed_window = self.node(leaf).window.expect("close target must be a leaf");

        let next_focus = self.window_of(self.next_region(leaf));

        let children = self.node(parent_id).children.expect("interior region");
        let sibling = if children[0] == leaf { children[1] } else { children[0] };

        let sibling_children = self.node(sibling).children;
        let sibling_window = self.node(sibling).window;

        {
            let parent = self.node_mut(parent_id);
            parent.children = sibling_children;
            parent.window = sibling_window;
        }

        if let Some(grandchildren) = sibling_children {
            for child in grandchildren {
                self.node_mut(child).parent = Some(parent_id);
            }
        }

        self.regions[leaf.0] = None;
        self.regions[sibling.0] = None;

        self.resize_children(parent_id);
        tracing::debug!(closed = closed_window.0, "closed region");

        next_focus.map(|next| (next, closed_window))
    }

    fn recurse_left(&self, region: RegionId) -> RegionId {
        match self.node(region).children {
            Some([left, _]) => self.recurse_left(left),
            None => region,
        }
    }

    fn recurse_right(&self, region: RegionId) -> RegionId {
        match self.node(region).children {
            Some([_, right]) => self.recurse_right(right),
            None => region,
        }
    }

    /// The next leaf in the tree's depth-first traversal order, wrapping
    /// around from the last leaf back to the first.
    pub fn next_region(&self, region: RegionId) -> RegionId {
        match self.node(region).parent {
            None => self.recurse_left(region),
            Some(parent) => {
                let children = self.node(parent).children.expect("interior region");
                if children[0] == region {
                    self.recurse_left(children[1])
                } else {
                    self.next_region(parent)
                }
            }
        }
    }

    /// The previous leaf in the tree's depth-first traversal order,
    /// wrapping around from the first leaf back to the last.
    pub fn previous_region(&self, region: RegionId) -> RegionId {
        match self.node(region).parent {
            None => self.recurse_right(region),
            Some(parent) => {
                let children = self.node(parent).children.expect("interior region");
                if children[1] == region {
                    self.recurse_right(children[0])
                } else {
                    self.previous_region(parent)
                }
            }
        }
    }

    /// Every leaf region in the tree, in arena order (not traversal order).
    pub fn leaves(&self) -> Vec<RegionId> {
        self.regions
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().filter(|n| n.window.is_some()).map(|_| RegionId(i)))
            .collect()
    }

    /// Finds the leaf currently holding `window`, if any. Used to recover a
    /// region handle after an operation (like [`LayoutTree::close`]) that
    /// only hands back the window it affected.
    pub fn leaf_for_window(&self, window: WindowId) -> Option<RegionId> {
        self.regions
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.as_ref().is_some_and(|n| n.window == Some(window)))
            .map(|(i, _)| RegionId(i))
    }

    /// Resizes the whole tree to a new terminal size (on `SIGWINCH`/resize
    /// events).
    pub fn resize_root(&mut self, width: i32, height: i32) {
        let root = self.root;
        {
            let n = self.node_mut(root);
            n.x = 0;
            n.y = 0;
            n.width = width;
            n.height = height;
        }
        self.resize_children(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_single_leaf() {
        let tree = LayoutTree::new(100, 50, WindowId(0));
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.geometry(tree.root()), (0, 0, 100, 50));
    }

    #[test]
    fn split_vertical_divides_width() {
        let mut tree = LayoutTree::new(100, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        let root = tree.root();
        assert!(!tree.is_leaf(root));
        assert_eq!(tree.window_of(right), Some(WindowId(1)));
        let (_, _, lw, lh) = tree.geometry(tree.next_region(right));
        assert_eq!(lh, 50);
        assert!(lw < 100);
    }

    #[test]
    fn split_refuses_below_minimum() {
        let mut tree = LayoutTree::new(WINDOW_MINIMUM_WIDTH, 50, WindowId(0));
        let err = tree.split(tree.root(), false, WindowId(1)).unwrap_err();
        assert!(matches!(err, LayoutError::WouldViolateMinimum));
    }

    #[test]
    fn close_collapses_to_sibling() {
        let mut tree = LayoutTree::new(100, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        let (next, closed) = tree.close(right).unwrap();
        assert_eq!(closed, WindowId(1));
        assert_eq!(next, WindowId(0));
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.geometry(tree.root()), (0, 0, 100, 50));
    }

    #[test]
    fn swap_exchanges_windows_without_changing_geometry() {
        let mut tree = LayoutTree::new(100, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        let left = tree.next_region(right);
        let before_left_geom = tree.geometry(left);
        tree.swap(right);
        assert_eq!(tree.geometry(left), before_left_geom);
        assert_eq!(tree.window_of(left), Some(WindowId(1)));
    }

    #[test]
    fn traversal_wraps_around() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        let left = tree.next_region(right);
        assert_eq!(tree.next_region(right), left);
        assert_eq!(tree.previous_region(left), right);
    }

    #[test]
    fn resize_adjusts_split_and_keeps_minimum() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        tree.resize(right, -1000).unwrap();
        let left = tree.next_region(right);
        let (_, _, lw, _) = tree.geometry(left);
        assert!(lw >= WINDOW_MINIMUM_WIDTH);
    }

    #[test]
    fn resize_without_parent_errors() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        let err = tree.resize(tree.root(), 5).unwrap_err();
        assert!(matches!(err, LayoutError::NoParent));
    }

    #[test]
    fn leaves_lists_every_window() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        tree.split(tree.root(), false, WindowId(1)).unwrap();
        let mut windows: Vec<_> = tree.leaves().iter().map(|&r| tree.window_of(r).unwrap()).collect();
        windows.sort();
        assert_eq!(windows, vec![WindowId(0), WindowId(1)]);
    }

    #[test]
    fn leaf_for_window_finds_the_right_region() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        assert_eq!(tree.leaf_for_window(WindowId(1)), Some(right));
    }

    #[test]
    fn leaf_for_window_after_close_finds_merged_region() {
        let mut tree = LayoutTree::new(200, 50, WindowId(0));
        let right = tree.split(tree.root(), false, WindowId(1)).unwrap();
        let (next_focus, _closed) = tree.close(right).unwrap();
        let region = tree.leaf_for_window(next_focus).unwrap();
        assert_eq!(tree.window_of(region), Some(next_focus));
    }
}
