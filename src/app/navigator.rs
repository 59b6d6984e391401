//! Cascading boxes: a LIFO stack of views, each drawn a little further
//! inside the one below it.

/// Depth at which the insets bottom out.
pub const MAX_BOX_LEVELS: usize = 4;

const HORIZONTAL_STEP: u16 = 3;
const VERTICAL_STEP: u16 = 2;

/// Margins, in cells, between the screen edge and a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inset {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxEntry<V> {
    pub view: V,
    /// 1 for the root box.
    pub depth: usize,
}

impl<V> BoxEntry<V> {
    pub fn inset(&self, max_depth: usize) -> Inset {
        inset_for(self.depth, max_depth)
    }
}

/// Inset of the box at `depth`. Boxes deeper than `max_depth` reuse the
/// innermost inset instead of running the right/bottom margins negative.
pub fn inset_for(depth: usize, max_depth: usize) -> Inset {
    let max_depth = max_depth.max(1);
    let level = depth.clamp(1, max_depth) - 1;
    let remaining = max_depth - level - 1;

    Inset {
        left: level as u16 * HORIZONTAL_STEP,
        right: remaining as u16 * HORIZONTAL_STEP,
        top: level as u16 * VERTICAL_STEP,
        bottom: remaining as u16 * VERTICAL_STEP,
    }
}

#[derive(Debug, Clone)]
pub struct Navigator<V> {
    stack: Vec<BoxEntry<V>>,
    max_depth: usize,
}

impl<V> Navigator<V> {
    /// A navigator showing only `root`.
    pub fn new(root: V) -> Self {
        Self::with_max_depth(root, MAX_BOX_LEVELS)
    }

    pub fn with_max_depth(root: V, max_depth: usize) -> Self {
        Self {
            stack: vec![BoxEntry {
                view: root,
                depth: 1,
            }],
            max_depth: max_depth.max(1),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Pushes `view` above the current top. Going past `max_depth` is
    /// allowed; only the drawing position stops moving inward.
    pub fn open_box(&mut self, view: V) {
        let depth = self.stack.len() + 1;
        if depth > self.max_depth {
            tracing::debug!("Box depth {} exceeds {}, inset clamped", depth, self.max_depth);
        }
        tracing::debug!("Open box at depth {}", depth);
        self.stack.push(BoxEntry { view, depth });
    }

    /// Pops the top box. The root box is never popped; `None` then.
    pub fn close_top(&mut self) -> Option<V> {
        if self.stack.len() <= 1 {
            return None;
        }
        let entry = self.stack.pop()?;
        tracing::debug!("Close box at depth {}", entry.depth);
        Some(entry.view)
    }

    pub fn top(&self) -> &V {
        &self.top_entry().view
    }

    pub fn top_mut(&mut self) -> &mut V {
        let last = self.stack.len() - 1;
        &mut self.stack[last].view
    }

    pub fn top_entry(&self) -> &BoxEntry<V> {
        // The root entry is never removed.
        &self.stack[self.stack.len() - 1]
    }

    /// Bottom to top, i.e. drawing order.
    pub fn entries(&self) -> impl Iterator<Item = &BoxEntry<V>> {
        self.stack.iter()
    }
}
