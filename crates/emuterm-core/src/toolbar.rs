#![forbid(unsafe_code)]

//! Adaptive key toolbar: which buttons fit, and where they go.
//!
//! Each [`KeyDescriptor`] carries a priority. Priority 0 is always shown;
//! higher numbers are dropped first when the bar gets narrow.
//!
//! # Invariants
//!
//! 1. The visible set is `{ d | d.priority <= cutoff }` for a single cutoff,
//!    so ties are kept or dropped together.
//! 2. The cutoff is the largest priority whose subset gives buttons at least
//!    `min_button_width` wide, or 0 if none does. Priority-0 keys are therefore
//!    visible at every width.
//! 3. Shrinking the width never grows the visible set.
//! 4. Visible widths are whole points and sum to `floor(available width)`.
//! 5. Hidden buttons get no frame at all, so they can't be hit.
//!
//! # Failure Modes
//!
//! None. Degenerate widths (negative, NaN) are treated as zero.

use crate::geometry::{Insets, Rect, sanitize_length};
use crate::input::LogicalKey;

/// Default minimum width for a toolbar button, in points.
pub const DEFAULT_MIN_BUTTON_WIDTH: f64 = 44.0;

/// Default toolbar height, excluding the bottom safe-area inset.
pub const DEFAULT_TOOLBAR_HEIGHT: f64 = 44.0;

/// One toolbar button: which key it sends, what it shows, how expendable it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDescriptor {
    pub key: LogicalKey,
    pub label: &'static str,
    pub priority: u32,
}

impl KeyDescriptor {
    #[must_use]
    pub const fn new(key: LogicalKey, label: &'static str, priority: u32) -> Self {
        Self {
            key,
            label,
            priority,
        }
    }
}

/// The shipped toolbar.
pub const DEFAULT_DESCRIPTORS: [KeyDescriptor; 10] = [
    KeyDescriptor::new(LogicalKey::Escape, "esc", 0),
    KeyDescriptor::new(LogicalKey::Control, "^", 0),
    KeyDescriptor::new(LogicalKey::Alternate, "⎇", 2),
    KeyDescriptor::new(LogicalKey::Tab, "⇥", 1),
    KeyDescriptor::new(LogicalKey::Home, "↖", 3),
    KeyDescriptor::new(LogicalKey::End, "↘", 3),
    KeyDescriptor::new(LogicalKey::ArrowLeft, "←", 0),
    KeyDescriptor::new(LogicalKey::ArrowUp, "↑", 0),
    KeyDescriptor::new(LogicalKey::ArrowDown, "↓", 0),
    KeyDescriptor::new(LogicalKey::ArrowRight, "→", 0),
];

/// Result of the priority-cutoff search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleSet {
    /// Largest priority still shown; `None` when nothing is shown.
    pub cutoff: Option<u32>,
    /// Indices into the descriptor table, in table order.
    pub indices: Vec<usize>,
}

/// Pick the largest priority cutoff whose buttons are at least
/// `min_button_width` wide when sharing `available_width`.
///
/// Cutoffs are tried from the largest priority in the table downward. The
/// search stops at the first subset that fits, or at cutoff 0, which is
/// accepted regardless of width. A table without priority-0 entries can end
/// up with an empty set.
#[must_use]
pub fn select_visible(
    descriptors: &[KeyDescriptor],
    available_width: f64,
    min_button_width: f64,
) -> VisibleSet {
    let width = sanitize_length(available_width);

    let mut levels: Vec<u32> = descriptors.iter().map(|d| d.priority).collect();
    levels.sort_unstable_by(|a, b| b.cmp(a));
    levels.dedup();

    for cutoff in levels {
        let indices: Vec<usize> = descriptors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.priority <= cutoff)
            .map(|(i, _)| i)
            .collect();
        let candidate = width / indices.len() as f64;
        if candidate >= min_button_width || cutoff == 0 {
            return VisibleSet {
                cutoff: Some(cutoff),
                indices,
            };
        }
    }

    VisibleSet::default()
}

/// Split `width` into `count` whole-point slots.
///
/// Slot `i` spans `[floor(i*w/n), floor((i+1)*w/n))`, which is the same as
/// giving each slot `floor(ideal + carry)` and carrying the fractional
/// remainder into the next one. Computing from the cumulative edge keeps
/// floating-point error from accumulating across slots.
#[must_use]
pub fn distribute_widths(width: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let width = sanitize_length(width);
    let total = width.floor();
    let n = count as f64;

    let mut widths = Vec::with_capacity(count);
    let mut previous = 0.0;
    for i in 1..=count {
        let edge = if i == count {
            total
        } else {
            ((i as f64 * width) / n).floor().min(total)
        };
        widths.push(edge - previous);
        previous = edge;
    }
    widths
}

/// Host-reported toolbar geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolbarGeometry {
    /// Full width of the toolbar view.
    pub width: f64,
    /// Full height of the toolbar view, including the bottom safe area.
    pub height: f64,
    /// Safe-area insets inside the view.
    pub safe_area: Insets,
}

impl ToolbarGeometry {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            safe_area: Insets::ZERO,
        }
    }

    #[must_use]
    pub const fn with_safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self
    }

    /// Width left for buttons after the side insets.
    #[must_use]
    pub fn available_width(&self) -> f64 {
        sanitize_length(self.width - self.safe_area.horizontal())
    }

    /// Height of each button (the bottom inset is left empty).
    #[must_use]
    pub fn button_height(&self) -> f64 {
        sanitize_length(self.height - self.safe_area.bottom)
    }
}

/// A visible button and its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedButton {
    /// Index into the descriptor table.
    pub index: usize,
    pub descriptor: KeyDescriptor,
    pub frame: Rect,
}

/// Derived layout for one geometry. Recomputed on every size change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolbarLayout {
    pub cutoff: Option<u32>,
    pub buttons: Vec<PlacedButton>,
}

impl ToolbarLayout {
    /// Lay out `descriptors` for `geometry`.
    #[must_use]
    pub fn compute(
        descriptors: &[KeyDescriptor],
        geometry: ToolbarGeometry,
        min_button_width: f64,
    ) -> Self {
        let available = geometry.available_width();
        let visible = select_visible(descriptors, available, min_button_width);
        let widths = distribute_widths(available, visible.indices.len());
        let height = geometry.button_height();

        let mut x = geometry.safe_area.left;
        let buttons = visible
            .indices
            .iter()
            .zip(widths)
            .map(|(&index, width)| {
                let frame = Rect::new(x, 0.0, width, height);
                x += width;
                PlacedButton {
                    index,
                    descriptor: descriptors[index],
                    frame,
                }
            })
            .collect();

        Self {
            cutoff: visible.cutoff,
            buttons,
        }
    }

    /// Visible keys, in table order.
    pub fn visible_keys(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        self.buttons.iter().map(|b| b.descriptor.key)
    }

    #[must_use]
    pub fn is_visible(&self, key: LogicalKey) -> bool {
        self.buttons.iter().any(|b| b.descriptor.key == key)
    }

    /// The visible button under `(x, y)`, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&PlacedButton> {
        self.buttons.iter().find(|b| b.frame.contains(x, y))
    }

    /// Sum of the visible button widths.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.buttons.iter().map(|b| b.frame.width).sum()
    }

    fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.buttons.iter().map(|b| b.index)
    }
}

/// The toolbar component: a fixed descriptor table plus the cached layout.
#[derive(Debug, Clone)]
pub struct KeyToolbar {
    descriptors: Vec<KeyDescriptor>,
    min_button_width: f64,
    bar_height: f64,
    geometry: Option<ToolbarGeometry>,
    layout: ToolbarLayout,
}

impl Default for KeyToolbar {
    fn default() -> Self {
        Self::new(
            DEFAULT_DESCRIPTORS.to_vec(),
            DEFAULT_MIN_BUTTON_WIDTH,
            DEFAULT_TOOLBAR_HEIGHT,
        )
    }
}

impl KeyToolbar {
    #[must_use]
    pub fn new(descriptors: Vec<KeyDescriptor>, min_button_width: f64, bar_height: f64) -> Self {
        Self {
            descriptors,
            min_button_width,
            bar_height,
            geometry: None,
            layout: ToolbarLayout::default(),
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &[KeyDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub const fn min_button_width(&self) -> f64 {
        self.min_button_width
    }

    /// Height the host should give the toolbar view for the given safe area.
    #[must_use]
    pub fn preferred_height(&self, safe_area: Insets) -> f64 {
        self.bar_height + sanitize_length(safe_area.bottom)
    }

    /// Recompute the layout for a new geometry.
    ///
    /// Returns `true` when the set of visible buttons changed.
    pub fn resize(&mut self, geometry: ToolbarGeometry) -> bool {
        let layout = ToolbarLayout::compute(&self.descriptors, geometry, self.min_button_width);
        let changed = !layout.indices().eq(self.layout.indices());
        if layout.cutoff != self.layout.cutoff {
            tracing::debug!(
                previous = ?self.layout.cutoff,
                cutoff = ?layout.cutoff,
                visible = layout.buttons.len(),
                width = geometry.available_width(),
                "toolbar cutoff changed"
            );
        }
        self.geometry = Some(geometry);
        self.layout = layout;
        changed
    }

    /// The last computed layout (empty until the first [`resize`](Self::resize)).
    #[must_use]
    pub fn layout(&self) -> &ToolbarLayout {
        &self.layout
    }

    #[must_use]
    pub fn geometry(&self) -> Option<ToolbarGeometry> {
        self.geometry
    }

    #[must_use]
    pub fn is_visible(&self, key: LogicalKey) -> bool {
        self.layout.is_visible(key)
    }

    /// Key of the visible button under `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<LogicalKey> {
        self.layout.hit_test(x, y).map(|b| b.descriptor.key)
    }

    /// Display label for `key`, if it is in the table.
    #[must_use]
    pub fn label(&self, key: LogicalKey) -> Option<&'static str> {
        self.descriptors
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.label)
    }
}
