// ABOUTME: ButtonBoard, the in-memory ordered list of buttons with placement and snapping rules.
// ABOUTME: Pure state container with no I/O; persistence is layered on top by the store crate.

use serde::Serialize;

use crate::button::{
    Button, ButtonDraft, ButtonPatch, DEFAULT_COLOR, DEFAULT_LABEL, PLACEHOLDER_URL, StoredButton,
};
use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH, GRID_UNIT, Rect, snap, snap_size};

/// Number of staircase slots tried before automatic placement gives up.
pub const PLACEMENT_ATTEMPTS: i64 = 10;

const SLOT_ORIGIN: i64 = GRID_UNIT;
const SLOT_STEP_X: i64 = 250;
const SLOT_STEP_Y: i64 = 100;

/// Columns used when repairing stored buttons that have no position.
const REPAIR_COLUMNS: i64 = 5;

/// The ordered set of buttons on the launcher board. Insertion order is
/// draw order: later buttons render on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ButtonBoard {
    buttons: Vec<Button>,
}

impl ButtonBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from persisted records, filling in anything older
    /// layouts did not store. Stored geometry is kept as-is; only missing
    /// values are derived.
    pub fn from_stored(stored: Vec<StoredButton>) -> Self {
        let buttons = stored
            .into_iter()
            .enumerate()
            .map(|(index, b)| repair(index as i64, b))
            .collect();
        Self { buttons }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Create a button from the draft, place it, append it, and return a
    /// copy of the stored record.
    ///
    /// An explicit `x`/`y` is snapped and used as given. A missing
    /// coordinate comes from [`ButtonBoard::free_slot`].
    pub fn add(&mut self, draft: ButtonDraft) -> Button {
        let (slot_x, slot_y) = self.free_slot();

        let button = Button {
            id: Button::new_id(),
            label: draft.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            url: draft.url.unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
            color: draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            x: draft.x.map(snap).unwrap_or(slot_x),
            y: draft.y.map(snap).unwrap_or(slot_y),
            width: draft.width.map(snap_size).unwrap_or(DEFAULT_WIDTH),
            height: draft.height.map(snap_size).unwrap_or(DEFAULT_HEIGHT),
        };

        tracing::debug!(id = %button.id, x = button.x, y = button.y, "button added");
        self.buttons.push(button.clone());
        button
    }

    /// Merge `patch` over the button with the given id. Position fields in
    /// the patch are snapped, size fields are snapped and clamped to the
    /// minimum. Returns false when no button has that id.
    pub fn update(&mut self, id: &str, patch: ButtonPatch) -> bool {
        let Some(button) = self.buttons.iter_mut().find(|b| b.id == id) else {
            return false;
        };

        if let Some(label) = patch.label {
            button.label = label;
        }
        if let Some(url) = patch.url {
            button.url = url;
        }
        if let Some(color) = patch.color {
            button.color = color;
        }
        if let Some(x) = patch.x {
            button.x = snap(x);
        }
        if let Some(y) = patch.y {
            button.y = snap(y);
        }
        if let Some(width) = patch.width {
            button.width = snap_size(width);
        }
        if let Some(height) = patch.height {
            button.height = snap_size(height);
        }

        tracing::debug!(id, "button updated");
        true
    }

    /// Remove the button with the given id. Returns false when nothing was
    /// removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.buttons.len();
        self.buttons.retain(|b| b.id != id);
        let removed = self.buttons.len() != before;
        if removed {
            tracing::debug!(id, "button deleted");
        }
        removed
    }

    /// Find a position for a new default-sized button.
    ///
    /// Walks the diagonal staircase of [`PLACEMENT_ATTEMPTS`] slots and
    /// returns the first one whose 200x80 footprint does not overlap an
    /// existing button. When every slot is taken the last slot tried is
    /// returned, even though it overlaps.
    pub fn free_slot(&self) -> (i64, i64) {
        let mut slot = staircase_slot(0);
        for i in 0..PLACEMENT_ATTEMPTS {
            slot = staircase_slot(i);
            let candidate = Rect::new(slot.0, slot.1, DEFAULT_WIDTH, DEFAULT_HEIGHT);
            if !self.buttons.iter().any(|b| b.rect().overlaps(&candidate)) {
                return slot;
            }
        }
        tracing::debug!(x = slot.0, y = slot.1, "no free slot, stacking on last candidate");
        slot
    }
}

fn staircase_slot(i: i64) -> (i64, i64) {
    (
        snap(SLOT_ORIGIN + i * SLOT_STEP_X),
        snap(SLOT_ORIGIN + i * SLOT_STEP_Y),
    )
}

fn repair(index: i64, stored: StoredButton) -> Button {
    let id = stored.id.unwrap_or_else(|| {
        tracing::warn!(index, "stored button has no id, assigning a new one");
        Button::new_id()
    });

    Button {
        id,
        label: stored.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        url: stored.url.unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
        color: stored.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        x: stored
            .x
            .unwrap_or_else(|| snap(SLOT_ORIGIN + (index % REPAIR_COLUMNS) * SLOT_STEP_X)),
        y: stored
            .y
            .unwrap_or_else(|| snap(SLOT_ORIGIN + (index / REPAIR_COLUMNS) * SLOT_STEP_Y)),
        width: stored.width.filter(|w| *w != 0).unwrap_or(DEFAULT_WIDTH),
        height: stored.height.filter(|h| *h != 0).unwrap_or(DEFAULT_HEIGHT),
    }
}
