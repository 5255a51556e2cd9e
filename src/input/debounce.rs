/// Edge reported by one debouncer tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DebounceEdge {
    None,
    Pressed,
    Released,
}

/// Per-button debounce state. Buttons are wired active low; a raw level
/// flip starts the stabilization window and any flip back restarts it,
/// so only a level that holds for the whole window becomes stable. The
/// press edge fires exactly once, on the tick the stable low is
/// confirmed.
pub(super) struct Debouncer {
    debounce_ms: u32,
    stable_low: bool,
    raw_low: bool,
    changed_at_ms: u32,
}

impl Debouncer {
    pub(super) fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            stable_low: false,
            raw_low: false,
            changed_at_ms: 0,
        }
    }

    pub(super) fn update(&mut self, now_ms: u32, raw_level_high: bool) -> DebounceEdge {
        let raw_low = !raw_level_high;
        if raw_low != self.raw_low {
            self.raw_low = raw_low;
            self.changed_at_ms = now_ms;
        }
        if self.raw_low != self.stable_low
            && now_ms.wrapping_sub(self.changed_at_ms) >= self.debounce_ms
        {
            self.stable_low = self.raw_low;
            return if self.stable_low {
                DebounceEdge::Pressed
            } else {
                DebounceEdge::Released
            };
        }
        DebounceEdge::None
    }

    pub(super) fn is_pressed(&self) -> bool {
        self.stable_low
    }
}
