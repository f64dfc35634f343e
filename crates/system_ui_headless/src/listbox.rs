//! Roving highlight and typeahead for listbox-style option lists.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keyboard movement within a list.
pub enum NavKey {
    /// Next enabled option, wrapping.
    Next,
    /// Previous enabled option, wrapping.
    Previous,
    /// First enabled option.
    First,
    /// Last enabled option.
    Last,
}

impl NavKey {
    /// Maps a `KeyboardEvent.key` value to a movement.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Self::Next),
            "ArrowUp" => Some(Self::Previous),
            "Home" | "PageUp" => Some(Self::First),
            "End" | "PageDown" => Some(Self::Last),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Highlight state over a list whose options may be disabled.
pub struct ListNavigator {
    disabled: Vec<bool>,
    highlighted: Option<usize>,
}

impl ListNavigator {
    /// Creates a navigator highlighting `selected` when enabled, else the first enabled option.
    pub fn new(disabled: Vec<bool>, selected: Option<usize>) -> Self {
        let mut navigator = Self {
            disabled,
            highlighted: None,
        };
        navigator.highlighted = selected
            .filter(|index| navigator.is_enabled(*index))
            .or_else(|| navigator.edge(true));
        navigator
    }

    /// Highlighted option index.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Returns `true` when `index` exists and is not disabled.
    pub fn is_enabled(&self, index: usize) -> bool {
        self.disabled.get(index).is_some_and(|disabled| !disabled)
    }

    /// Highlights `index` (pointer hover). Disabled or missing indexes are ignored.
    pub fn highlight(&mut self, index: usize) -> bool {
        if self.is_enabled(index) {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }

    /// Applies a movement and returns the new highlight.
    pub fn apply(&mut self, key: NavKey) -> Option<usize> {
        let next = match key {
            NavKey::First => self.edge(true),
            NavKey::Last => self.edge(false),
            NavKey::Next => self.step(1),
            NavKey::Previous => self.step(-1),
        };
        if next.is_some() {
            self.highlighted = next;
        }
        self.highlighted
    }

    fn edge(&self, first: bool) -> Option<usize> {
        let mut indexes = 0..self.disabled.len();
        if first {
            indexes.find(|index| self.is_enabled(*index))
        } else {
            indexes.rev().find(|index| self.is_enabled(*index))
        }
    }

    fn step(&self, delta: i64) -> Option<usize> {
        let Some(current) = self.highlighted else {
            return self.edge(delta > 0);
        };
        let len = self.disabled.len() as i64;
        if len == 0 {
            return None;
        }
        (1..=len)
            .map(|offset| (current as i64 + delta * offset).rem_euclid(len) as usize)
            .find(|index| self.is_enabled(*index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Accumulates typed characters into a prefix query that resets after an idle period.
pub struct Typeahead {
    buffer: String,
    last_input_ms: Option<u64>,
    reset_ms: u64,
}

impl Typeahead {
    /// Creates an empty query buffer.
    pub fn new(reset_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            last_input_ms: None,
            reset_ms,
        }
    }

    /// Appends `ch` at time `now_ms` and returns the current query.
    pub fn push(&mut self, ch: char, now_ms: u64) -> &str {
        let expired = self
            .last_input_ms
            .is_some_and(|last| now_ms.saturating_sub(last) > self.reset_ms);
        if expired {
            self.buffer.clear();
        }
        self.buffer.extend(ch.to_lowercase());
        self.last_input_ms = Some(now_ms);
        &self.buffer
    }

    /// Finds the option to highlight for `query`.
    ///
    /// A single-character query cycles through matches after the current highlight; longer
    /// queries keep the current option while it still matches.
    pub fn find(
        query: &str,
        labels: &[String],
        navigator: &ListNavigator,
    ) -> Option<usize> {
        if query.is_empty() || labels.is_empty() {
            return None;
        }
        let len = labels.len();
        let start = match navigator.highlighted() {
            Some(current) if query.chars().count() == 1 => current + 1,
            Some(current) => current,
            None => 0,
        };
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|index| {
                navigator.is_enabled(*index) && labels[*index].to_lowercase().starts_with(query)
            })
    }
}
