//! Operator selections that live only on the pendant.
//!
//! Every selection is a closed enum, so an index outside its range cannot
//! be stored.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
}

impl Axis {
    pub const COUNT: usize = 4;
    pub const ALL: [Self; Self::COUNT] = [Self::X, Self::Y, Self::Z, Self::A];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::A => "A",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JogIncrement {
    Tenth,
    One,
    Ten,
    Hundred,
}

impl JogIncrement {
    pub const ALL: [Self; 4] = [Self::Tenth, Self::One, Self::Ten, Self::Hundred];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn distance_mm(self) -> f32 {
        match self {
            Self::Tenth => 0.1,
            Self::One => 1.0,
            Self::Ten => 10.0,
            Self::Hundred => 100.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tenth => "0.1",
            Self::One => "1",
            Self::Ten => "10",
            Self::Hundred => "100",
        }
    }
}

/// Feed or spindle override percentage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverridePreset {
    P50,
    P75,
    P100,
    P125,
    P150,
}

impl OverridePreset {
    pub const ALL: [Self; 5] = [Self::P50, Self::P75, Self::P100, Self::P125, Self::P150];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn percent(self) -> u16 {
        match self {
            Self::P50 => 50,
            Self::P75 => 75,
            Self::P100 => 100,
            Self::P125 => 125,
            Self::P150 => 150,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::P50 => "50%",
            Self::P75 => "75%",
            Self::P100 => "100%",
            Self::P125 => "125%",
            Self::P150 => "150%",
        }
    }
}

/// Work coordinate system, G54 through G57.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoordSystem {
    G54,
    G55,
    G56,
    G57,
}

impl CoordSystem {
    pub const ALL: [Self; 4] = [Self::G54, Self::G55, Self::G56, Self::G57];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// `P` word used by `G10 L20`.
    pub const fn p_number(self) -> u8 {
        self as u8 + 1
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::G54 => "G54",
            Self::G55 => "G55",
            Self::G56 => "G56",
            Self::G57 => "G57",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpindlePreset {
    Low,
    Mid,
    High,
}

impl SpindlePreset {
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn rpm(self) -> u32 {
        match self {
            Self::Low => 6_000,
            Self::Mid => 12_000,
            Self::High => 24_000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "6000",
            Self::Mid => "12000",
            Self::High => "24000",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpindleDirection {
    Forward,
    Reverse,
}

impl SpindleDirection {
    pub const ALL: [Self; 2] = [Self::Forward, Self::Reverse];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Forward => "Fwd",
            Self::Reverse => "Rev",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProbeKind {
    ZSurface,
    XEdge,
    YEdge,
}

impl ProbeKind {
    pub const ALL: [Self; 3] = [Self::ZSurface, Self::XEdge, Self::YEdge];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Axis the probe move travels along (towards negative).
    pub const fn axis(self) -> Axis {
        match self {
            Self::ZSurface => Axis::Z,
            Self::XEdge => Axis::X,
            Self::YEdge => Axis::Y,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ZSurface => "Z Surf",
            Self::XEdge => "X Edge",
            Self::YEdge => "Y Edge",
        }
    }
}

/// Scroll window over the controller's SD listing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SdBrowser {
    selected: u8,
    scroll: u8,
}

impl SdBrowser {
    pub const VISIBLE_ROWS: usize = 4;

    pub const fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
        }
    }

    pub const fn selected(self) -> usize {
        self.selected as usize
    }

    pub const fn scroll(self) -> usize {
        self.scroll as usize
    }

    /// Selects the file shown on `row`; rows past the end are ignored.
    pub fn select_row(&mut self, row: usize, file_count: usize) -> bool {
        let index = self.scroll() + row;
        if row >= Self::VISIBLE_ROWS || index >= file_count {
            return false;
        }
        self.selected = index as u8;
        true
    }

    pub fn scroll_back(&mut self) -> bool {
        if self.scroll == 0 {
            return false;
        }
        self.scroll -= 1;
        true
    }

    pub fn scroll_next(&mut self, file_count: usize) -> bool {
        if self.scroll() + Self::VISIBLE_ROWS >= file_count {
            return false;
        }
        self.scroll = self.scroll.saturating_add(1);
        true
    }

    /// Pulls the window back inside a listing that shrank.
    pub fn clamp(&mut self, file_count: usize) {
        let max_scroll = file_count.saturating_sub(Self::VISIBLE_ROWS);
        self.scroll = self.scroll.min(max_scroll as u8);
        if self.selected() >= file_count {
            self.selected = file_count.saturating_sub(1) as u8;
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    pub axis: Axis,
    pub increment: JogIncrement,
    pub coord_system: CoordSystem,
    pub feed_override: OverridePreset,
    pub spindle_override: OverridePreset,
    pub spindle_preset: SpindlePreset,
    pub spindle_direction: SpindleDirection,
    pub probe: ProbeKind,
    pub sd: SdBrowser,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub const fn new() -> Self {
        Self {
            axis: Axis::X,
            increment: JogIncrement::One,
            coord_system: CoordSystem::G54,
            feed_override: OverridePreset::P100,
            spindle_override: OverridePreset::P100,
            spindle_preset: SpindlePreset::High,
            spindle_direction: SpindleDirection::Forward,
            probe: ProbeKind::ZSurface,
            sd: SdBrowser::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_map_to_fixed_distances() {
        let distances: [f32; 4] = JogIncrement::ALL.map(JogIncrement::distance_mm);
        assert_eq!(distances, [0.1, 1.0, 10.0, 100.0]);
    }

    #[test]
    fn override_presets_map_to_percentages() {
        let percents = OverridePreset::ALL.map(OverridePreset::percent);
        assert_eq!(percents, [50, 75, 100, 125, 150]);
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(Axis::from_index(2), Some(Axis::Z));
        assert_eq!(Axis::from_index(4), None);
        assert_eq!(OverridePreset::from_index(5), None);
        assert_eq!(CoordSystem::G56.p_number(), 3);
    }

    #[test]
    fn sd_scroll_is_bounded_by_file_count() {
        let mut sd = SdBrowser::new();

        assert!(!sd.scroll_next(4));
        assert!(sd.scroll_next(6));
        assert!(sd.scroll_next(6));
        assert!(!sd.scroll_next(6));
        assert_eq!(sd.scroll(), 2);

        assert!(sd.select_row(3, 6));
        assert_eq!(sd.selected(), 5);
        assert!(!sd.select_row(0, 2));

        assert!(sd.scroll_back());
        assert!(sd.scroll_back());
        assert!(!sd.scroll_back());
    }

    #[test]
    fn sd_clamp_follows_shrinking_listing() {
        let mut sd = SdBrowser::new();
        sd.scroll_next(8);
        sd.scroll_next(8);
        sd.select_row(3, 8);

        sd.clamp(3);

        assert_eq!(sd.scroll(), 0);
        assert_eq!(sd.selected(), 2);
    }
}
