use std::fmt;

/// Number of targets on a 3x3 board
pub const SMALL_COUNT: usize = 9;
/// Number of targets on a 4x4 board
pub const LARGE_COUNT: usize = 16;

const BASE_SEQUENCE: [u32; SMALL_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Grid size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Difficulty {
    #[strum(serialize = "3x3")]
    Small,
    #[strum(serialize = "4x4")]
    Large,
}

impl Difficulty {
    pub fn target_count(&self) -> usize {
        match self {
            Difficulty::Small => SMALL_COUNT,
            Difficulty::Large => LARGE_COUNT,
        }
    }

    /// Suffix appended to a multiples-mode name to form its score key
    pub fn key_suffix(&self) -> String {
        format!(" ({})", self)
    }
}

/// How a mode produces the numbers the player has to tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceRule {
    /// The literal 1..=9 sequence
    Fixed,
    /// `[m, 2m, ..., n*m]` where n depends on the difficulty
    Multiples(u32),
}

/// Immutable descriptor of a game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    pub description: &'static str,
    pub rule: SequenceRule,
}

impl Mode {
    pub fn is_base(&self) -> bool {
        self.rule == SequenceRule::Fixed
    }

    /// Only multiples-modes let the player pick the grid size
    pub fn offers_difficulty(&self) -> bool {
        !self.is_base()
    }

    pub fn multiplier(&self) -> Option<u32> {
        match self.rule {
            SequenceRule::Fixed => None,
            SequenceRule::Multiples(m) => Some(m),
        }
    }

    /// The difficulty a session of this mode actually runs at
    pub fn effective_difficulty(&self, requested: Difficulty) -> Difficulty {
        if self.is_base() {
            Difficulty::Small
        } else {
            requested
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The fixed catalog: the base mode followed by multiples of 2 through 9
pub const MODES: [Mode; 9] = [
    Mode {
        name: "Basic (1-9)",
        description: "Tap 1 to 9 in order",
        rule: SequenceRule::Fixed,
    },
    Mode {
        name: "Multiples of 2",
        description: "Tap the multiples of 2 in order",
        rule: SequenceRule::Multiples(2),
    },
    Mode {
        name: "Multiples of 3",
        description: "Tap the multiples of 3 in order",
        rule: SequenceRule::Multiples(3),
    },
    Mode {
        name: "Multiples of 4",
        description: "Tap the multiples of 4 in order",
        rule: SequenceRule::Multiples(4),
    },
    Mode {
        name: "Multiples of 5",
        description: "Tap the multiples of 5 in order",
        rule: SequenceRule::Multiples(5),
    },
    Mode {
        name: "Multiples of 6",
        description: "Tap the multiples of 6 in order",
        rule: SequenceRule::Multiples(6),
    },
    Mode {
        name: "Multiples of 7",
        description: "Tap the multiples of 7 in order",
        rule: SequenceRule::Multiples(7),
    },
    Mode {
        name: "Multiples of 8",
        description: "Tap the multiples of 8 in order",
        rule: SequenceRule::Multiples(8),
    },
    Mode {
        name: "Multiples of 9",
        description: "Tap the multiples of 9 in order",
        rule: SequenceRule::Multiples(9),
    },
];

pub fn base_mode() -> Mode {
    MODES[0]
}

pub fn multiples_mode(multiplier: u32) -> Option<Mode> {
    MODES
        .iter()
        .copied()
        .find(|m| m.multiplier() == Some(multiplier))
}

/// Ordered list of values the player must tap for `mode` at `difficulty`
pub fn generate_sequence(mode: &Mode, difficulty: Difficulty) -> Vec<u32> {
    match mode.rule {
        SequenceRule::Fixed => BASE_SEQUENCE.to_vec(),
        SequenceRule::Multiples(m) => {
            let count = difficulty.target_count() as u32;
            (1..=count).map(|i| i * m).collect()
        }
    }
}

/// Partition key under which bests are computed
pub fn mode_key(mode: &Mode, difficulty: Difficulty) -> String {
    if mode.is_base() {
        mode.name.to_string()
    } else {
        format!("{}{}", mode.name, difficulty.key_suffix())
    }
}
