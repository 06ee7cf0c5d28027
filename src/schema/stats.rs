use serde::{Deserialize, Serialize};

/// The six character attributes a choice can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Health,
    Intelligence,
    Charisma,
    Happiness,
    Fitness,
    Creativity,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Health,
        Stat::Intelligence,
        Stat::Charisma,
        Stat::Happiness,
        Stat::Fitness,
        Stat::Creativity,
    ];

    /// The capitalised key used for this stat inside a stats JSON object.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Intelligence => "Intelligence",
            Self::Charisma => "Charisma",
            Self::Happiness => "Happiness",
            Self::Fitness => "Fitness",
            Self::Creativity => "Creativity",
        }
    }

    /// Looks a stat up by its exact JSON key.
    pub fn from_key(key: &str) -> Option<Stat> {
        Self::ALL.into_iter().find(|stat| stat.key() == key)
    }
}

/// The lowest value a delta field may take (significant decrease).
pub const DELTA_MIN: u8 = 1;
/// The neutral delta value (no change).
pub const DELTA_NEUTRAL: u8 = 3;
/// The highest value a delta field may take (significant increase).
pub const DELTA_MAX: u8 = 5;

/// The effect of one choice on each stat, on a 1..=5 scale where 3 is neutral.
///
/// Deserializing checks every field is in 1..=5, the same as
/// [`decode_stat_delta`](crate::core::stat_delta::decode_stat_delta) does for
/// model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStatDelta")]
pub struct StatDelta {
    pub health: u8,
    pub intelligence: u8,
    pub charisma: u8,
    pub happiness: u8,
    pub fitness: u8,
    pub creativity: u8,
}

/// Unchecked wire form of a [`StatDelta`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatDelta {
    health: u8,
    intelligence: u8,
    charisma: u8,
    happiness: u8,
    fitness: u8,
    creativity: u8,
}

impl TryFrom<RawStatDelta> for StatDelta {
    type Error = String;

    fn try_from(raw: RawStatDelta) -> Result<Self, Self::Error> {
        let delta = StatDelta {
            health: raw.health,
            intelligence: raw.intelligence,
            charisma: raw.charisma,
            happiness: raw.happiness,
            fitness: raw.fitness,
            creativity: raw.creativity,
        };
        match Stat::ALL.into_iter().find(|&stat| !delta.in_range(stat)) {
            Some(stat) => Err(format!(
                "{} must be between {} and {}, got {}",
                stat.key(),
                DELTA_MIN,
                DELTA_MAX,
                delta.get(stat)
            )),
            None => Ok(delta),
        }
    }
}

impl StatDelta {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Health => self.health,
            Stat::Intelligence => self.intelligence,
            Stat::Charisma => self.charisma,
            Stat::Happiness => self.happiness,
            Stat::Fitness => self.fitness,
            Stat::Creativity => self.creativity,
        }
    }

    fn in_range(&self, stat: Stat) -> bool {
        (DELTA_MIN..=DELTA_MAX).contains(&self.get(stat))
    }

    /// Signed effect for a stat: 1 → -2, 3 → 0, 5 → +2.
    pub fn effect(&self, stat: Stat) -> i16 {
        self.get(stat) as i16 - DELTA_NEUTRAL as i16
    }
}

#[cfg(test)]
impl StatDelta {
    /// Every field at the neutral value.
    pub(crate) fn neutral() -> Self {
        Self {
            health: DELTA_NEUTRAL,
            intelligence: DELTA_NEUTRAL,
            charisma: DELTA_NEUTRAL,
            happiness: DELTA_NEUTRAL,
            fitness: DELTA_NEUTRAL,
            creativity: DELTA_NEUTRAL,
        }
    }
}

/// A character's current attributes, each on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    pub health: u8,
    pub intelligence: u8,
    pub charisma: u8,
    pub happiness: u8,
    pub fitness: u8,
    pub creativity: u8,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            health: 50,
            intelligence: 50,
            charisma: 50,
            happiness: 50,
            fitness: 50,
            creativity: 50,
        }
    }
}

impl CharacterStats {
    pub const MAX: u8 = 100;

    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Health => self.health,
            Stat::Intelligence => self.intelligence,
            Stat::Charisma => self.charisma,
            Stat::Happiness => self.happiness,
            Stat::Fitness => self.fitness,
            Stat::Creativity => self.creativity,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut u8 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Charisma => &mut self.charisma,
            Stat::Happiness => &mut self.happiness,
            Stat::Fitness => &mut self.fitness,
            Stat::Creativity => &mut self.creativity,
        }
    }

    /// Returns new stats with `delta` applied, each step of effect worth
    /// `points_per_step` points. Results saturate at 0 and 100.
    pub fn apply(&self, delta: &StatDelta, points_per_step: u8) -> CharacterStats {
        let mut next = *self;
        for stat in Stat::ALL {
            let change = delta.effect(stat) * points_per_step as i16;
            let value = (self.get(stat) as i16 + change).clamp(0, Self::MAX as i16);
            *next.slot(stat) = value as u8;
        }
        next
    }
}
