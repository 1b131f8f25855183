//! Fixed rule constants. The rule set is not configurable.

/// Upper bound on animal energy after any feeding gain.
pub const MAX_ENERGY: i32 = 100;

/// Energy every animal loses per activation.
pub const METABOLIC_COST: i32 = 1;

/// Energy gained by one feeding (grass for rabbits, a rabbit for foxes).
pub const FEED_GAIN: i32 = 20;

/// Both partners need at least this much energy to reproduce.
pub const REPRODUCTION_THRESHOLD: i32 = 50;

/// Chance that an eligible pair actually produces an offspring.
pub const REPRODUCTION_PROBABILITY: f64 = 0.4;

/// Energy of a newborn animal.
pub const OFFSPRING_ENERGY: i32 = 100;

/// Rabbits below this energy head for fully grown grass instead of wandering.
pub const HUNGER_THRESHOLD: i32 = 30;

/// Activations an eaten grass patch needs before it is fully grown again.
pub const GRASS_REGROW_TIME: u32 = 10;
