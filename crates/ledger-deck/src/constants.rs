//! Card codes the deck algorithms key on

/// Adaptable: two zero-xp swaps per copy
pub const ADAPTABLE: &str = "02110";
/// Déjà Vu: discounts re-buying exiled cards
pub const DEJA_VU: &str = "60531";
/// Arcane Research: spell upgrade discount
pub const ARCANE_RESEARCH: &str = "04109";
/// Down the Rabbit Hole: one xp off up to two purchases
pub const DOWN_THE_RABBIT_HOLE: &str = "08059";
/// Ace of Rods: its ignore-deck-limit copies are not part of the slot delta
pub const ACE_OF_RODS: &str = "05040";
/// Parallel Agnes Baker
pub const PARALLEL_AGNES: &str = "90017";
/// Parallel Skids O'Toole
pub const PARALLEL_SKIDS: &str = "90008";
/// Parallel Jim Culver, who keeps an extra deck
pub const PARALLEL_JIM: &str = "90049";
/// Vengeful Shade, not counted among Jim's extra deck cards
pub const VENGEFUL_SHADE: &str = "90053";
/// Random basic weakness placeholder
pub const RANDOM_BASIC_WEAKNESS: &str = "01000";
/// Excluded from faction counts
pub const FACTION_COUNT_EXCLUDED: &str = "02014";

/// Separator used when joining customization texts
pub const DEFAULT_LIST_SEPARATOR: &str = ". ";

/// Déjà Vu discounts at most this many exiled cards per copy
pub const DEJA_VU_USES_PER_COPY: i32 = 3;
/// Adaptable swaps per copy
pub const ADAPTABLE_USES_PER_COPY: i32 = 2;
/// Down the Rabbit Hole waivers, whatever the number of copies
pub const DTR_USES: i32 = 2;
