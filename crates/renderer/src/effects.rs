use std::fmt;

use crate::types::IMAGE_SLOT_COUNT;

/// The three independently cyclable effect families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    Colour,
    Filter,
    Blur,
}

impl EffectCategory {
    pub const ALL: [EffectCategory; 3] = [Self::Colour, Self::Filter, Self::Blur];

    /// Number of distinct effects (including "no effect") in this family.
    pub const fn cardinality(self) -> u8 {
        match self {
            Self::Colour => 5,
            Self::Filter | Self::Blur => 4,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Colour => 0,
            Self::Filter => 1,
            Self::Blur => 2,
        }
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Colour => f.write_str("colour"),
            Self::Filter => f.write_str("filter"),
            Self::Blur => f.write_str("blur"),
        }
    }
}

/// One step of an effect family.
///
/// What each step means is up to the category's fragment shader; the
/// renderer only forwards the ordinal as an integer uniform. Colour uses
/// all five steps, filter and blur stop at [`Effect::Effect3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    Effect1,
    Effect2,
    Effect3,
    Effect4,
}

impl Effect {
    /// Advances to the following effect, wrapping at the category's cardinality.
    pub fn next(self, category: EffectCategory) -> Self {
        let next = (self.ordinal() as u8 + 1) % category.cardinality();
        Self::from_ordinal(next)
    }

    /// Value handed to the shader.
    pub const fn ordinal(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Effect1 => 1,
            Self::Effect2 => 2,
            Self::Effect3 => 3,
            Self::Effect4 => 4,
        }
    }

    const fn from_ordinal(value: u8) -> Self {
        match value {
            1 => Self::Effect1,
            2 => Self::Effect2,
            3 => Self::Effect3,
            4 => Self::Effect4,
            _ => Self::None,
        }
    }
}

/// Effect choice for every category of a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectSelection {
    effects: [Effect; 3],
}

impl EffectSelection {
    pub fn get(&self, category: EffectCategory) -> Effect {
        self.effects[category.index()]
    }

    /// Cycles one category and returns its new value.
    pub fn cycle(&mut self, category: EffectCategory) -> Effect {
        let slot = &mut self.effects[category.index()];
        *slot = slot.next(category);
        *slot
    }

    /// `(colour, filter, blur)` ordinals in uniform order.
    pub fn as_uniform(&self) -> [i32; 3] {
        EffectCategory::ALL.map(|category| self.get(category).ordinal())
    }
}

/// Fixed table of per-image effect selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectTable {
    slots: [EffectSelection; IMAGE_SLOT_COUNT],
}

impl EffectTable {
    pub fn slot(&self, index: usize) -> Option<&EffectSelection> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut EffectSelection> {
        self.slots.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_wraps_after_five_steps() {
        let mut effect = Effect::None;
        for _ in 0..4 {
            effect = effect.next(EffectCategory::Colour);
        }
        assert_eq!(effect, Effect::Effect4);
        assert_eq!(effect.next(EffectCategory::Colour), Effect::None);
    }

    #[test]
    fn filter_and_blur_wrap_after_four_steps() {
        for category in [EffectCategory::Filter, EffectCategory::Blur] {
            assert_eq!(Effect::Effect3.next(category), Effect::None);
            assert_eq!(Effect::Effect2.next(category), Effect::Effect3);
        }
    }

    #[test]
    fn cycling_n_times_yields_n_mod_cardinality() {
        for category in EffectCategory::ALL {
            let mut selection = EffectSelection::default();
            for n in 1..=12 {
                let value = selection.cycle(category);
                assert_eq!(
                    value.ordinal(),
                    n % i32::from(category.cardinality()),
                    "{category} after {n} presses"
                );
            }
        }
    }

    #[test]
    fn cycling_one_category_leaves_others_alone() {
        let mut selection = EffectSelection::default();
        selection.cycle(EffectCategory::Filter);
        selection.cycle(EffectCategory::Filter);
        assert_eq!(selection.as_uniform(), [0, 2, 0]);
    }

    #[test]
    fn table_starts_without_effects() {
        let table = EffectTable::default();
        for index in 0..IMAGE_SLOT_COUNT {
            let selection = table.slot(index).expect("slot exists");
            for category in EffectCategory::ALL {
                assert_eq!(selection.get(category), Effect::None);
            }
        }
        assert!(table.slot(IMAGE_SLOT_COUNT).is_none());
    }
}
