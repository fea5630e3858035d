//! Line cleanup and validation shared by the list pipelines.

mod classify;
mod normalize;

pub use classify::{Classifier, IngredientClassifier, InstructionClassifier};
pub use normalize::{replace_fractions, Normalizer, FRACTIONS};
