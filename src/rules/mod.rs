//! # Update Rules
//!
//! Concrete implementations of [`crate::model::UpdateRule`]: the static
//! social-impact rule (fixed topology) and its temporal variant (topology
//! co-evolves with the opinions via the `coevolution` passes).

pub mod social_impact;
pub mod coevolution;

pub use social_impact::{SocialImpactRule, TemporalSocialImpactRule};
pub use coevolution::CoEvolutionParams;
