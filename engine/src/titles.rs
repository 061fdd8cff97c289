//! Generated display titles for untitled submissions.
//!
//! Two lowercase words joined by a hyphen, drawn uniformly at random from
//! fixed vocabularies. Tests inject a seeded RNG or assert only on shape,
//! never on a specific value.

use rand::Rng;
use rand::seq::IndexedRandom;

pub const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brisk", "calm", "clever", "crisp", "deft", "eager", "fabled", "gentle",
    "hidden", "keen", "lively", "lucid", "mellow", "nimble", "plain", "quiet", "rapid", "sturdy",
    "subtle", "tidy", "vivid", "wry",
];

pub const NOUNS: &[&str] = &[
    "axiom", "corollary", "functor", "goal", "induction", "kernel", "lattice", "lemma", "monoid",
    "morphism", "orbit", "predicate", "proof", "quotient", "relation", "sequent", "tactic",
    "theorem", "triangle", "variable", "vertex", "witness",
];

#[must_use]
pub fn generate() -> String {
    generate_with(&mut rand::rng())
}

#[must_use]
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES
        .choose(rng)
        .expect("adjective list must be non-empty");
    let noun = NOUNS.choose(rng).expect("noun list must be non-empty");
    format!("{adjective}-{noun}")
}
