//! Deterministic per-task RNG stream derivation.
//!
//! Null-model sampling must be insensitive to thread scheduling: each
//! `(disease, drug_a, drug_b)` task derives its own seed from a pure hash of
//! the base seed and the task's identity, rather than relying on a single
//! global RNG advanced in execution order.

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Large odd constant used to separate successive mix inputs in the seed
/// space; shares its provenance with the golden-ratio fractional constant
/// used for splitting hash buckets.
const TASK_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// The classic SplitMix64 finalizer, used to turn a linearly-combined seed
/// into a well-mixed 64-bit value.
#[must_use]
pub const fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(TASK_SEED_SPACING);
    z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    z ^ (z >> 31)
}

/// Derives a sub-seed for a single `(disease, drug_a, drug_b)` scoring task
/// from a run-wide base seed and the task's identity.
///
/// Mixing each identifier through its own SplitMix64 pass before folding it
/// into the accumulator keeps the result stable regardless of dispatch
/// order, so two runs over the same inputs with the same `base_seed`
/// produce byte-identical randomization sequences.
#[must_use]
pub const fn mix_task_seed(base_seed: u64, disease_id: u32, drug_a_id: u32, drug_b_id: u32) -> u64 {
    let mut state = splitmix64(base_seed);
    state = splitmix64(state ^ (disease_id as u64));
    state = splitmix64(state ^ (drug_a_id as u64));
    state = splitmix64(state ^ (drug_b_id as u64));
    state
}

/// Builds a seeded, reproducible RNG for a single scoring task.
#[must_use]
pub fn task_rng(base_seed: u64, disease_id: u32, drug_a_id: u32, drug_b_id: u32) -> SmallRng {
    let seed = mix_task_seed(base_seed, disease_id, drug_a_id, drug_b_id);
    SmallRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_identity_yields_same_seed() {
        let a = mix_task_seed(42, 1, 2, 3);
        let b = mix_task_seed(42, 1, 2, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_identities_yield_distinct_seeds() {
        let a = mix_task_seed(42, 1, 2, 3);
        let b = mix_task_seed(42, 1, 2, 4);
        let c = mix_task_seed(42, 1, 3, 2);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn order_of_drug_ids_is_not_commutative() {
        // (drug_a, drug_b) and (drug_b, drug_a) are different tasks in
        // principle, even though the orchestrator always calls this with a
        // canonical ordering; the mix itself must not silently alias them.
        let a = mix_task_seed(7, 10, 20, 30);
        let b = mix_task_seed(7, 10, 30, 20);
        assert_ne!(a, b);
    }
}
