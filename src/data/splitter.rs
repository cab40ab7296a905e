// ============================================================
// Layer 4 — Train/Holdout Splitter
// ============================================================
// Shuffles rows and splits them into a fitting part and a
// holdout part used only for scoring.
//
// The RNG is passed in, so a `--seed` on the command line makes
// the split (and therefore the reported metrics) reproducible.
//
// Reference: rand crate documentation (SliceRandom)

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` and split into (train, holdout).
///
/// `train_fraction` is clamped to [0, 1]; the train part gets
/// `round(len * train_fraction)` rows.
pub fn split_train_holdout<T, R: Rng>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_at = ((total as f64) * fraction).round() as usize;
    let holdout  = samples.split_off(split_at.min(total));

    tracing::debug!(
        "Split {} rows: {} train, {} holdout",
        total,
        samples.len(),
        holdout.len()
    );

    (samples, holdout)
}
