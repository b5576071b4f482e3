//! Cosine similarity and top-1 selection.

/// Cosine similarity over the common prefix of `a` and `b`.
/// A zero-norm side yields `0.0`.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

/// Position and value of the maximum score; ties keep the earliest position.
///
/// NaN never beats a real score, but a non-empty input always yields `Some`.
pub fn stable_argmax<I>(scores: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, s) in scores.into_iter().enumerate() {
        match best {
            None => best = Some((i, s)),
            Some((_, b)) if s > b || (b.is_nan() && !s.is_nan()) => best = Some((i, s)),
            _ => {}
        }
    }
    best
}
