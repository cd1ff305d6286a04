//! Nearest-neighbor search over a reference vocabulary.
//!
//! All searches are linear scans; a vocabulary holds a few dozen colors.
//! Every function requires a non-empty reference list.

use crate::color::Color;
use crate::error::SwatchError;

/// The reference color closest to `query`. The earliest entry wins ties.
pub fn closest_color<'a>(query: &Color, reference: &'a [Color]) -> Result<&'a Color, SwatchError> {
    let (first, rest) = reference.split_first().ok_or(SwatchError::EmptyVocabulary)?;

    let mut best = first;
    let mut min_distance = query.distance(first);
    for candidate in rest {
        let distance = query.distance(candidate);
        if distance < min_distance {
            min_distance = distance;
            best = candidate;
        }
    }

    Ok(best)
}

/// The `n` reference colors closest to `query`, nearest first.
///
/// Returns `min(n, reference.len())` colors. Equal distances keep their
/// order in `reference`.
pub fn closest_n_colors<'a>(
    query: &Color,
    reference: &'a [Color],
    n: usize,
) -> Result<Vec<&'a Color>, SwatchError> {
    Ok(ranked(query, reference)?
        .into_iter()
        .take(n)
        .map(|(_, color)| color)
        .collect())
}

/// The three closest reference colors, paired with their distances.
pub fn closest_three_colors<'a>(
    query: &Color,
    reference: &'a [Color],
) -> Result<Vec<(f64, &'a Color)>, SwatchError> {
    let mut ranked = ranked(query, reference)?;
    ranked.truncate(3);
    Ok(ranked)
}

fn ranked<'a>(query: &Color, reference: &'a [Color]) -> Result<Vec<(f64, &'a Color)>, SwatchError> {
    if reference.is_empty() {
        return Err(SwatchError::EmptyVocabulary);
    }

    let mut ranked: Vec<(f64, &Color)> = reference
        .iter()
        .map(|color| (query.distance(color), color))
        .collect();
    // `sort_by` is stable, so ties stay in vocabulary order
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(ranked)
}
