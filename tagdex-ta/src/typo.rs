//! Typo clustering over the tag vocabulary
//!
//! Groups likely misspellings by bounded Levenshtein distance using a
//! greedy, frequency-ordered partition. The partition is order-dependent:
//! a tag joins the first anchor that reaches it, even if a later anchor
//! would also be within range.

use serde::Serialize;

/// A tag with its association count
#[derive(Debug, Clone, Serialize)]
pub struct TagUse {
    pub tag: String,
    pub uses: i64,
}

/// One cluster of likely spelling variants
#[derive(Debug, Serialize)]
pub struct TypoGroup {
    /// Canonical member: highest use count, ties broken lexicographically
    pub normalized: String,
    pub variants: Vec<TagUse>,
    pub size: usize,
}

/// Levenshtein distance with an upper bound.
///
/// Returns the exact distance when it is at most `max`. Otherwise returns
/// a lower bound greater than `max` as soon as one is provable: the
/// length difference up front, or a DP row whose minimum already exceeds
/// `max`.
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let len_diff = a.len().abs_diff(b.len());
    if len_diff > max {
        return len_diff;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut row = Vec::with_capacity(b.len() + 1);
        row.push(i + 1);
        let mut row_min = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let val = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
            row.push(val);
            row_min = row_min.min(val);
        }
        // Distances only grow row to row; stop once the bound is beaten
        if row_min > max {
            return row_min;
        }
        prev = row;
    }
    prev[b.len()]
}

/// Greedy frequency-ordered clustering.
///
/// `candidates` must already be ordered `uses DESC, tag ASC`. Each
/// unclustered tag in turn anchors a group of all remaining unclustered
/// tags within `distance` of it; groups with fewer than two members are
/// discarded. Emits at most `max_groups` groups.
pub fn cluster_typos(candidates: &[TagUse], distance: usize, max_groups: usize) -> Vec<TypoGroup> {
    let mut clustered = vec![false; candidates.len()];
    let mut groups = Vec::new();

    for i in 0..candidates.len() {
        if groups.len() >= max_groups {
            break;
        }
        if clustered[i] {
            continue;
        }
        let mut members = vec![i];
        for j in (i + 1)..candidates.len() {
            if clustered[j] {
                continue;
            }
            if bounded_levenshtein(&candidates[i].tag, &candidates[j].tag, distance) <= distance {
                members.push(j);
            }
        }
        if members.len() < 2 {
            continue;
        }

        let mut variants: Vec<TagUse> = members.iter().map(|&ix| candidates[ix].clone()).collect();
        variants.sort_by(|x, y| y.uses.cmp(&x.uses).then_with(|| x.tag.cmp(&y.tag)));
        for &ix in &members {
            clustered[ix] = true;
        }
        groups.push(TypoGroup {
            normalized: variants[0].tag.clone(),
            size: variants.len(),
            variants,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uses(pairs: &[(&str, i64)]) -> Vec<TagUse> {
        pairs
            .iter()
            .map(|(tag, uses)| TagUse {
                tag: tag.to_string(),
                uses: *uses,
            })
            .collect()
    }

    #[test]
    fn test_distance_identical() {
        assert_eq!(bounded_levenshtein("color", "color", 2), 0);
    }

    #[test]
    fn test_distance_basic() {
        assert_eq!(bounded_levenshtein("color", "colour", 2), 1);
        assert_eq!(bounded_levenshtein("color", "colr", 2), 1);
        assert_eq!(bounded_levenshtein("kitten", "sitting", 3), 3);
    }

    #[test]
    fn test_distance_empty_strings() {
        assert_eq!(bounded_levenshtein("", "", 2), 0);
        assert_eq!(bounded_levenshtein("ab", "", 2), 2);
    }

    #[test]
    fn test_length_difference_shortcut() {
        // Lengths differ by 6; the result must exceed the bound of 2
        assert!(bounded_levenshtein("ab", "abcdefgh", 2) > 2);
    }

    #[test]
    fn test_early_exit_returns_lower_bound() {
        let d = bounded_levenshtein("abcdef", "uvwxyz", 2);
        assert!(d > 2);
        // The early exit may under-report the true distance but never
        // below the bound it proved
        assert!(d <= 6);
    }

    #[test]
    fn test_cluster_color_variants() {
        let candidates = uses(&[("color", 2), ("colour", 1), ("colr", 1), ("palette", 1)]);
        let groups = cluster_typos(&candidates, 2, 10);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.normalized, "color");
        assert_eq!(group.size, 3);
        let tags: Vec<&str> = group.variants.iter().map(|v| v.tag.as_str()).collect();
        assert_eq!(tags, vec!["color", "colour", "colr"]);
    }

    #[test]
    fn test_singletons_are_discarded() {
        let candidates = uses(&[("alpha", 3), ("omega", 1)]);
        assert!(cluster_typos(&candidates, 2, 10).is_empty());
    }

    #[test]
    fn test_max_groups_caps_output() {
        let candidates = uses(&[
            ("aaaa", 5),
            ("zzzz", 4),
            ("mmmm", 3),
            ("aaab", 1),
            ("mmmn", 1),
            ("zzzy", 1),
        ]);
        let groups = cluster_typos(&candidates, 1, 2);
        assert_eq!(groups.len(), 2);
        // Frequency order decides which anchors got in
        assert_eq!(groups[0].normalized, "aaaa");
        assert_eq!(groups[1].normalized, "zzzz");
    }

    #[test]
    fn test_variants_within_distance_of_normalized() {
        let candidates = uses(&[
            ("settings", 9),
            ("banner", 7),
            ("setings", 4),
            ("setting", 3),
            ("baner", 2),
            ("unrelated", 1),
        ]);
        let distance = 2;
        for group in cluster_typos(&candidates, distance, 50) {
            for variant in &group.variants {
                assert!(
                    bounded_levenshtein(&group.normalized, &variant.tag, distance) <= distance,
                    "{} vs {} exceeds distance",
                    group.normalized,
                    variant.tag
                );
            }
        }
    }

    #[test]
    fn test_greedy_assignment_is_first_anchor_wins() {
        // "abcd" is within 1 of both anchors; the higher-frequency anchor
        // processed first claims it
        let candidates = uses(&[("abcc", 5), ("abdd", 4), ("abcd", 1)]);
        let groups = cluster_typos(&candidates, 1, 10);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].normalized, "abcc");
        assert!(groups[0].variants.iter().any(|v| v.tag == "abcd"));
    }
}
