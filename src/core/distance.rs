/// Levenshtein distance between two strings
///
/// Counts the minimum number of single-character insertions, deletions and
/// substitutions (unit cost each) turning `a` into `b`. Works on Unicode
/// scalar values, so a Cyrillic letter is one character.
///
/// Classic dynamic programming with two rows sized by the shorter string:
/// O(|a|·|b|) time, O(min(|a|, |b|)) space.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Keep the inner row on the shorter string
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut cur: Vec<usize> = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        cur[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            cur[j + 1] = (prev[j + 1] + 1)
                .min(cur[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[short.len()]
}

/// Edit-distance similarity in [0, 1]
///
/// `1 - edit_distance(a, b) / max(|a|, |b|)`; two empty strings are identical.
#[inline]
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f64 / max_len as f64
}
