//! Edit-distance string similarity on a 0–100 scale.

/// Tokens scoring strictly above this ratio against a disease name count
/// as a (possibly misspelled) mention of it.
pub const DIAGNOSIS_MATCH_THRESHOLD: u8 = 90;

/// Similarity of `a` and `b` in `0..=100`, based on the insertion/deletion
/// edit distance: `100 * (1 - distance / (len(a) + len(b)))`, rounded.
///
/// Two empty strings are identical (100). Comparison is by `char`, so
/// multi-byte text is not penalised per byte.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    // Indel distance = len(a) + len(b) - 2 * LCS(a, b).
    let lcs = longest_common_subsequence(&a, &b);
    let distance = total - 2 * lcs;
    let similarity = 1.0 - distance as f64 / total as f64;
    (similarity * 100.0).round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
