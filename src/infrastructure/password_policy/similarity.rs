//! Ratcliff/Obershelp string similarity

/// Similarity of two strings in `[0, 1]`, computed over characters
///
/// `2 * M / T` where `T` is the total length and `M` the number of
/// characters in the matching blocks found by repeatedly taking the longest
/// common substring and recursing on both sides of it.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();

    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_match(a, b);

    if k == 0 {
        return 0;
    }

    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// Longest common substring as `(start_a, start_b, len)`; ties go to the
/// earliest start in `a`, then in `b`
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];

        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = previous[j] + 1;
                current[j + 1] = len;

                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }

        previous = current;
    }

    best
}
