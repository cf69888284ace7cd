// SPDX-License-Identifier: MIT OR Apache-2.0
//! Longest-common-subsequence similarity, matching Python's
//! `difflib.SequenceMatcher(None, a, b).ratio()`.

use std::collections::HashMap;

/// Normalize a string for fuzzy matching: uppercase, collapse runs of
/// whitespace to a single space, collapse runs of `-`/`_` to a single
/// `-`. Looser than [`invoicex_normalize::normalize_token`], which
/// strips separators entirely — this normalization is used only for
/// similarity *scoring*, never for exact-equality comparisons.
///
/// # Examples
///
/// ```
/// use invoicex_match::normalize_for_fuzzy;
///
/// assert_eq!(normalize_for_fuzzy("  acme   corp  "), "ACME CORP");
/// assert_eq!(normalize_for_fuzzy("po__aeg--ga001"), "PO-AEG-GA001");
/// ```
#[must_use]
pub fn normalize_for_fuzzy(value: &str) -> String {
    let upper = value.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    let mut last_was_space = false;
    let mut last_was_sep = false;
    for c in upper.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
            last_was_sep = false;
        } else if c == '-' || c == '_' {
            if !last_was_sep {
                out.push('-');
            }
            last_was_sep = true;
            last_was_space = false;
        } else {
            out.push(c);
            last_was_space = false;
            last_was_sep = false;
        }
    }
    out
}

/// Similarity ratio between two strings in `[0.0, 1.0]`.
///
/// Implements the Ratcliff/Obershelp algorithm `difflib.SequenceMatcher`
/// uses: the ratio is `2 * M / T`, where `M` is the number of matching
/// characters found by recursively taking the longest common
/// contiguous block and `T = len(a) + len(b)`. Normalized-equal inputs
/// short-circuit to `1.0`; either input empty returns `0.0`.
///
/// # Examples
///
/// ```
/// use invoicex_match::{normalize_for_fuzzy, similarity_ratio};
///
/// let a = normalize_for_fuzzy("Acme Corp");
/// let b = normalize_for_fuzzy("Acme Corp");
/// assert_eq!(similarity_ratio(&a, &b), 1.0);
/// ```
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matches = total_matching_chars(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

fn total_matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut stack = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            stack.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            stack.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Find the longest contiguous block common to `a[alo..ahi]` and
/// `b[blo..bhi]`, returning `(start_in_a, start_in_b, length)`. Ties
/// favor the match discovered first when scanning `a` left to right.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate().take(bhi).skip(blo) {
        b2j.entry(c).or_default().push(j);
    }

    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = b2j.get(&a[i]) {
            for &j in js {
                let k = match j.checked_sub(1) {
                    Some(jm1) => j2len.get(&jm1).copied().unwrap_or(0) + 1,
                    None => 1,
                };
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}
