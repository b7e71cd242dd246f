//! Sorted-sequence utilities
//!
//! Inputs are ascending and duplicate-free; outputs keep that invariant.

use std::cmp::Ordering;

/// Intersect two sorted sequences
///
/// `None` means "no filter applied yet" and yields `b` unchanged. A filter
/// that eliminated everything must be passed as `Some(vec![])`.
pub fn intersect<T: Ord + Copy>(a: Option<Vec<T>>, b: Vec<T>) -> Vec<T> {
    let Some(a) = a else {
        return b;
    };

    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

/// Merge many sorted sequences into one, dropping duplicates across inputs
///
/// Splits the list in half at every level so total work is
/// O(n log k) for k inputs.
pub fn merge_sorted<T: Ord>(mut sequences: Vec<Vec<T>>) -> Vec<T> {
    match sequences.len() {
        0 => Vec::new(),
        1 => sequences.pop().unwrap_or_default(),
        2 => {
            let b = sequences.pop().unwrap_or_default();
            let a = sequences.pop().unwrap_or_default();
            merge_two(a, b)
        }
        n => {
            let upper = sequences.split_off(n / 2);
            merge_two(merge_sorted(sequences), merge_sorted(upper))
        }
    }
}

fn merge_two<T: Ord>(a: Vec<T>, b: Vec<T>) -> Vec<T> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();

    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => result.extend(a.next()),
            Ordering::Greater => result.extend(b.next()),
            Ordering::Equal => {
                result.extend(a.next());
                b.next();
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_intersect() {
        assert_eq!(intersect(Some(vec![1, 3, 5, 7]), vec![2, 3, 4, 7, 9]), vec![3, 7]);
        assert_eq!(intersect(Some(vec![1, 2]), vec![3, 4]), Vec::<u64>::new());
    }

    #[test]
    fn test_intersect_universal_vs_empty() {
        assert_eq!(intersect(None, vec![1, 2, 3]), vec![1, 2, 3]);
        assert!(intersect(Some(Vec::new()), vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_merge_sorted() {
        let merged = merge_sorted(vec![
            strings(&["a", "c"]),
            strings(&["b", "c"]),
            strings(&["d"]),
        ]);
        assert_eq!(merged, strings(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_merge_sorted_edge_cases() {
        assert!(merge_sorted::<u64>(Vec::new()).is_empty());
        assert_eq!(merge_sorted(vec![vec![1, 2]]), vec![1, 2]);
        assert_eq!(
            merge_sorted(vec![vec![], vec![1, 4], vec![1, 2], vec![], vec![3, 4, 5]]),
            vec![1, 2, 3, 4, 5]
        );
    }
}
