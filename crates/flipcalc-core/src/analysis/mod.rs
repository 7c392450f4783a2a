//! Derived analyses. Each one clones and perturbs a deal, re-invokes the
//! engine, and never duplicates engine arithmetic.

pub mod break_even;
pub mod comparison;
pub mod comps;
pub mod lenders;
pub mod per_sqft;
pub mod scenarios;
pub mod sensitivity;

/// Index of the largest key; ties keep the earliest item.
pub(crate) fn index_of_max<T, K: PartialOrd>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        match &best {
            Some((_, b)) if k <= *b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the smallest key; ties keep the earliest item.
pub(crate) fn index_of_min<T, K: PartialOrd>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        match &best {
            Some((_, b)) if k >= *b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_keep_earliest() {
        let values = [3, 7, 7, 1, 1];
        assert_eq!(index_of_max(&values, |v| *v), Some(1));
        assert_eq!(index_of_min(&values, |v| *v), Some(3));
        assert_eq!(index_of_max(&[] as &[i32], |v| *v), None);
    }
}
