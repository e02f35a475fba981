//! Helpers for shifting and indexing fixed-length ordered sequences.
//!
//! Shifting a sequence left by one models everything falling one step: the
//! element at index 0 drops off and the freed top slots are filled with the
//! type's default value. The cyclic variants wrap around instead, which is
//! the right notion for states of cyclic siteswap patterns.

/// Shifts `seq` towards index 0, filling the freed tail with defaults.
pub fn left_shift<T: Clone + Default>(seq: &[T], by: usize) -> Vec<T> {
    (0..seq.len())
        .map(|i| seq.get(i + by).cloned().unwrap_or_default())
        .collect()
}

/// Shifts `seq` away from index 0, filling the freed head with defaults.
/// Elements shifted past the end are dropped.
pub fn right_shift<T: Clone + Default>(seq: &[T], by: usize) -> Vec<T> {
    (0..seq.len())
        .map(|i| {
            if i < by {
                T::default()
            } else {
                seq[i - by].clone()
            }
        })
        .collect()
}

/// Rotates `seq` towards index 0, wrapping dropped elements to the back.
pub fn cyclic_left_shift<T: Clone>(seq: &[T], by: usize) -> Vec<T> {
    let len = seq.len();
    (0..len).map(|i| seq[(i + by) % len].clone()).collect()
}

/// Rotates `seq` away from index 0, wrapping dropped elements to the front.
pub fn cyclic_right_shift<T: Clone>(seq: &[T], by: usize) -> Vec<T> {
    let len = seq.len();
    (0..len)
        .map(|i| seq[(i + len - by % len) % len].clone())
        .collect()
}

/// All positions of `seq` holding a value equal to `needle`.
pub fn find_indices<T: PartialEq>(seq: &[T], needle: &T) -> Vec<usize> {
    seq.iter()
        .enumerate()
        .filter_map(|(i, elem)| (elem == needle).then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts() {
        assert_eq!(left_shift(&[1, 2, 3], 1), vec![2, 3, 0]);
        assert_eq!(left_shift(&[1, 2, 3], 2), vec![3, 0, 0]);
        assert_eq!(right_shift(&[1, 2, 3], 1), vec![0, 1, 2]);
        assert_eq!(right_shift::<u8>(&[], 1), Vec::<u8>::new());
        assert_eq!(cyclic_left_shift(&[1, 2, 3], 1), vec![2, 3, 1]);
        assert_eq!(cyclic_right_shift(&[1, 2, 3], 1), vec![3, 1, 2]);
        assert_eq!(cyclic_right_shift(&[1, 2, 3], 4), vec![3, 1, 2]);
    }

    #[test]
    fn indices() {
        assert_eq!(find_indices(&[0, 1, 0, 1], &1), vec![1, 3]);
        assert_eq!(find_indices(&[0, 1, 0, 1], &2), Vec::<usize>::new());
    }
}
