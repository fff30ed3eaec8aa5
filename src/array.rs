//! Resizable, bounds-checked storage shared by the vector and matrix types.

use std::ops::{Index, IndexMut};

use num::Zero;

use crate::errors::ContainerError;

/// Contiguous, owned numeric storage with an explicit length.
///
/// Cloning always produces an independent deep copy.
///
/// # Examples
/// ```
/// use beamx::DynamicArray;
///
/// let mut array = DynamicArray::<f64>::new(3);
/// array.fill(2.5);
/// assert_eq!(array.as_slice(), &[2.5, 2.5, 2.5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicArray<T> {
    /// Backing buffer; its length is the array length.
    data: Vec<T>,
}

impl<T: Copy + Zero> DynamicArray<T> {
    /// Allocate an array of `len` zeroed elements.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }

    /// Copy existing storage into a new array.
    #[must_use]
    pub fn from_slice(values: &[T]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    /// Take ownership of an existing buffer.
    pub(crate) fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Reallocate to exactly `len` elements, discarding the previous contents.
    pub fn dimension(&mut self, len: usize) {
        self.data = vec![T::zero(); len];
    }

    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Broadcast `value` to every element.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copy the contents of an array of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::LengthMismatch`] when the lengths differ; the
    /// receiver is left untouched.
    pub fn assign(&mut self, other: &Self) -> Result<(), ContainerError> {
        if self.len() != other.len() {
            return Err(ContainerError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Read the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn at(&self, index: usize) -> Result<T, ContainerError> {
        self.data
            .get(index)
            .copied()
            .ok_or(ContainerError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Overwrite the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        let len = self.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(ContainerError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Remove the element at `index`, shifting later elements down by one.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, ContainerError> {
        if index >= self.len() {
            return Err(ContainerError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.data.remove(index))
    }

    /// Borrow the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Borrow the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

/// Sort a batch of removal indices and check them against `len`.
///
/// Every index is validated before the caller mutates anything. The returned
/// positions are already compensated for earlier removals, so applying them in
/// order removes exactly the requested original indices.
pub(crate) fn compensated_indices(
    indices: &[usize],
    len: usize,
    out_of_range: impl Fn(usize) -> ContainerError,
) -> Result<Vec<usize>, ContainerError> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(ContainerError::DuplicateIndex(pair[0]));
        }
    }
    if let Some(&last) = sorted.last() {
        if last >= len {
            return Err(out_of_range(last));
        }
    }
    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(removed, index)| index - removed)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_array_is_zeroed() {
        let array = DynamicArray::<f64>::new(4);
        assert_eq!(array.len(), 4);
        assert!(array.iter().all(|&value| value == 0.0));
    }

    #[test]
    fn dimension_discards_contents() {
        let mut array = DynamicArray::from_slice(&[1, 2, 3]);
        array.dimension(5);
        assert_eq!(array.as_slice(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn clones_are_deep() {
        let original = DynamicArray::from_slice(&[1.0, 2.0]);
        let mut copy = original.clone();
        copy[0] = 9.0;
        assert_eq!(original[0], 1.0);
        assert_eq!(copy[0], 9.0);
    }

    #[test]
    fn assign_requires_equal_length() {
        let mut target = DynamicArray::from_slice(&[1.0, 2.0]);
        let source = DynamicArray::from_slice(&[3.0, 4.0, 5.0]);
        let error = target.assign(&source).expect_err("length mismatch rejected");
        assert_eq!(
            error,
            ContainerError::LengthMismatch {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(target.as_slice(), &[1.0, 2.0]);

        target
            .assign(&DynamicArray::from_slice(&[7.0, 8.0]))
            .expect("equal lengths accepted");
        assert_eq!(target.as_slice(), &[7.0, 8.0]);
    }

    #[test]
    fn access_is_bounds_checked() {
        let mut array = DynamicArray::<i32>::new(2);
        array.set(1, 7).expect("in range");
        assert_eq!(array.at(1), Ok(7));
        assert_eq!(
            array.at(2),
            Err(ContainerError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(array.set(5, 1).is_err());
    }

    #[test]
    fn compensated_indices_reject_duplicates_and_overflow() {
        let range = |index| ContainerError::IndexOutOfRange { index, len: 5 };
        assert_eq!(compensated_indices(&[3, 1], 5, range), Ok(vec![1, 2]));
        assert_eq!(
            compensated_indices(&[1, 1], 5, range),
            Err(ContainerError::DuplicateIndex(1))
        );
        assert_eq!(
            compensated_indices(&[0, 5], 5, range),
            Err(ContainerError::IndexOutOfRange { index: 5, len: 5 })
        );
    }
}
