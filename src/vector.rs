//! Numeric vectors with elementwise arithmetic and index removal.

use std::ops::{AddAssign, Index, IndexMut, MulAssign};

use num::{Num, Zero};

use crate::array::{compensated_indices, DynamicArray};
use crate::errors::ContainerError;

/// A one-dimensional numeric vector built on [`DynamicArray`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector<T> {
    /// Owned storage.
    array: DynamicArray<T>,
}

impl<T: Copy + Zero> Vector<T> {
    /// Create a zeroed vector of length `len`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            array: DynamicArray::new(len),
        }
    }

    /// Create a vector holding a copy of `values`.
    ///
    /// # Examples
    /// ```
    /// use beamx::Vector;
    ///
    /// let v = Vector::from_slice(&[1.0, 2.0]);
    /// assert_eq!(v.len(), 2);
    /// ```
    #[must_use]
    pub fn from_slice(values: &[T]) -> Self {
        Self {
            array: DynamicArray::from_slice(values),
        }
    }

    /// Reallocate to `len` zeroed elements.
    pub fn dimension(&mut self, len: usize) {
        self.array.dimension(len);
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Broadcast `value` to every element.
    pub fn fill(&mut self, value: T) {
        self.array.fill(value);
    }

    /// Copy another vector of the same length into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::LengthMismatch`] when the lengths differ.
    pub fn assign(&mut self, other: &Self) -> Result<(), ContainerError> {
        self.array.assign(&other.array)
    }

    /// Bounds-checked read.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn at(&self, index: usize) -> Result<T, ContainerError> {
        self.array.at(index)
    }

    /// Bounds-checked write.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        self.array.set(index, value)
    }

    /// Borrow the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.array.as_slice()
    }

    /// Borrow the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.array.as_mut_slice()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.array.iter()
    }

    /// Remove the element at `index`, shifting later elements down.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, ContainerError> {
        self.array.remove(index)
    }

    /// Remove several elements identified by their original indices.
    ///
    /// The indices may be given in any order. All of them are validated before
    /// anything is removed, so a failed call leaves the vector unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] for an index past the end and
    /// [`ContainerError::DuplicateIndex`] when an index is listed twice.
    ///
    /// # Examples
    /// ```
    /// use beamx::Vector;
    ///
    /// let mut v = Vector::from_slice(&[0, 1, 2, 3, 4]);
    /// v.remove_many(&[3, 1]).unwrap();
    /// assert_eq!(v.as_slice(), &[0, 2, 4]);
    /// ```
    pub fn remove_many(&mut self, indices: &[usize]) -> Result<(), ContainerError> {
        let len = self.len();
        let positions =
            compensated_indices(indices, len, |index| ContainerError::IndexOutOfRange {
                index,
                len,
            })?;
        for position in positions {
            self.array.remove(position)?;
        }
        Ok(())
    }
}

impl<T: Copy + Num + AddAssign + MulAssign> Vector<T> {
    /// Add `other` elementwise into this vector.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::LengthMismatch`] when the lengths differ.
    pub fn add(&mut self, other: &Self) -> Result<(), ContainerError> {
        if self.len() != other.len() {
            return Err(ContainerError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        for (target, &value) in self.array.as_mut_slice().iter_mut().zip(other.iter()) {
            *target += value;
        }
        Ok(())
    }

    /// Add a shorter vector into the range starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::RangeOutOfBounds`] unless
    /// `offset + sub.len() <= self.len()`.
    pub fn add_at(&mut self, sub: &Self, offset: usize) -> Result<(), ContainerError> {
        let end = offset.checked_add(sub.len()).unwrap_or(usize::MAX);
        if end > self.len() {
            return Err(ContainerError::RangeOutOfBounds {
                offset,
                end,
                len: self.len(),
            });
        }
        for (target, &value) in self.array.as_mut_slice()[offset..end]
            .iter_mut()
            .zip(sub.iter())
        {
            *target += value;
        }
        Ok(())
    }

    /// Add `value` to every element.
    pub fn add_scalar(&mut self, value: T) {
        for target in self.array.as_mut_slice() {
            *target += value;
        }
    }

    /// Multiply every element by `scale`.
    pub fn scale(&mut self, scale: T) {
        for target in self.array.as_mut_slice() {
            *target *= scale;
        }
    }

    /// Inner product with another vector of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::LengthMismatch`] when the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<T, ContainerError> {
        if self.len() != other.len() {
            return Err(ContainerError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(T::zero(), |sum, (&a, &b)| sum + a * b))
    }
}

impl Vector<f64> {
    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.iter().map(|value| value * value).sum::<f64>().sqrt()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.array[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.array[index]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn counting(len: usize) -> Vector<f64> {
        let values: Vec<f64> = (0..len).map(|i| i as f64).collect();
        Vector::from_slice(&values)
    }

    #[test]
    fn remove_shifts_later_elements() {
        let mut v = counting(5);
        assert_eq!(v.remove(2), Ok(2.0));
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn batch_removal_uses_original_indices() {
        let mut v = counting(5);
        v.remove_many(&[1, 3]).expect("valid indices");
        assert_eq!(v.as_slice(), &[0.0, 2.0, 4.0]);
    }

    #[test]
    fn invalid_batch_removal_leaves_vector_untouched() {
        let mut v = counting(5);
        assert_eq!(
            v.remove_many(&[1, 5]),
            Err(ContainerError::IndexOutOfRange { index: 5, len: 5 })
        );
        assert_eq!(
            v.remove_many(&[2, 0, 2]),
            Err(ContainerError::DuplicateIndex(2))
        );
        assert_eq!(v, counting(5));
    }

    #[test]
    fn add_requires_equal_length() {
        let mut a = counting(5);
        let b = Vector::from_slice(&[-1.0, -1.0, -1.0, -1.0, -1.0]);
        a.add(&b).expect("equal lengths");
        assert_eq!(a[0], -1.0);
        assert_eq!(a[2], 1.0);
        assert!(a.add(&counting(4)).is_err());
    }

    #[test]
    fn add_at_accumulates_into_offset_range() {
        let mut target = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sub = counting(3);
        target.add_at(&sub, 1).expect("fits");
        assert_eq!(target.as_slice(), &[1.0, 2.0, 4.0, 6.0, 5.0]);

        assert_eq!(
            target.add_at(&sub, 3),
            Err(ContainerError::RangeOutOfBounds {
                offset: 3,
                end: 6,
                len: 5
            })
        );
        assert_eq!(
            target.add_at(&sub, usize::MAX - 1),
            Err(ContainerError::RangeOutOfBounds {
                offset: usize::MAX - 1,
                end: usize::MAX,
                len: 5
            })
        );
        assert_eq!(target.as_slice(), &[1.0, 2.0, 4.0, 6.0, 5.0]);
    }

    #[test]
    fn scalar_operations_broadcast() {
        let mut v = counting(3);
        v.add_scalar(1.0);
        v.scale(2.0);
        assert_eq!(v.as_slice(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn dot_and_norm() {
        let a = Vector::from_slice(&[3.0, 4.0]);
        assert_relative_eq!(a.norm(), 5.0);
        assert_eq!(a.dot(&a), Ok(25.0));
    }
}
