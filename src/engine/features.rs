//! Binary feature vectors over the symptom vocabulary.

use crate::models::{Symptom, Vocabulary};

/// One slot per vocabulary symptom, in vocabulary order; `true` means present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureVector(Vec<bool>);

impl FeatureVector {
    /// All-absent vector of the given length.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Builds a vector from symptoms; symptoms outside the vocabulary are skipped.
    #[must_use]
    pub fn from_symptoms<'a, I>(vocabulary: &Vocabulary, symptoms: I) -> Self
    where
        I: IntoIterator<Item = &'a Symptom>,
    {
        let mut vector = Self::zeros(vocabulary.len());
        for index in symptoms
            .into_iter()
            .filter_map(|s| vocabulary.index_of(s.as_str()))
        {
            vector.0[index] = true;
        }
        vector
    }

    /// Vector length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length vector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slot value; out-of-range slots read as absent.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Inverts one slot.
    pub fn flip(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = !*slot;
        }
    }

    /// Number of present slots.
    #[must_use]
    pub fn count_present(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    /// Raw slots.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symptoms() {
        let vocab = Vocabulary::builtin();
        let symptoms = [Symptom::new("fever"), Symptom::new("cough"), Symptom::new("bogus")];
        let vector = FeatureVector::from_symptoms(&vocab, &symptoms);
        assert_eq!(vector.len(), vocab.len());
        assert!(vector.get(0));
        assert!(vector.get(2));
        assert!(!vector.get(1));
        assert_eq!(vector.count_present(), 2);
    }

    #[test]
    fn test_flip_and_bounds() {
        let mut vector = FeatureVector::zeros(3);
        vector.flip(1);
        assert!(vector.get(1));
        vector.flip(1);
        assert!(!vector.get(1));
        vector.flip(10);
        assert!(!vector.get(10));
        assert_eq!(vector.as_slice(), &[false, false, false]);
    }
}
