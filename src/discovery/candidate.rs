//! Candidate generation
//!
//! A [`CandidateSpace`] is an ordered list of named axes. Iterating it yields
//! the full cartesian product with the first axis varying slowest, so the
//! order in which axes are added decides which working combination is
//! reported first.

use std::fmt;

/// One named list of values to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    name: String,
    values: Vec<String>,
}

impl Axis {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An immutable combination of configuration values under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    fields: Vec<(String, String)>,
}

impl Candidate {
    /// Build a candidate directly from `(axis, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up the value chosen for an axis
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, value)| value.as_str())
    }

    /// All `(axis, value)` pairs in axis order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

/// The search space: an ordered set of independent axes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSpace {
    axes: Vec<Axis>,
}

impl CandidateSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an axis; axes added earlier vary more slowly
    pub fn with_axis<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.axes.push(Axis::new(name, values));
        self
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Number of candidates the space will produce
    pub fn len(&self) -> usize {
        if self.axes.is_empty() {
            return 0;
        }
        self.axes.iter().map(|a| a.values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a fresh pass over the space
    pub fn iter(&self) -> Candidates<'_> {
        Candidates {
            space: self,
            indices: vec![0; self.axes.len()],
            remaining: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSpace {
    type Item = Candidate;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`CandidateSpace`]
///
/// Works like an odometer: the last axis ticks on every step and carries
/// into the axis before it when it wraps.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    space: &'a CandidateSpace,
    indices: Vec<usize>,
    remaining: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.remaining == 0 {
            return None;
        }

        let fields = self
            .space
            .axes
            .iter()
            .zip(&self.indices)
            .map(|(axis, &i)| (axis.name.clone(), axis.values[i].clone()))
            .collect();

        self.remaining -= 1;
        for (slot, axis) in self.indices.iter_mut().zip(&self.space.axes).rev() {
            *slot += 1;
            if *slot < axis.values.len() {
                break;
            }
            *slot = 0;
        }

        Some(Candidate { fields })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(c: &Candidate) -> Vec<&str> {
        c.fields().iter().map(|(_, v)| v.as_str()).collect()
    }

    #[test]
    fn test_product_order_first_axis_slowest() {
        let space = CandidateSpace::new()
            .with_axis("resource", ["a", "b"])
            .with_axis("template", ["x", "y", "z"]);

        let all: Vec<Vec<String>> = space
            .iter()
            .map(|c| values(&c).into_iter().map(String::from).collect())
            .collect();

        assert_eq!(space.len(), 6);
        assert_eq!(
            all,
            vec![
                vec!["a", "x"],
                vec!["a", "y"],
                vec!["a", "z"],
                vec!["b", "x"],
                vec!["b", "y"],
                vec!["b", "z"],
            ]
        );
    }

    #[test]
    fn test_three_axes_count() {
        let space = CandidateSpace::new()
            .with_axis("a", ["1", "2"])
            .with_axis("b", ["1", "2", "3"])
            .with_axis("c", ["1", "2", "3", "4"]);

        assert_eq!(space.iter().count(), 24);
        assert_eq!(space.iter().len(), 24);

        let last = space.iter().last().unwrap();
        assert_eq!(values(&last), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_empty_axis_yields_nothing() {
        let space = CandidateSpace::new()
            .with_axis("resource", ["a", "b"])
            .with_axis("deployment", Vec::<String>::new());

        assert!(space.is_empty());
        assert_eq!(space.iter().next(), None);
    }

    #[test]
    fn test_no_axes_yields_nothing() {
        let space = CandidateSpace::new();
        assert_eq!(space.len(), 0);
        assert_eq!(space.iter().count(), 0);
    }

    #[test]
    fn test_iteration_restarts_fresh() {
        let space = CandidateSpace::new().with_axis("model", ["m1", "m2"]);

        let mut first = space.iter();
        first.next();

        let second: Vec<Candidate> = space.iter().collect();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].get("model"), Some("m1"));
    }

    #[test]
    fn test_candidate_lookup_and_display() {
        let c = Candidate::from_pairs([("endpoint", "https://x"), ("deployment", "o4-mini")]);

        assert_eq!(c.get("deployment"), Some("o4-mini"));
        assert_eq!(c.get("model"), None);
        assert_eq!(c.to_string(), "endpoint=https://x, deployment=o4-mini");
    }
}
