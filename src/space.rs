use std::fmt::Debug;
use std::hash::Hash;

/// A configuration in a search space.
///
/// Identity is structural, two states are the same node when they compare
/// equal, so they can be used as keys of the visited set.
pub trait State: Clone + Debug + PartialEq + Eq + Hash {}

impl State for usize {}

/// A sequence of States from a start to an end.
///
/// Paths are never empty, they hold at least the State they start at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St>
where
    St: State,
{
    states: Vec<St>,
}

impl<St> Path<St>
where
    St: State,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
        }
    }

    #[inline(always)]
    pub fn start(&self) -> &St {
        &self.states[0]
    }
    #[inline(always)]
    pub fn end(&self) -> &St {
        &self.states[self.states.len() - 1]
    }

    /// Number of States in the Path, including both ends.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }
    /// Number of transitions in the Path.
    #[inline(always)]
    pub fn edges(&self) -> usize {
        self.states.len() - 1
    }
    /// Whether the Path stays on its start.
    #[inline(always)]
    pub fn is_trivial(&self) -> bool {
        self.states.len() == 1
    }

    #[inline(always)]
    pub fn states(&self) -> &[St] {
        &self.states
    }

    #[inline(always)]
    pub fn append(&mut self, s: St) {
        self.states.push(s);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        self.states.reverse();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, St> {
        self.states.iter()
    }
}

impl<'a, St> IntoIterator for &'a Path<St>
where
    St: State,
{
    type Item = &'a St;
    type IntoIter = std::slice::Iter<'a, St>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

const MAX_ELEMENTS_DISPLAYED: usize = 20;

impl<St> std::fmt::Display for Path<St>
where
    St: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let interior = match self.states.len() {
            0..=2 => &[][..],
            n => &self.states[1..n - 1],
        };
        write!(
            f,
            "Path({}, {:?}:{:?}:{:?})",
            self.edges(),
            self.start(),
            interior
                .iter()
                .take(MAX_ELEMENTS_DISPLAYED)
                .collect::<Vec<_>>(),
            self.end()
        )
    }
}

/// The static structure States live in.
pub trait Space<St>: std::fmt::Debug
where
    St: State,
{
    /// Expands a State.
    ///
    /// The order of the neighbours is part of the contract. Searches break
    /// ties by it, so it must not change between calls.
    fn neighbours(&self, s: &St) -> Vec<St>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn adjacent(&self, from: &St, to: &St) -> bool {
        self.neighbours(from).contains(to)
    }

    fn valid_path(&self, p: &Path<St>) -> bool {
        p.states().iter().all(|s| self.valid(s))
            && p.states().windows(2).all(|w| self.adjacent(&w[0], &w[1]))
    }

    fn size(&self) -> Option<usize> {
        None
    }
}
