//! Results of a search run.

use thiserror::Error;

use crate::space::Path;
use crate::space::State;

/// The frontier ran out of States before reaching a goal.
///
/// The goal is unreachable from the start under the given neighbours. No
/// partial path is kept.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("No path found from start to goal state")]
pub struct PathNotFoundError;

/// Counters gathered while searching.
///
/// Only updated by the search itself, callers get a copy once it's done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    nodes_expanded: usize,
    max_frontier_size: usize,
    path_length: usize,
}

impl SearchStats {
    /// States removed from the frontier that had their neighbours generated.
    ///
    /// The goal is never counted as it's not expanded.
    #[inline(always)]
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }
    /// Peak length of the frontier.
    #[inline(always)]
    pub fn max_frontier_size(&self) -> usize {
        self.max_frontier_size
    }
    /// Number of States in the solution, 0 if there's none.
    #[inline(always)]
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    #[inline(always)]
    pub(crate) fn expanded(&mut self) {
        self.nodes_expanded += 1;
    }
    /// Records the frontier length right after an insertion.
    #[inline(always)]
    pub(crate) fn observe_frontier(&mut self, len: usize) {
        self.max_frontier_size = std::cmp::max(self.max_frontier_size, len);
    }
    #[inline(always)]
    pub(crate) fn found(&mut self, path_length: usize) {
        self.path_length = path_length;
    }

    pub fn write_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use thousands::Separable;

        writeln!(out, "Search Stats:")?;
        writeln!(
            out,
            "  - Path length:       {}",
            self.path_length.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Expanded nodes:    {}",
            self.nodes_expanded.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Max frontier size: {}",
            self.max_frontier_size.separate_with_commas()
        )?;

        Ok(())
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stats(path_length: {}, expanded: {}, max_frontier: {})",
            self.path_length, self.nodes_expanded, self.max_frontier_size
        )
    }
}

/// A solution and the stats of the search that found it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<St>
where
    St: State,
{
    path: Path<St>,
    stats: SearchStats,
}

impl<St> SearchResult<St>
where
    St: State,
{
    pub(crate) fn new(path: Path<St>, mut stats: SearchStats) -> Self {
        stats.found(path.len());
        Self { path, stats }
    }

    #[inline(always)]
    pub fn path(&self) -> &Path<St> {
        &self.path
    }
    #[inline(always)]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    #[inline(always)]
    pub fn nodes_expanded(&self) -> usize {
        self.stats.nodes_expanded()
    }
    #[inline(always)]
    pub fn max_frontier_size(&self) -> usize {
        self.stats.max_frontier_size()
    }
    #[inline(always)]
    pub fn path_length(&self) -> usize {
        self.stats.path_length()
    }

    pub fn into_path(self) -> Path<St> {
        self.path
    }
}
