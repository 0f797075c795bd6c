//! Breadth-first and Depth-first search.
//!
//! Both share one skeleton and only differ in the order the frontier hands
//! States back.

use std::collections::hash_map::Entry;
use std::marker::PhantomData;

use derive_more::Display;
use rustc_hash::FxHashMap;

use crate::data_structures::frontier::Frontier;
use crate::problem::Problem;
use crate::search::PathNotFoundError;
use crate::search::SearchResult;
use crate::search::SearchStats;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Which uninformed search to run.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Expands the oldest discovered State first. Finds shortest paths.
    #[display("BFS")]
    Bfs,
    /// Expands the newest discovered State first.
    #[display("DFS")]
    Dfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Bfs, Algorithm::Dfs];

    fn frontier<St>(self) -> Frontier<St> {
        match self {
            Algorithm::Bfs => Frontier::fifo(),
            Algorithm::Dfs => Frontier::lifo(),
        }
    }
}

/// A single run of an uninformed search over a borrowed Problem.
#[derive(Debug)]
pub struct UninformedSearch<'p, P, Sp, St>
where
    P: Problem<Sp, St>,
    Sp: Space<St>,
    St: State,
{
    algorithm: Algorithm,
    frontier: Frontier<St>,

    /// Amalgamation of,
    /// - The "Visited Set" `HashSet<St>`
    ///   - Every State ever pushed to the frontier.
    /// - The "Parent Map" `HashMap<St, St>`
    ///   - The State each State was discovered from, `None` for the start.
    parents: FxHashMap<St, Option<St>>,

    stats: SearchStats,

    problem: &'p P,

    _phantom_space: PhantomData<Sp>,
}

impl<'p, P, Sp, St> UninformedSearch<'p, P, Sp, St>
where
    P: Problem<Sp, St>,
    Sp: Space<St>,
    St: State,
{
    /// Initialises the Search
    #[must_use]
    pub fn new(problem: &'p P, algorithm: Algorithm) -> Self {
        let mut search = Self {
            algorithm,
            frontier: algorithm.frontier(),
            parents: FxHashMap::default(),
            stats: SearchStats::default(),

            problem,

            _phantom_space: PhantomData,
        };

        let start = problem.start().clone();
        search.parents.insert(start.clone(), None);
        search.push(start);

        search
    }

    /// Runs the search until the first goal is found.
    pub fn find_first(mut self) -> Result<SearchResult<St>, PathNotFoundError> {
        let start = self.problem.start();
        log::debug!(
            "{} from {:?} on a space of {} States",
            self.algorithm,
            start,
            self.problem
                .space()
                .size()
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        if self.problem.is_goal(start) {
            return Ok(self.solution(start.clone()));
        }

        while let Some(state) = self.frontier.pop() {
            if self.problem.is_goal(&state) {
                return Ok(self.solution(state));
            }

            // Expand state
            self.stats.expanded();
            log::trace!("{} expanding {:?}", self.algorithm, state);
            for s in self.problem.neighbours(&state) {
                // Have we seen this State?
                match self.parents.entry(s) {
                    Entry::Occupied(_) => continue,
                    Entry::Vacant(e) => {
                        let s = e.key().clone();
                        e.insert(Some(state.clone()));
                        self.push(s);
                    }
                }
            }
        }

        log::debug!(
            "{} exhausted the frontier after {} expansions",
            self.algorithm,
            self.stats.nodes_expanded()
        );
        Err(PathNotFoundError)
    }

    #[inline(always)]
    fn push(&mut self, s: St) {
        self.frontier.push(s);
        self.stats.observe_frontier(self.frontier.len());
    }

    fn solution(&self, goal: St) -> SearchResult<St> {
        let path = self.path(goal);
        debug_assert!(path.start() == self.problem.start());
        debug_assert!(self.problem.is_goal(path.end()));
        #[cfg(feature = "verify")]
        assert!(
            self.problem.space().valid_path(&path),
            "{} found an invalid path {}",
            self.algorithm,
            path
        );

        let result = SearchResult::new(path, self.stats);
        log::debug!("{} found {}. {}", self.algorithm, result.path(), result.stats());
        result
    }

    /// Walks the parents back from `end` to the start.
    #[must_use]
    fn path(&self, end: St) -> Path<St> {
        let mut path = Path::new_from_start(end.clone());

        let mut state = end;
        while let Some(Some(parent)) = self.parents.get(&state) {
            debug_assert!(*parent != state);
            path.append(parent.clone());
            state = parent.clone();
        }

        path.reverse();
        path
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Searches `problem` with `algorithm`.
pub fn search<P, Sp, St>(
    problem: &P,
    algorithm: Algorithm,
) -> Result<SearchResult<St>, PathNotFoundError>
where
    P: Problem<Sp, St>,
    Sp: Space<St>,
    St: State,
{
    UninformedSearch::new(problem, algorithm).find_first()
}

/// Breadth-first search.
pub fn bfs<P, Sp, St>(problem: &P) -> Result<SearchResult<St>, PathNotFoundError>
where
    P: Problem<Sp, St>,
    Sp: Space<St>,
    St: State,
{
    search(problem, Algorithm::Bfs)
}

/// Depth-first search.
pub fn dfs<P, Sp, St>(problem: &P) -> Result<SearchResult<St>, PathNotFoundError>
where
    P: Problem<Sp, St>,
    Sp: Space<St>,
    St: State,
{
    search(problem, Algorithm::Dfs)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::problems::graph::DirectedGraph;
    use crate::problems::graph::GraphProblem;
    use crate::problems::graph::NodeId;
    use crate::problems::maze::MazeProblem;
    use crate::problems::maze::MazeSpace;
    use crate::problems::maze::MazeState;

    fn graph(
        n: usize,
        edges: &[(NodeId, NodeId)],
        start: NodeId,
        goals: &[NodeId],
    ) -> GraphProblem {
        let g = DirectedGraph::from_edges(n, edges).unwrap();
        GraphProblem::new(g, start, goals.iter().copied()).unwrap()
    }

    /// Checks the path goes from the start to a goal through valid moves.
    fn check_solution<P, Sp, St>(p: &P, result: &SearchResult<St>)
    where
        P: Problem<Sp, St>,
        Sp: Space<St>,
        St: State,
    {
        let path = result.path();
        assert_eq!(path.start(), p.start());
        assert!(p.is_goal(path.end()));
        assert!(p.space().valid_path(path));
        assert_eq!(result.path_length(), path.len());

        // No State is visited twice
        for (i, s) in path.iter().enumerate() {
            assert!(!path.states()[i + 1..].contains(s), "{s:?} repeats in {path}");
        }
    }

    #[test]
    fn linear_chain() {
        let p = graph(3, &[(0, 1), (1, 2)], 0, &[2]);

        let r = bfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 1, 2]);
        assert_eq!(r.nodes_expanded(), 2);
        assert_eq!(r.max_frontier_size(), 1);

        let r = dfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 1, 2]);
        assert_eq!(r.nodes_expanded(), 2);
        assert_eq!(r.max_frontier_size(), 1);
    }

    #[test]
    fn weighted_matrix_chain() {
        // 0 -> 1 -> 2 -> 0, 3 is isolated
        let matrix = vec![
            vec![None, Some(1.5), None, None],
            vec![None, None, Some(2.0), None],
            vec![Some(0.5), None, None, None],
            vec![None, None, None, None],
        ];
        let g = DirectedGraph::from_matrix(&matrix).unwrap();

        let p = GraphProblem::new(g.clone(), 0, [2]).unwrap();
        assert!(p.goals().contains(&2));
        for algorithm in Algorithm::ALL {
            let r = search(&p, algorithm).unwrap();
            check_solution(&p, &r);
            assert_eq!(r.nodes_expanded(), 2);
            assert_eq!(r.max_frontier_size(), 1);
            assert_eq!(r.into_path().states(), &[0, 1, 2]);
        }

        let p = GraphProblem::new(g, 0, [3]).unwrap();
        assert_eq!(bfs(&p), Err(PathNotFoundError));
        assert_eq!(dfs(&p), Err(PathNotFoundError));
    }

    #[test]
    fn start_is_goal() {
        let p = graph(3, &[(0, 1), (1, 0), (1, 2)], 1, &[1]);

        for algorithm in Algorithm::ALL {
            let r = search(&p, algorithm).unwrap();
            assert_eq!(r.path().states(), &[1]);
            assert_eq!(r.nodes_expanded(), 0);
            assert_eq!(r.max_frontier_size(), 1);
            assert_eq!(r.path_length(), 1);
        }
    }

    #[test]
    fn unreachable_goal() {
        // 3 can only be left
        let p = graph(4, &[(0, 1), (1, 2), (2, 0), (3, 0)], 0, &[3]);

        for algorithm in Algorithm::ALL {
            assert_eq!(search(&p, algorithm), Err(PathNotFoundError));
        }

        // No goals at all
        let p = graph(2, &[(0, 1)], 0, &[]);
        assert_eq!(bfs(&p), Err(PathNotFoundError));
        assert_eq!(dfs(&p), Err(PathNotFoundError));
    }

    #[test]
    fn diamond_follows_neighbour_order() {
        // 0 -> {1, 2} -> 3
        let p = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], 0, &[3]);
        let r = bfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 1, 3]);
        // 2 is expanded before reaching 3 again
        assert_eq!(r.nodes_expanded(), 3);
        assert_eq!(r.max_frontier_size(), 2);

        // Listing 2 first flips the route
        let p = graph(4, &[(0, 2), (0, 1), (1, 3), (2, 3)], 0, &[3]);
        let r = bfs(&p).unwrap();
        assert_eq!(r.path().states(), &[0, 2, 3]);

        // DFS dives into the last neighbour pushed
        let r = dfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 1, 3]);
        assert_eq!(r.path().edges(), 2);
    }

    #[test]
    fn bfs_finds_shortest_path() {
        // A long way 0->1->2->3->4 and a shortcut 0->5->4
        let p = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (5, 4)], 0, &[4]);

        let r = bfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 5, 4]);

        // DFS takes the shortcut's branch first, as it was pushed last
        let r = dfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 5, 4]);

        // Hiding the shortcut behind the long way makes DFS miss it
        let p = graph(6, &[(0, 5), (0, 1), (1, 2), (2, 3), (3, 4), (5, 4)], 0, &[4]);
        let r = dfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().states(), &[0, 1, 2, 3, 4]);
        assert_eq!(bfs(&p).unwrap().path().states(), &[0, 5, 4]);
    }

    #[test]
    fn cycles_terminate() {
        // A ring with a tail, the goal is past the ring
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (3, 1), (2, 0), (3, 4)];
        let p = graph(5, &edges, 0, &[4]);

        for algorithm in Algorithm::ALL {
            let r = search(&p, algorithm).unwrap();
            check_solution(&p, &r);
            assert_eq!(r.path().states(), &[0, 1, 2, 3, 4]);
            assert!(r.nodes_expanded() <= 5);
        }

        // Without a goal the ring is walked once and given up on
        let p = graph(5, &edges, 0, &[]);
        let search = UninformedSearch::new(&p, Algorithm::Dfs);
        assert_eq!(search.algorithm(), Algorithm::Dfs);
        assert_eq!(search.find_first(), Err(PathNotFoundError));
    }

    #[test]
    fn expansions_per_discipline() {
        // A binary tree of depth 2, the goal is the last leaf
        //       0
        //    1     2
        //   3 4   5 6
        let edges = [(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (2, 6)];
        let p = graph(7, &edges, 0, &[6]);

        let r = bfs(&p).unwrap();
        assert_eq!(r.path().states(), &[0, 2, 6]);
        // 0, 1, 2, 3, 4, 5
        assert_eq!(r.nodes_expanded(), 6);
        // 3 4 5 6 after expanding 2
        assert_eq!(r.max_frontier_size(), 4);

        let r = dfs(&p).unwrap();
        assert_eq!(r.path().states(), &[0, 2, 6]);
        // 0, 2
        assert_eq!(r.nodes_expanded(), 2);
        // 1 5 6 after expanding 2
        assert_eq!(r.max_frontier_size(), 3);
    }

    #[test]
    fn repeated_runs_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let p = MazeProblem::generate(12, 9, &mut rng).unwrap();

        for algorithm in Algorithm::ALL {
            let first = search(&p, algorithm).unwrap();
            for _ in 0..3 {
                assert_eq!(search(&p, algorithm).unwrap(), first);
            }
        }
    }

    #[test]
    fn single_room_maze() {
        let p = MazeProblem::with_corners(MazeSpace::walled(1, 1)).unwrap();
        for algorithm in Algorithm::ALL {
            let r = search(&p, algorithm).unwrap();
            assert_eq!(r.path_length(), 1);
            assert_eq!(r.nodes_expanded(), 0);
        }
    }

    #[test]
    fn two_by_two_maze() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = MazeProblem::generate(2, 2, &mut rng).unwrap();

            for algorithm in Algorithm::ALL {
                let r = search(&p, algorithm).unwrap();
                check_solution(&p, &r);
                // Opposite corners, whichever wall is missing
                assert_eq!(r.path_length(), 3);
                assert_eq!(r.path().edges(), 2);
            }
        }
    }

    #[test]
    fn perfect_mazes_have_one_path() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = MazeProblem::generate(10, 10, &mut rng).unwrap();

            let b = bfs(&p).unwrap();
            let d = dfs(&p).unwrap();
            check_solution(&p, &b);
            check_solution(&p, &d);
            assert_eq!(b.path(), d.path());
            assert!(b.nodes_expanded() < 100);
            assert!(d.nodes_expanded() < 100);
        }
    }

    #[test]
    fn open_maze() {
        let p = MazeProblem::with_corners(MazeSpace::open(5, 4)).unwrap();

        let b = bfs(&p).unwrap();
        check_solution(&p, &b);
        // Manhattan distance
        assert_eq!(b.path().edges(), 4 + 3);
        // South before East
        assert_eq!(
            b.path().states()[..5],
            [
                MazeState::new(0, 0),
                MazeState::new(0, 1),
                MazeState::new(0, 2),
                MazeState::new(0, 3),
                MazeState::new(1, 3),
            ]
        );

        let d = dfs(&p).unwrap();
        check_solution(&p, &d);
        assert!(d.path().edges() >= b.path().edges());
        assert!(d.nodes_expanded() < 5 * 4);
    }

    #[test]
    fn walled_in_maze() {
        let p = MazeProblem::try_from(indoc! {"
            +--+--+--+
            |S    |  |
            +--+  +  +
            |     | G|
            +--+--+--+
        "})
        .unwrap();

        for algorithm in Algorithm::ALL {
            assert_eq!(search(&p, algorithm), Err(PathNotFoundError));
        }
    }

    #[test]
    fn text_maze() {
        let p = MazeProblem::try_from(indoc! {"
            +--+--+--+--+
            |S          |
            +  +--+--+  +
            |     |     |
            +--+  +  +--+
            |G    |     |
            +--+--+--+--+
        "})
        .unwrap();

        let r = bfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(
            r.path().states(),
            &[
                MazeState::new(0, 0),
                MazeState::new(0, 1),
                MazeState::new(1, 1),
                MazeState::new(1, 2),
                MazeState::new(0, 2),
            ]
        );

        let r = dfs(&p).unwrap();
        check_solution(&p, &r);
        assert_eq!(r.path().end(), &MazeState::new(0, 2));
    }
}
