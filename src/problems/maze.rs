//! Grid mazes with walls between rooms.
//!
//! ```text
//! +--+--+--+
//! |S       |
//! +  +--+  +
//! |     | G|
//! +--+--+--+
//! ```
//!
//! Each room is three characters wide and two tall. `+` marks corners, `--`
//! and `|` are walls, and rooms may hold a marker (`S` start, `G` goal, `!`
//! both, `*` part of a path).

use bitflags::bitflags;
use derive_more::Display;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::problem::Problem;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

pub type Coord = u32;

/// A room in the maze.
///
/// `x` grows to the East and `y` to the South, so `(0,0)` is the top-left
/// room.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({x},{y})")]
pub struct MazeState {
    pub x: Coord,
    pub y: Coord,
}

impl MazeState {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}
impl State for MazeState {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North, // y--
    South, // y++
    East,  // x++
    West,  // x--
}

impl Direction {
    /// Also the order neighbours are generated in.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    fn wall(self) -> Walls {
        match self {
            Direction::North => Walls::NORTH,
            Direction::South => Walls::SOUTH,
            Direction::East => Walls::EAST,
            Direction::West => Walls::WEST,
        }
    }
}

bitflags! {
    /// The walls standing around a room.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Walls: u8 {
        const NORTH = 1 << 0;
        const SOUTH = 1 << 1;
        const EAST = 1 << 2;
        const WEST = 1 << 3;
    }
}

/// A rectangular grid of rooms.
///
/// A wall between two rooms is stored on both of them, and every mutation
/// keeps both sides in sync.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeSpace {
    width: Coord,
    height: Coord,
    /// Row-major.
    rooms: Vec<Walls>,
}

impl MazeSpace {
    /// A maze where every room is closed.
    pub fn walled(width: Coord, height: Coord) -> Self {
        Self {
            width,
            height,
            rooms: vec![Walls::all(); width as usize * height as usize],
        }
    }

    /// A maze without inner walls.
    pub fn open(width: Coord, height: Coord) -> Self {
        let mut space = Self::walled(width, height);
        for y in 0..height {
            for x in 0..width {
                let s = MazeState::new(x, y);
                for d in [Direction::South, Direction::East] {
                    space.carve(&s, d);
                }
            }
        }
        space
    }

    /// Carves a perfect maze.
    ///
    /// Walks randomly from a random room, knocking down the wall to every
    /// room it hasn't seen yet and backtracking on dead ends. Every room ends
    /// up connected to every other one through exactly one path.
    pub fn generate<R: rand::Rng>(width: Coord, height: Coord, r: &mut R) -> Self {
        let mut space = Self::walled(width, height);
        if space.rooms.is_empty() {
            return space;
        }

        let mut seen = vec![false; space.rooms.len()];
        let start = MazeState::new(r.random_range(0..width), r.random_range(0..height));
        seen[space.index(&start)] = true;

        let mut walk = vec![(start, shuffled_directions(r))];
        while let Some((s, directions)) = walk.last_mut() {
            let s = *s;
            let Some(d) = directions.pop() else {
                walk.pop();
                continue;
            };
            let Some(n) = space.step(&s, d) else {
                continue;
            };
            let i = space.index(&n);
            if !seen[i] {
                seen[i] = true;
                space.carve(&s, d);
                walk.push((n, shuffled_directions(r)));
            }
        }

        space
    }

    pub fn dimensions(&self) -> (Coord, Coord) {
        (self.width, self.height)
    }

    #[inline(always)]
    fn index(&self, s: &MazeState) -> usize {
        debug_assert!(self.valid(s));
        s.y as usize * self.width as usize + s.x as usize
    }

    pub fn walls(&self, s: &MazeState) -> Walls {
        self.rooms[self.index(s)]
    }

    pub fn has_wall(&self, s: &MazeState, d: Direction) -> bool {
        self.walls(s).contains(d.wall())
    }

    /// The room next to `s`, ignoring walls.
    pub fn step(&self, s: &MazeState, d: Direction) -> Option<MazeState> {
        #[rustfmt::skip]
        let (x, y) = match d {
            Direction::North => (Some(s.x),        s.y.checked_sub(1)),
            Direction::South => (Some(s.x),        s.y.checked_add(1)),
            Direction::East  => (s.x.checked_add(1), Some(s.y)),
            Direction::West  => (s.x.checked_sub(1), Some(s.y)),
        };
        let n = MazeState::new(x?, y?);
        self.valid(&n).then_some(n)
    }

    /// Knocks down the wall between `s` and its neighbour towards `d`.
    ///
    /// Walls on the border stay up, returns whether the wall went down.
    pub fn carve(&mut self, s: &MazeState, d: Direction) -> bool {
        let Some(n) = self.step(s, d) else {
            return false;
        };
        let (i, j) = (self.index(s), self.index(&n));
        self.rooms[i].remove(d.wall());
        self.rooms[j].remove(d.opposite().wall());
        true
    }

    /// Raises the wall between `s` and its neighbour towards `d`.
    pub fn build(&mut self, s: &MazeState, d: Direction) {
        let i = self.index(s);
        self.rooms[i].insert(d.wall());
        if let Some(n) = self.step(s, d) {
            let j = self.index(&n);
            self.rooms[j].insert(d.opposite().wall());
        }
    }

    /// Number of open passages between rooms.
    ///
    /// Perfect mazes have one less passage than rooms.
    pub fn passages(&self) -> usize {
        let mut passages = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let s = MazeState::new(x, y);
                for d in [Direction::South, Direction::East] {
                    if self.step(&s, d).is_some() && !self.has_wall(&s, d) {
                        passages += 1;
                    }
                }
            }
        }
        passages
    }

    fn write_rooms<F>(&self, f: &mut std::fmt::Formatter, marker: F) -> std::fmt::Result
    where
        F: Fn(&MazeState) -> Option<char>,
    {
        let horizontal = |wall: bool| if wall { "--" } else { "  " };
        let vertical = |wall: bool| if wall { '|' } else { ' ' };
        if self.rooms.is_empty() {
            return Ok(());
        }

        for x in 0..self.width {
            let s = MazeState::new(x, 0);
            write!(f, "+{}", horizontal(self.has_wall(&s, Direction::North)))?;
        }
        writeln!(f, "+")?;

        for y in 0..self.height {
            for x in 0..self.width {
                let s = MazeState::new(x, y);
                let m = marker(&s).unwrap_or(' ');
                write!(f, "{}{m} ", vertical(self.has_wall(&s, Direction::West)))?;
            }
            let last = MazeState::new(self.width - 1, y);
            writeln!(f, "{}", vertical(self.has_wall(&last, Direction::East)))?;

            for x in 0..self.width {
                let s = MazeState::new(x, y);
                write!(f, "+{}", horizontal(self.has_wall(&s, Direction::South)))?;
            }
            writeln!(f, "+")?;
        }

        Ok(())
    }
}

fn shuffled_directions<R: rand::Rng>(r: &mut R) -> Vec<Direction> {
    let mut directions = Direction::ALL.to_vec();
    directions.shuffle(r);
    directions
}

impl Space<MazeState> for MazeSpace {
    #[inline(always)]
    fn valid(&self, s: &MazeState) -> bool {
        s.x < self.width && s.y < self.height
    }

    /// Gets the rooms reachable in one step, in [`Direction::ALL`] order.
    fn neighbours(&self, s: &MazeState) -> Vec<MazeState> {
        let mut v = Vec::<MazeState>::with_capacity(4);
        for d in Direction::ALL {
            if self.has_wall(s, d) {
                continue;
            }
            if let Some(n) = self.step(s, d) {
                v.push(n);
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        Some(self.rooms.len())
    }
}

impl std::fmt::Display for MazeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.write_rooms(f, |_| None)
    }
}

impl std::fmt::Debug for MazeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze{:?}", self.dimensions())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid dimensions, {lines} lines of {columns} characters")]
    InvalidDimensions { columns: usize, lines: usize },
    #[error("Line {y} is longer than the top border")]
    RaggedLine { y: usize },
    #[error("Invalid character '{ch}' found at ({x},{y})")]
    InvalidCharacter { ch: char, x: usize, y: usize },
    #[error("Marker '{marker}' found more than once")]
    DuplicateMarker { marker: char },
}

/// Rooms holding a marker, as read from a maze.
#[derive(Debug, Default)]
struct Markers {
    start: Option<MazeState>,
    goal: Option<MazeState>,
}

impl Markers {
    fn set(slot: &mut Option<MazeState>, marker: char, s: MazeState) -> Result<(), MazeParseError> {
        if slot.replace(s).is_some() {
            return Err(MazeParseError::DuplicateMarker { marker });
        }
        Ok(())
    }
}

fn parse(input: &str) -> Result<(MazeSpace, Markers), MazeParseError> {
    // Blank lines around the maze are not part of it
    let mut lines: Vec<Vec<char>> = input
        .lines()
        .skip_while(|l| l.trim().is_empty())
        .map(|l| l.chars().collect())
        .collect();
    while lines.last().is_some_and(|l| l.iter().all(|c| c.is_whitespace())) {
        lines.pop();
    }
    if lines.is_empty() {
        return Err(MazeParseError::EmptyInput);
    }

    let columns = lines[0].len();
    let invalid_dimensions = MazeParseError::InvalidDimensions {
        columns,
        lines: lines.len(),
    };
    if columns < 4 || (columns - 1) % 3 != 0 || lines.len() < 3 || lines.len() % 2 == 0 {
        return Err(invalid_dimensions);
    }
    let (Ok(width), Ok(height)) = (
        Coord::try_from((columns - 1) / 3),
        Coord::try_from((lines.len() - 1) / 2),
    ) else {
        return Err(invalid_dimensions);
    };
    if let Some(y) = lines.iter().position(|l| l.len() > columns) {
        return Err(MazeParseError::RaggedLine { y });
    }

    // Trailing blanks may have been trimmed away
    let at = |x: usize, y: usize| lines[y].get(x).copied().unwrap_or(' ');
    let invalid = |x: usize, y: usize| MazeParseError::InvalidCharacter { ch: at(x, y), x, y };
    let horizontal = |x: usize, y: usize| match (at(x, y), at(x + 1, y)) {
        ('-', '-') => Ok(true),
        (' ', ' ') => Ok(false),
        ('-', _) | (' ', _) => Err(invalid(x + 1, y)),
        _ => Err(invalid(x, y)),
    };
    let vertical = |x: usize, y: usize| match at(x, y) {
        '|' => Ok(true),
        ' ' => Ok(false),
        _ => Err(invalid(x, y)),
    };

    // Walls are raised as they are read
    let mut space = MazeSpace {
        width,
        height,
        rooms: vec![Walls::empty(); width as usize * height as usize],
    };
    let mut markers = Markers::default();

    for (y, line) in lines.iter().enumerate().step_by(2) {
        for x in (0..columns).step_by(3) {
            if line.get(x) != Some(&'+') {
                return Err(invalid(x, y));
            }
        }
    }

    for ry in 0..height {
        let y = 2 * ry as usize;
        for rx in 0..width {
            let x = 3 * rx as usize;
            let s = MazeState::new(rx, ry);

            for (d, wall) in [
                (Direction::North, horizontal(x + 1, y)?),
                (Direction::South, horizontal(x + 1, y + 2)?),
                (Direction::West, vertical(x, y + 1)?),
                (Direction::East, vertical(x + 3, y + 1)?),
            ] {
                if wall {
                    space.build(&s, d);
                }
            }

            match (at(x + 1, y + 1), at(x + 2, y + 1)) {
                (' ' | '.' | '*', ' ' | '.') => {}
                ('S', ' ' | '.') => Markers::set(&mut markers.start, 'S', s)?,
                ('G', ' ' | '.') => Markers::set(&mut markers.goal, 'G', s)?,
                ('!', ' ' | '.') => {
                    Markers::set(&mut markers.start, '!', s)?;
                    Markers::set(&mut markers.goal, '!', s)?;
                }
                (' ' | '.' | '*' | 'S' | 'G' | '!', _) => return Err(invalid(x + 2, y + 1)),
                _ => return Err(invalid(x + 1, y + 1)),
            }
        }
    }

    Ok((space, markers))
}

impl std::convert::TryFrom<&str> for MazeSpace {
    type Error = MazeParseError;

    /// Reads the walls of a maze, ignoring its markers.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        parse(s).map(|(space, _markers)| space)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("The maze has no rooms")]
    Empty,
    #[error("The {role} {s} is outside of the {width}x{height} maze")]
    OutOfBounds {
        role: &'static str,
        s: MazeState,
        width: Coord,
        height: Coord,
    },
    #[error("Invalid maze: {0}")]
    Parse(#[from] MazeParseError),
}

/// Go from an entry room to an exit room.
#[derive(Clone, Debug)]
pub struct MazeProblem {
    space: MazeSpace,
    start: MazeState,
    goal: MazeState,
}

impl MazeProblem {
    pub fn new(space: MazeSpace, start: MazeState, goal: MazeState) -> Result<Self, MazeError> {
        if space.rooms.is_empty() {
            return Err(MazeError::Empty);
        }
        let (width, height) = space.dimensions();
        for (role, s) in [("start", start), ("goal", goal)] {
            if !space.valid(&s) {
                return Err(MazeError::OutOfBounds {
                    role,
                    s,
                    width,
                    height,
                });
            }
        }

        Ok(Self { space, start, goal })
    }

    /// Enter on the top-left room and leave on the bottom-right one.
    pub fn with_corners(space: MazeSpace) -> Result<Self, MazeError> {
        let (width, height) = space.dimensions();
        let start = MazeState::new(0, 0);
        let goal = MazeState::new(width.saturating_sub(1), height.saturating_sub(1));
        Self::new(space, start, goal)
    }

    /// A random perfect maze with its entry and exit on opposite corners.
    pub fn generate<R: rand::Rng>(
        width: Coord,
        height: Coord,
        r: &mut R,
    ) -> Result<Self, MazeError> {
        Self::with_corners(MazeSpace::generate(width, height, r))
    }

    pub fn goal(&self) -> &MazeState {
        &self.goal
    }

    /// Shows the maze with a path drawn over it.
    pub fn display_path<'a>(&'a self, path: &'a Path<MazeState>) -> MazePathDisplay<'a> {
        MazePathDisplay {
            problem: self,
            path,
        }
    }

    fn marker(&self, s: &MazeState) -> Option<char> {
        match (*s == self.start, *s == self.goal) {
            (true, true) => Some('!'),
            (true, false) => Some('S'),
            (false, true) => Some('G'),
            (false, false) => None,
        }
    }
}

impl Problem<MazeSpace, MazeState> for MazeProblem {
    fn space(&self) -> &MazeSpace {
        &self.space
    }
    fn start(&self) -> &MazeState {
        &self.start
    }
    #[inline(always)]
    fn is_goal(&self, s: &MazeState) -> bool {
        *s == self.goal
    }
}

impl std::convert::TryFrom<&str> for MazeProblem {
    type Error = MazeError;

    /// Reads a maze, falling back to the corners for missing markers.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let (space, markers) = parse(s)?;
        let (width, height) = space.dimensions();
        let start = markers.start.unwrap_or(MazeState::new(0, 0));
        let goal = markers
            .goal
            .unwrap_or(MazeState::new(width.saturating_sub(1), height.saturating_sub(1)));
        Self::new(space, start, goal)
    }
}

impl std::fmt::Display for MazeProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.space.write_rooms(f, |s| self.marker(s))
    }
}

pub struct MazePathDisplay<'a> {
    problem: &'a MazeProblem,
    path: &'a Path<MazeState>,
}

impl std::fmt::Display for MazePathDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.problem.space.write_rooms(f, |s| {
            self.problem
                .marker(s)
                .or_else(|| self.path.states().contains(s).then_some('*'))
        })
    }
}
