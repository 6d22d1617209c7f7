use std::collections::HashSet;

use crate::models::{CandidateMovie, MovieId};

/// Candidates merged across strategies, unique by catalog id
///
/// Insertion order is preserved and the first occurrence of an id wins; later
/// duplicates are dropped without touching the kept record.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<MovieId>,
    movies: Vec<CandidateMovie>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate unless its id was already seen; returns whether it was added
    pub fn push(&mut self, movie: CandidateMovie) -> bool {
        if self.seen.insert(movie.id) {
            self.movies.push(movie);
            true
        } else {
            false
        }
    }

    pub fn into_vec(self) -> Vec<CandidateMovie> {
        self.movies
    }
}

impl Extend<CandidateMovie> for CandidateSet {
    fn extend<I: IntoIterator<Item = CandidateMovie>>(&mut self, iter: I) {
        for movie in iter {
            self.push(movie);
        }
    }
}

/// Merges per-strategy lists, given in strategy priority order
pub fn merge<I>(strategy_outputs: I) -> Vec<CandidateMovie>
where
    I: IntoIterator<Item = Vec<CandidateMovie>>,
{
    let mut set = CandidateSet::new();
    for candidates in strategy_outputs {
        set.extend(candidates);
    }
    set.into_vec()
}
