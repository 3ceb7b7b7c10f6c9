//! # Maximum bipartite matching between colored pips and mana sources

// Augmenting path approach, see
// - https://en.wikipedia.org/wiki/Ford%E2%80%93Fulkerson_algorithm
// - http://olympiad.cs.uct.ac.za/presentations/camp2_2017/bipartitematching-robin.pdf

/// Scratch space reused across matching calls to avoid allocating per spell
#[derive(Debug, Default)]
pub struct MatchingScratch {
    seen: Vec<bool>,
    matches: Vec<Option<usize>>,
}

impl MatchingScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, source_count: usize) {
        self.seen.clear();
        self.seen.resize(source_count, false);
        self.matches.clear();
        self.matches.resize(source_count, None);
    }
}

/// Returns the size of the maximum matching of the bipartite graph with
/// `pip_count` rows (pips) and `source_count` columns (sources), where
/// `pays(pip, source)` is true when the source can pay for the pip.
pub fn maximum_bipartite_matching<F>(
    pip_count: usize,
    source_count: usize,
    pays: F,
    scratch: &mut MatchingScratch,
) -> usize
where
    F: Fn(usize, usize) -> bool,
{
    scratch.reset(source_count);
    let mut match_count = 0;
    for pip in 0..pip_count {
        for s in scratch.seen.iter_mut() {
            *s = false;
        }
        if find_source(pip, source_count, &pays, scratch) {
            match_count += 1;
        }
    }
    match_count
}

fn find_source<F>(pip: usize, source_count: usize, pays: &F, scratch: &mut MatchingScratch) -> bool
where
    F: Fn(usize, usize) -> bool,
{
    for source in 0..source_count {
        if !pays(pip, source) || scratch.seen[source] {
            continue;
        }
        scratch.seen[source] = true;
        // Free source, or the pip holding it can move to another source
        let available = match scratch.matches[source] {
            None => true,
            Some(other_pip) => find_source(other_pip, source_count, pays, scratch),
        };
        if available {
            scratch.matches[source] = Some(pip);
            return true;
        }
    }
    false
}
