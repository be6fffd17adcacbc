//! Approximate substring matching.
//!
//! Scores how well a pattern occurs anywhere inside a text, tolerating
//! substitutions, insertions and deletions. The score is
//! `errors / pattern_len + match_start / distance`, so `0.0` is an exact
//! match at the start of the text and larger values are worse.

/// Edit-distance matcher with a relative-error acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
    distance: f64,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: usize,
    start: usize,
}

impl Cell {
    fn better(self, other: Cell) -> Cell {
        if (other.cost, other.start) < (self.cost, self.start) {
            other
        } else {
            self
        }
    }
}

impl FuzzyMatcher {
    /// Creates a matcher.
    ///
    /// * `threshold` - highest accepted score (0.3 accepts roughly 30% errors)
    /// * `distance` - how far into the text a match may start before the
    ///   location penalty alone reaches 1.0
    pub fn new(threshold: f64, distance: f64) -> Self {
        Self {
            threshold,
            distance,
        }
    }

    /// Returns the accepted score of `pattern` within `text`, or `None` when
    /// the best alignment exceeds the threshold.
    ///
    /// An empty pattern never matches.
    pub fn score(&self, pattern: &[char], text: &[char]) -> Option<f64> {
        let best = self.best_alignment(pattern, text)?;
        (best <= self.threshold).then_some(best)
    }

    fn best_alignment(&self, pattern: &[char], text: &[char]) -> Option<f64> {
        if pattern.is_empty() {
            return None;
        }
        if pattern == text {
            return Some(0.0);
        }

        let m = pattern.len() as f64;

        // Semi-global alignment: the match may begin at any text position
        // at no cost, and the start position rides along with each cell.
        let mut prev: Vec<Cell> = (0..=text.len()).map(|j| Cell { cost: 0, start: j }).collect();
        let mut cur = prev.clone();

        for (i, &pc) in pattern.iter().enumerate() {
            cur[0] = Cell {
                cost: i + 1,
                start: 0,
            };
            for (j, &tc) in text.iter().enumerate() {
                let diagonal = Cell {
                    cost: prev[j].cost + usize::from(pc != tc),
                    start: prev[j].start,
                };
                let skip_pattern = Cell {
                    cost: prev[j + 1].cost + 1,
                    start: prev[j + 1].start,
                };
                let skip_text = Cell {
                    cost: cur[j].cost + 1,
                    start: cur[j].start,
                };
                cur[j + 1] = diagonal.better(skip_pattern).better(skip_text);
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        prev.iter()
            .map(|cell| cell.cost as f64 / m + self.location_penalty(cell.start))
            .min_by(f64::total_cmp)
    }

    fn location_penalty(&self, start: usize) -> f64 {
        if self.distance > 0.0 {
            start as f64 / self.distance
        } else if start == 0 {
            0.0
        } else {
            1.0
        }
    }
}
