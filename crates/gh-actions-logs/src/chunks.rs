//! Budget-bounded splitting of log text

/// Default chunk budget in characters
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// Iterator over consecutive slices of a log, each at most `budget` characters
///
/// A chunk ends right after the last newline that fits in the budget, so
/// concatenating all chunks reproduces the input exactly. A single line longer
/// than the budget is the only case that is cut mid-line.
#[derive(Debug, Clone)]
pub struct LogChunks<'a> {
    rest: &'a str,
    budget: usize,
}

impl<'a> LogChunks<'a> {
    /// Split `log` into chunks of at most `budget` characters (minimum 1)
    pub fn new(log: &'a str, budget: usize) -> Self {
        Self {
            rest: log,
            budget: budget.max(1),
        }
    }
}

impl<'a> Iterator for LogChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        // Byte offset just past the first `budget` characters
        let limit = match self.rest.char_indices().nth(self.budget) {
            Some((idx, _)) => idx,
            None => {
                let chunk = self.rest;
                self.rest = "";
                return Some(chunk);
            }
        };

        let cut = match self.rest[..limit].rfind('\n') {
            Some(pos) => pos + 1,
            None => limit,
        };

        let (chunk, rest) = self.rest.split_at(cut);
        self.rest = rest;
        Some(chunk)
    }
}
