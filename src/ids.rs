//! Identifier generation for nodes and edges.

/// Monotonic id source producing `"{prefix}-{n}"`.
///
/// Ids already in use (e.g. from a host-supplied graph that follows the same
/// naming) are skipped, so a generated id is unique for the lifetime of the
/// graph it is generated for.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: &'static str,
    next: u64,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Produce the next id for which `is_taken` returns false.
    pub fn next_id<F>(&mut self, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let id = format!("{}-{}", self.prefix, self.next);
            self.next += 1;
            if !is_taken(&id) {
                return id;
            }
        }
    }
}
