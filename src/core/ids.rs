//! Fortlaufende, host-lesbare IDs für Marker, Labels, Pfade und Züge.

/// Erzeugt IDs der Form `<prefix>-<n>`.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: u64,
}

impl IdSequence {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Nächste freie ID; `taken` meldet bereits vergebene (z.B. importierte) IDs.
    pub fn next_free(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{}-{}", self.prefix, self.next);
            self.next += 1;
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_taken_ids() {
        let mut seq = IdSequence::new("poi");
        let id = seq.next_free(|c| c == "poi-1");
        assert_eq!(id, "poi-2");
        assert_eq!(seq.next_free(|_| false), "poi-3");
    }
}
