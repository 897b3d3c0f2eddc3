//! Previous/current boolean pairs for edge-triggered behavior

/// Transition observed on one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    Steady,
}

/// Tracks a condition across frames and reports its transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    previous: bool,
    current: bool,
}

impl EdgeDetector {
    /// Feed this frame's value; compare once per frame
    pub fn update(&mut self, value: bool) -> Edge {
        self.previous = self.current;
        self.current = value;
        match (self.previous, self.current) {
            (false, true) => Edge::Rising,
            (true, false) => Edge::Falling,
            _ => Edge::Steady,
        }
    }

    pub fn is_high(&self) -> bool {
        self.current
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let mut edge = EdgeDetector::default();
        assert_eq!(edge.update(false), Edge::Steady);
        assert_eq!(edge.update(true), Edge::Rising);
        assert_eq!(edge.update(true), Edge::Steady);
        assert_eq!(edge.update(false), Edge::Falling);
        assert!(!edge.is_high());
    }
}
