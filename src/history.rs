use crate::moves::Move;

/// Append-only log of committed moves, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> + '_ {
        self.moves.iter()
    }

    /// Remove the newest move and return the move that undoes it.
    pub fn pop_reversal(&mut self) -> Option<Move> {
        self.moves.pop().map(|mv| mv.reverse())
    }

    pub fn reversals(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().rev().map(Move::reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Direction;

    #[test]
    fn records_in_application_order() {
        let mut history = MoveHistory::new();
        let first = Move::new(Direction::Right, 1, 1, 1);
        let second = Move::new(Direction::Down, 1, 0, 1);
        history.record(first);
        history.record(second);

        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(history.last(), Some(&second));
    }

    #[test]
    fn reversals_run_newest_first() {
        let mut history = MoveHistory::new();
        let first = Move::new(Direction::Right, 1, 1, 1);
        let second = Move::new(Direction::Down, 1, 0, 1);
        history.record(first);
        history.record(second);

        let undo: Vec<Move> = history.reversals().collect();
        assert_eq!(undo, vec![second.reverse(), first.reverse()]);
        assert_eq!(history.len(), 2);

        assert_eq!(history.pop_reversal(), Some(second.reverse()));
        assert_eq!(history.pop_reversal(), Some(first.reverse()));
        assert_eq!(history.pop_reversal(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn clear_discards_everything() {
        let mut history = MoveHistory::new();
        history.record(Move::new(Direction::Up, 0, 1, 1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
    }
}
