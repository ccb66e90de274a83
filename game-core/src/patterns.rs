use std::collections::HashSet;

use game_types::{Card, Pattern, CARD_SIZE, FREE_INDEX};

const CORNER_INDICES: [usize; 4] = [0, 4, 20, 24];

/// Checks whether the marked cells of `card` satisfy `pattern`.
///
/// Pure and total: no side effects, and a malformed card never panics, it
/// just fails every pattern. The free center counts as marked for patterns
/// that include it.
pub fn is_satisfied(pattern: Pattern, card: &Card, marked: &HashSet<u16>) -> bool {
    if !card.is_complete() {
        return false;
    }

    match pattern {
        Pattern::Line => any_line(card, marked),
        Pattern::FourCorners => CORNER_INDICES
            .iter()
            .all(|&i| cell_marked(card, marked, i)),
        Pattern::X => diagonals(card, marked),
        Pattern::FullHouse | Pattern::Blackout => {
            (0..CARD_SIZE).all(|i| cell_marked(card, marked, i))
        }
    }
}

fn cell_marked(card: &Card, marked: &HashSet<u16>, index: usize) -> bool {
    index == FREE_INDEX || marked.contains(&card.cells[index])
}

fn any_line(card: &Card, marked: &HashSet<u16>) -> bool {
    for row in 0..5 {
        if (0..5).all(|col| cell_marked(card, marked, row * 5 + col)) {
            return true;
        }
    }
    for col in 0..5 {
        if (0..5).all(|row| cell_marked(card, marked, row * 5 + col)) {
            return true;
        }
    }
    false
}

fn diagonals(card: &Card, marked: &HashSet<u16>) -> bool {
    let main = (0..5).all(|i| cell_marked(card, marked, i * 6));
    let anti = (0..5).all(|i| cell_marked(card, marked, i * 4 + 4));
    main && anti
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::generate_card;

    fn mark_indices(card: &Card, indices: &[usize]) -> HashSet<u16> {
        indices
            .iter()
            .filter(|&&i| i != FREE_INDEX)
            .map(|&i| card.cells[i])
            .collect()
    }

    #[test]
    fn test_top_row_line() {
        let card = generate_card(100);
        let marked = mark_indices(&card, &[0, 1, 2, 3, 4]);

        assert!(is_satisfied(Pattern::Line, &card, &marked));
    }

    #[test]
    fn test_four_of_five_is_not_a_line() {
        let card = generate_card(100);
        let marked = mark_indices(&card, &[0, 1, 2, 3]);

        assert!(!is_satisfied(Pattern::Line, &card, &marked));
    }

    #[test]
    fn test_middle_row_uses_free_center() {
        let card = generate_card(100);
        // Middle row is indices 10..=14; the free center at 12 needs no mark.
        let marked = mark_indices(&card, &[10, 11, 13, 14]);

        assert!(is_satisfied(Pattern::Line, &card, &marked));
    }

    #[test]
    fn test_column_line() {
        let card = generate_card(100);
        let marked = mark_indices(&card, &[3, 8, 13, 18, 23]);

        assert!(is_satisfied(Pattern::Line, &card, &marked));
    }

    #[test]
    fn test_four_corners() {
        let card = generate_card(100);
        let corners = mark_indices(&card, &[0, 4, 20, 24]);

        assert!(is_satisfied(Pattern::FourCorners, &card, &corners));
        assert!(!is_satisfied(Pattern::FullHouse, &card, &corners));
    }

    #[test]
    fn test_x_needs_both_diagonals() {
        let card = generate_card(100);
        let main_only = mark_indices(&card, &[0, 6, 18, 24]);
        assert!(!is_satisfied(Pattern::X, &card, &main_only));

        let both = mark_indices(&card, &[0, 6, 18, 24, 4, 8, 16, 20]);
        assert!(is_satisfied(Pattern::X, &card, &both));
    }

    #[test]
    fn test_full_house_and_blackout_need_every_cell() {
        let card = generate_card(100);
        let all: Vec<usize> = (0..CARD_SIZE).collect();
        let marked = mark_indices(&card, &all);

        assert!(is_satisfied(Pattern::FullHouse, &card, &marked));
        assert!(is_satisfied(Pattern::Blackout, &card, &marked));

        let mut short = marked.clone();
        short.remove(&card.cells[24]);
        assert!(!is_satisfied(Pattern::FullHouse, &card, &short));
    }

    #[test]
    fn test_incomplete_card_fails_everything() {
        let card = Card {
            center_number: 10,
            cells: vec![1, 2, 3],
        };
        let marked: HashSet<u16> = [1, 2, 3].into_iter().collect();

        for pattern in Pattern::ALL {
            assert!(!is_satisfied(pattern, &card, &marked));
        }
    }
}
