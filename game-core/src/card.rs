use game_types::{Card, CARD_SIZE, FREE_INDEX, FREE_SENTINEL, NUMBER_MAX, NUMBER_MIN};

/// Builds the 5x5 card for a chosen center number.
///
/// Cells are the center plus offsets -12..=12 in row-major order, wrapped
/// around the [1, 200] number space, so every card holds 24 distinct playable
/// numbers plus the free center. Deterministic: the same selection always
/// yields the same card.
pub fn generate_card(center_number: u16) -> Card {
    let mut cells = Vec::with_capacity(CARD_SIZE);

    for offset in -12i32..=12 {
        let mut value = center_number as i32 + offset;
        if value < NUMBER_MIN as i32 {
            value += NUMBER_MAX as i32;
        } else if value > NUMBER_MAX as i32 {
            value -= NUMBER_MAX as i32;
        }
        cells.push(value as u16);
    }

    cells[FREE_INDEX] = FREE_SENTINEL;

    Card {
        center_number,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_card_shape() {
        let card = generate_card(100);

        assert_eq!(card.cells.len(), CARD_SIZE);
        assert_eq!(card.cells[FREE_INDEX], FREE_SENTINEL);
        assert!(card.is_complete());
    }

    #[test]
    fn test_playable_cells_distinct_and_in_range() {
        for center in [1, 12, 57, 100, 195, 200] {
            let card = generate_card(center);
            let playable: HashSet<u16> = card
                .cells
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != FREE_INDEX)
                .map(|(_, &n)| n)
                .collect();

            assert_eq!(playable.len(), CARD_SIZE - 1, "center {}", center);
            for &n in &playable {
                assert!((NUMBER_MIN..=NUMBER_MAX).contains(&n), "center {}", center);
            }
        }
    }

    #[test]
    fn test_low_center_wraps_high() {
        let card = generate_card(5);

        // Offset -12 from 5 lands at -7, which wraps to 193.
        assert_eq!(card.cells[0], 193);
        assert_eq!(card.cells[24], 17);
    }

    #[test]
    fn test_high_center_wraps_low() {
        let card = generate_card(195);

        assert_eq!(card.cells[0], 183);
        // Offset +12 from 195 lands at 207, which wraps to 7.
        assert_eq!(card.cells[24], 7);
    }

    #[test]
    fn test_deterministic_for_same_center() {
        assert_eq!(generate_card(42), generate_card(42));
    }
}
