use std::collections::{HashMap, VecDeque};

use game_types::{letter_for, HotNumber, NUMBER_MAX, NUMBER_MIN};

/// Draws kept in the rolling window that feeds hot/cold rankings.
pub const RECENT_WINDOW: usize = 1000;

/// Draw-frequency bookkeeping across sessions. Lifetime counts feed
/// persistence; the bounded recent window feeds the hot/cold rankings so
/// they track current streaks rather than all time.
#[derive(Debug, Default)]
pub struct DrawStats {
    frequency: HashMap<u16, u32>,
    total_draws: u64,
    recent: VecDeque<u16>,
}

impl DrawStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_draw(&mut self, number: u16) {
        *self.frequency.entry(number).or_insert(0) += 1;
        self.total_draws += 1;
        self.recent.push_back(number);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.pop_front();
        }
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    pub fn count_for(&self, number: u16) -> u32 {
        self.frequency.get(&number).copied().unwrap_or(0)
    }

    /// Merges persisted lifetime counts in on startup. The recent window
    /// stays empty; rankings rebuild as draws happen.
    pub fn apply_persisted(&mut self, counts: impl IntoIterator<Item = (u16, u32)>) {
        for (number, count) in counts {
            *self.frequency.entry(number).or_insert(0) += count;
            self.total_draws += count as u64;
        }
    }

    /// Lifetime counts for persistence, only numbers that have been drawn.
    pub fn frequency_rows(&self) -> Vec<(u16, u32)> {
        let mut rows: Vec<(u16, u32)> = self.frequency.iter().map(|(&n, &c)| (n, c)).collect();
        rows.sort_unstable_by_key(|&(n, _)| n);
        rows
    }

    /// Most-drawn numbers over the recent window, ties broken by number.
    pub fn hot_numbers(&self, limit: usize) -> Vec<HotNumber> {
        let mut window: HashMap<u16, u32> = HashMap::new();
        for &number in &self.recent {
            *window.entry(number).or_insert(0) += 1;
        }

        let total = self.recent.len().max(1) as f64;
        let mut ranked: Vec<HotNumber> = window
            .into_iter()
            .map(|(number, count)| HotNumber {
                number,
                count,
                frequency: count as f64 / total,
            })
            .collect();
        ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
        ranked.truncate(limit);
        ranked
    }

    /// Numbers drawn least (or never) over the recent window.
    pub fn cold_numbers(&self, limit: usize) -> Vec<u16> {
        let mut window: HashMap<u16, u32> = HashMap::new();
        for &number in &self.recent {
            *window.entry(number).or_insert(0) += 1;
        }

        let mut ranked: Vec<(u16, u32)> = (NUMBER_MIN..=NUMBER_MAX)
            .map(|n| (n, window.get(&n).copied().unwrap_or(0)))
            .collect();
        ranked.sort_unstable_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(limit).map(|(n, _)| n).collect()
    }

    /// Lifetime draw counts grouped by column letter, in B-I-N-G-O order.
    pub fn column_counts(&self) -> Vec<(char, u32)> {
        let mut columns: Vec<(char, u32)> = ['B', 'I', 'N', 'G', 'O']
            .into_iter()
            .map(|letter| (letter, 0))
            .collect();
        for (&number, &count) in &self.frequency {
            let letter = letter_for(number);
            if let Some(slot) = columns.iter_mut().find(|(l, _)| *l == letter) {
                slot.1 += count;
            }
        }
        columns
    }
}
