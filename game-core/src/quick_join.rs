use std::collections::HashSet;

use game_types::{HotNumber, Pattern, NUMBER_MAX, NUMBER_MIN, WAGER_MAX, WAGER_MIN};

/// Share of the balance quick join stakes, before rounding and clamping.
const WAGER_SHARE_PERCENT: u32 = 15;

/// One-tap join parameters picked for the player.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickJoinPlan {
    pub number: u16,
    pub wager: u32,
    pub pattern: Pattern,
}

/// Picks a full quick-join plan, or `None` when every number is reserved.
pub fn plan(taken: &HashSet<u16>, hot: &[HotNumber], balance: u32) -> Option<QuickJoinPlan> {
    Some(QuickJoinPlan {
        number: choose_number(taken, hot)?,
        wager: optimal_wager(balance),
        pattern: Pattern::Line,
    })
}

/// Number heuristic: a free hot number first, then the first free number in
/// the least-crowded column, then any free number.
pub fn choose_number(taken: &HashSet<u16>, hot: &[HotNumber]) -> Option<u16> {
    if let Some(hot_pick) = hot.iter().find(|h| !taken.contains(&h.number)) {
        return Some(hot_pick.number);
    }

    let mut columns: Vec<(u16, u16, usize)> = (0u16..5)
        .map(|i| {
            let start = NUMBER_MIN + i * 40;
            let end = start + 39;
            let crowd = (start..=end).filter(|n| taken.contains(n)).count();
            (start, end, crowd)
        })
        .collect();
    columns.sort_by_key(|&(start, _, crowd)| (crowd, start));

    for (start, end, _) in columns {
        if let Some(free) = (start..=end).find(|n| !taken.contains(n)) {
            return Some(free);
        }
    }

    (NUMBER_MIN..=NUMBER_MAX).find(|n| !taken.contains(n))
}

/// Roughly 15% of the balance, rounded to the nearest ten and clamped to the
/// wager limits. May still exceed a tiny balance, in which case the join
/// itself rejects.
pub fn optimal_wager(balance: u32) -> u32 {
    let share = balance * WAGER_SHARE_PERCENT / 100;
    let rounded = (share + 5) / 10 * 10;
    rounded.clamp(WAGER_MIN, WAGER_MAX)
}
