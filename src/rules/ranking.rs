//! Standings ranking.
//!
//! Entries are ordered by total points and ranked with shared ranks for
//! ties. The entry after a tied group continues from its 1-based position in
//! the sorted list, not from the previous rank plus one: `[50, 50, 40]`
//! ranks as `1, 1, 3`. The historical standings pages show exactly these
//! numbers, so the pattern is load-bearing and pinned down by tests.

/// One row of the standings table, recomputed on every read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StandingsRow {
    pub entry_id: i64,
    pub entry_name: String,
    pub rank: u32,
    pub current_points: i32,
    pub correct_picks: u32,
    pub remaining_points: i32,
    pub possible_points: i32,
    pub is_paid: bool,
}

/// Sort descending by points and assign ranks in place.
///
/// Re-ranking an already ranked list is a no-op: the sort is stable and the
/// ranks only depend on the point totals.
pub fn rank_entries(rows: &mut [StandingsRow]) {
    rows.sort_by(|a, b| b.current_points.cmp(&a.current_points));

    let mut rank = 1;
    let mut position = 1;
    let mut last_points: Option<i32> = None;

    for row in rows.iter_mut() {
        if last_points != Some(row.current_points) {
            rank = position;
        }
        row.rank = rank;
        last_points = Some(row.current_points);
        position += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entry_id: i64, current_points: i32) -> StandingsRow {
        StandingsRow {
            entry_id,
            entry_name: format!("entry-{}", entry_id),
            rank: 0,
            current_points,
            correct_picks: 0,
            remaining_points: 0,
            possible_points: current_points,
            is_paid: false,
        }
    }

    fn ranks(rows: &[StandingsRow]) -> Vec<u32> {
        rows.iter().map(|r| r.rank).collect()
    }

    #[test]
    fn ties_share_a_rank_and_consume_positions() {
        let mut rows: Vec<StandingsRow> = [50, 50, 40, 40, 40, 10]
            .iter()
            .enumerate()
            .map(|(i, points)| row(i as i64, *points))
            .collect();

        rank_entries(&mut rows);

        assert_eq!(ranks(&rows), vec![1, 1, 3, 3, 3, 6]);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let mut rows = vec![row(1, 10), row(2, 50), row(3, 40)];

        rank_entries(&mut rows);

        assert_eq!(
            rows.iter().map(|r| r.entry_id).collect::<Vec<i64>>(),
            vec![2, 3, 1]
        );
        assert_eq!(ranks(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn reranking_is_idempotent() {
        let mut rows = vec![row(1, 50), row(2, 50), row(3, 40), row(4, 40), row(5, 12)];

        rank_entries(&mut rows);
        let first_pass = rows.clone();
        rank_entries(&mut rows);

        assert_eq!(rows, first_pass);
    }

    #[test]
    fn equal_points_always_means_equal_rank() {
        let mut rows = vec![row(1, 33), row(2, 12), row(3, 33), row(4, 33)];

        rank_entries(&mut rows);

        let tied: Vec<u32> = rows
            .iter()
            .filter(|r| r.current_points == 33)
            .map(|r| r.rank)
            .collect();

        assert_eq!(tied, vec![1, 1, 1]);
        assert_eq!(rows[3].rank, 4);
    }

    #[test]
    fn negative_totals_rank_last() {
        // a slate full of wrong bonus picks can go below zero
        let mut rows = vec![row(1, -8), row(2, 0), row(3, 4)];

        rank_entries(&mut rows);

        assert_eq!(
            rows.iter().map(|r| r.entry_id).collect::<Vec<i64>>(),
            vec![3, 2, 1]
        );
        assert_eq!(ranks(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn negative_leader_still_gets_rank_one() {
        let mut rows = vec![row(1, -1), row(2, -5)];

        rank_entries(&mut rows);

        assert_eq!(ranks(&rows), vec![1, 2]);
    }

    #[test]
    fn empty_standings_are_fine() {
        let mut rows: Vec<StandingsRow> = Vec::new();

        rank_entries(&mut rows);

        assert!(rows.is_empty());
    }
}
