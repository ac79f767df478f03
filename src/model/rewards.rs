//! Eco-points milestones.
//!
//! Badges are display-only; nothing here redeems or fulfils rewards.

use serde::Serialize;

/// A points threshold that unlocks a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    /// Points needed.
    pub points: i64,
    /// Badge name.
    pub reward: &'static str,
}

/// Milestones in ascending order.
pub const MILESTONES: [Milestone; 5] = [
    Milestone {
        points: 100,
        reward: "Bronze Badge",
    },
    Milestone {
        points: 500,
        reward: "Silver Badge",
    },
    Milestone {
        points: 1000,
        reward: "Gold Badge",
    },
    Milestone {
        points: 2000,
        reward: "Platinum Badge",
    },
    Milestone {
        points: 5000,
        reward: "Diamond Badge",
    },
];

/// Where a points balance sits on the milestone ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneProgress {
    /// Milestones already reached.
    pub achieved: Vec<Milestone>,
    /// The next milestone, or `None` once every badge is earned.
    pub next: Option<Milestone>,
    /// Points still missing for `next` (0 when `next` is `None`).
    pub points_to_go: i64,
}

impl MilestoneProgress {
    /// Computes progress for a balance.
    #[must_use]
    pub fn for_points(points: i64) -> Self {
        let achieved: Vec<Milestone> = MILESTONES
            .iter()
            .copied()
            .filter(|m| points >= m.points)
            .collect();
        let next = MILESTONES.iter().copied().find(|m| points < m.points);
        let points_to_go = next.map_or(0, |m| m.points - points);
        Self {
            achieved,
            next,
            points_to_go,
        }
    }

    /// Whether a reward costing `cost` points is affordable.
    #[must_use]
    pub const fn can_redeem(balance: i64, cost: i64) -> bool {
        balance >= cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_user_heads_for_bronze() {
        let p = MilestoneProgress::for_points(0);
        assert!(p.achieved.is_empty());
        assert_eq!(p.next.map(|m| m.reward), Some("Bronze Badge"));
        assert_eq!(p.points_to_go, 100);
    }

    #[test]
    fn exact_threshold_counts_as_achieved() {
        let p = MilestoneProgress::for_points(1000);
        assert_eq!(p.achieved.len(), 3);
        assert_eq!(p.next.map(|m| m.points), Some(2000));
        assert_eq!(p.points_to_go, 1000);
    }

    #[test]
    fn all_badges_earned() {
        let p = MilestoneProgress::for_points(7500);
        assert_eq!(p.achieved.len(), MILESTONES.len());
        assert_eq!(p.next, None);
        assert_eq!(p.points_to_go, 0);
    }

    #[test]
    fn redeem_needs_enough_points() {
        assert!(MilestoneProgress::can_redeem(500, 500));
        assert!(!MilestoneProgress::can_redeem(499, 500));
    }
}
