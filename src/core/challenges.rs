//! Challenges, badges and rank derived from the same snapshot as the
//! dashboard. Nothing here is stored; every value is recomputed per run.
use crate::core::aggregator::{completed_module_count, learning_progress_percent};
use crate::core::records::Snapshot;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

const POINTS_PER_MODULE: u32 = 100;
const POINTS_PER_RECORD: u32 = 50;
const MAX_STREAK: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cadence {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Difficulty::Easy => "Easy",
                Difficulty::Medium => "Medium",
                Difficulty::Hard => "Hard",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
    pub cadence: Cadence,
    pub title: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    pub points: u32,
    /// Capped at `total`.
    pub progress: usize,
    pub total: usize,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Rank {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl Rank {
    /// Tier for a learning progress percentage; each bound is exclusive.
    pub fn for_learning_progress(percent: i64) -> Rank {
        match percent {
            p if p > 75 => Rank::Elite,
            p if p > 50 => Rank::Advanced,
            p if p > 25 => Rank::Intermediate,
            _ => Rank::Beginner,
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Rank::Beginner => "Beginner entrepreneur",
                Rank::Intermediate => "Intermediate entrepreneur",
                Rank::Advanced => "Advanced entrepreneur",
                Rank::Elite => "Elite entrepreneur",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_points: u32,
    pub current_streak: usize,
    pub challenges_completed: usize,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeBoard {
    pub daily: Vec<Challenge>,
    pub weekly: Vec<Challenge>,
    pub badges: Vec<Badge>,
    pub stats: UserStats,
}

struct ChallengeRule {
    cadence: Cadence,
    title: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    points: u32,
    source: Source,
    total: usize,
}

#[derive(Clone, Copy)]
enum Source {
    Records,
    CompletedModules,
}

const CHALLENGES: [ChallengeRule; 4] = [
    ChallengeRule {
        cadence: Cadence::Daily,
        title: "Record this month's sales",
        category: "Finance",
        difficulty: Difficulty::Easy,
        points: 50,
        source: Source::Records,
        total: 3,
    },
    ChallengeRule {
        cadence: Cadence::Daily,
        title: "Complete a learning module",
        category: "Learning",
        difficulty: Difficulty::Medium,
        points: 100,
        source: Source::CompletedModules,
        total: 1,
    },
    ChallengeRule {
        cadence: Cadence::Weekly,
        title: "Complete 5 modules",
        category: "Learning",
        difficulty: Difficulty::Medium,
        points: 300,
        source: Source::CompletedModules,
        total: 5,
    },
    ChallengeRule {
        cadence: Cadence::Weekly,
        title: "Keep a sales log going",
        category: "Finance",
        difficulty: Difficulty::Hard,
        points: 500,
        source: Source::Records,
        total: 7,
    },
];

#[derive(Clone, Copy)]
enum Unlock {
    CompletedModules(usize),
    Records(usize),
    LearningProgress(i64),
}

const BADGES: [(&str, &str, Unlock); 6] = [
    ("First step", "Completed your first module", Unlock::CompletedModules(1)),
    ("First sale", "Recorded your first month", Unlock::Records(1)),
    ("Active entrepreneur", "Completed 3 modules", Unlock::CompletedModules(3)),
    ("Business master", "Completed 10 modules", Unlock::CompletedModules(10)),
    ("Sales pro", "Recorded 20 months", Unlock::Records(20)),
    ("Elite entrepreneur", "Reached 90% learning progress", Unlock::LearningProgress(90)),
];

/// Builds the challenge board for one snapshot.
pub fn challenge_board(snapshot: &Snapshot) -> ChallengeBoard {
    let records = snapshot.records().len();
    let completed = completed_module_count(snapshot.progress(), snapshot.modules());
    let learning = learning_progress_percent(snapshot.progress(), snapshot.modules());

    let (daily, weekly): (Vec<Challenge>, Vec<Challenge>) = CHALLENGES
        .iter()
        .map(|rule| {
            let count = match rule.source {
                Source::Records => records,
                Source::CompletedModules => completed,
            };
            Challenge {
                cadence: rule.cadence,
                title: rule.title,
                category: rule.category,
                difficulty: rule.difficulty,
                points: rule.points,
                progress: count.min(rule.total),
                total: rule.total,
                completed: count >= rule.total,
            }
        })
        .partition(|c| c.cadence == Cadence::Daily);

    let badges = BADGES
        .iter()
        .map(|&(name, description, unlock)| Badge {
            name,
            description,
            unlocked: match unlock {
                Unlock::CompletedModules(n) => completed >= n,
                Unlock::Records(n) => records >= n,
                Unlock::LearningProgress(p) => learning >= p,
            },
        })
        .collect();

    let stats = UserStats {
        total_points: completed as u32 * POINTS_PER_MODULE + records as u32 * POINTS_PER_RECORD,
        current_streak: records.min(MAX_STREAK),
        challenges_completed: completed + records,
        rank: Rank::for_learning_progress(learning),
    };
    debug!("Challenge stats: {stats:?}");

    ChallengeBoard {
        daily,
        weekly,
        badges,
        stats,
    }
}
