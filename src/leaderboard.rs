//! Static top-10 board. There is no server; the player is ranked against it locally.

pub struct Entry {
    pub name: &'static str,
    pub score: u32,
    pub avatar: &'static str,
}

pub const TOP: [Entry; 10] = [
    Entry { name: "Rajesh Kumar", score: 2450, avatar: "🧔" },
    Entry { name: "Priya Sharma", score: 2380, avatar: "👩" },
    Entry { name: "Amit Singh", score: 2290, avatar: "🕺" },
    Entry { name: "Sneha Patel", score: 2150, avatar: "👻" },
    Entry { name: "Vikram Rao", score: 2050, avatar: "🥟" },
    Entry { name: "Anita Gupta", score: 1980, avatar: "👨‍🍳" },
    Entry { name: "Rohit Mehta", score: 1890, avatar: "🏏" },
    Entry { name: "Kavya Reddy", score: 1820, avatar: "👑" },
    Entry { name: "Suresh Jain", score: 1750, avatar: "🤪" },
    Entry { name: "Deepika Shah", score: 1680, avatar: "👩" },
];

/// 1-based rank the player's high score would take. Ties go below the board entry.
pub fn player_rank(high_score: u32) -> usize {
    TOP.iter()
        .position(|e| high_score > e.score)
        .map_or(TOP.len() + 1, |i| i + 1)
}
