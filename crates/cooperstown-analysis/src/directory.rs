use std::collections::HashMap;

use cooperstown_data::PlayerRecord;

/// Player table with lookup by identifier and free-text search.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: Vec<PlayerRecord>,
    by_id: HashMap<String, usize>,
}

impl PlayerDirectory {
    /// Builds the directory. If an identifier appears more than once, lookups
    /// by id return the first occurrence.
    #[must_use]
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(players.len());
        for (index, player) in players.iter().enumerate() {
            by_id.entry(player.player_id.clone()).or_insert(index);
        }
        Self { players, by_id }
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn find_by_id(&self, player_id: &str) -> Option<&PlayerRecord> {
        self.by_id.get(player_id).map(|&index| &self.players[index])
    }

    /// Returns players whose id or name contains `query`, ignoring case and
    /// surrounding whitespace, in table order.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&PlayerRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return vec![];
        }
        self.players
            .iter()
            .filter(|player| {
                player.player_id.to_lowercase().contains(&query)
                    || player.player_name.to_lowercase().contains(&query)
            })
            .collect()
    }
}
