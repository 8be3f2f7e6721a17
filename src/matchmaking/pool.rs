use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{MmrError, Result},
    model::structures::player::{Player, PlayerId}
};

/// Players waiting for a match, in the order they joined.
///
/// Every operation takes the lock for its own duration only. Searches run on a
/// [`MatchmakingPool::snapshot`], so they never hold the lock.
#[derive(Debug, Default)]
pub struct MatchmakingPool {
    players: Mutex<IndexMap<PlayerId, Player>>
}

impl MatchmakingPool {
    pub fn new() -> MatchmakingPool {
        MatchmakingPool::default()
    }

    /// A panic inside another holder cannot leave the map half-updated, so a
    /// poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, IndexMap<PlayerId, Player>> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, player: Player) -> Result<()> {
        let mut players = self.lock();
        if players.contains_key(&player.id) {
            return Err(MmrError::DuplicateEntry(player.id));
        }

        debug!(player_id = player.id, rating = player.rating, "Player queued");
        players.insert(player.id, player);
        Ok(())
    }

    pub fn remove(&self, player_id: PlayerId) -> Result<Player> {
        let removed = self.lock().shift_remove(&player_id);
        match removed {
            Some(player) => {
                debug!(player_id, "Player left the queue");
                Ok(player)
            }
            None => Err(MmrError::NotFound(player_id))
        }
    }

    /// Point-in-time copy of the queue, in join order.
    pub fn snapshot(&self) -> Vec<Player> {
        self.lock().values().cloned().collect()
    }

    /// Removes every listed player or none of them. Fails with the first id
    /// that is no longer queued.
    pub fn claim(&self, player_ids: &[PlayerId]) -> Result<Vec<Player>> {
        let mut players = self.lock();
        if let Some(missing) = player_ids.iter().find(|id| !players.contains_key(*id)) {
            return Err(MmrError::NotFound(*missing));
        }

        Ok(player_ids
            .iter()
            .filter_map(|id| players.shift_remove(id))
            .collect())
    }

    /// Replaces a queued player's record, keeping its queue position. Returns
    /// false when the player is not queued.
    pub fn refresh(&self, player: &Player) -> bool {
        match self.lock().get_mut(&player.id) {
            Some(queued) => {
                *queued = player.clone();
                true
            }
            None => false
        }
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.lock().contains_key(&player_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
