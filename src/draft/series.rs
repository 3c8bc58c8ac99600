use std::collections::HashSet;
use uuid::Uuid;

/// Links the rooms of a fearless series. Champions picked in any
/// prior game of the series become ineligible for ban or pick in later
/// games.
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub id: Uuid,
    pub room_ids: Vec<Uuid>,
    pub fearless_bans: HashSet<String>,
}

impl Series {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            room_ids: Vec::new(),
            fearless_bans: HashSet::new(),
        }
    }

    /// Records a completed room's picks into the fearless ban set and
    /// appends it to the series. Bans don't carry over, only picks.
    pub fn record_completed_room(&mut self, room_id: Uuid, all_picks: impl IntoIterator<Item = String>) {
        self.room_ids.push(room_id);
        self.fearless_bans.extend(all_picks);
    }
}
