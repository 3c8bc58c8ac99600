use super::types::{DraftPhase, PhaseKind, TOTAL_PHASES};
use crate::matchmaking::Team;

/// The standard-mode 20-phase script: ban x6 alternating
/// blue-red-blue-red-blue-red, pick x6 as blue-red-red-blue-blue-red,
/// ban x4 as red-blue-red-blue, pick x4 as red-blue-blue-red.
pub fn standard_script() -> Vec<DraftPhase> {
    use PhaseKind::*;
    use Team::*;

    let teams: [Team; TOTAL_PHASES] = [
        // ban x6
        Blue, Red, Blue, Red, Blue, Red,
        // pick x6
        Blue, Red, Red, Blue, Blue, Red,
        // ban x4
        Red, Blue, Red, Blue,
        // pick x4
        Red, Blue, Blue, Red,
    ];
    let kinds: [PhaseKind; TOTAL_PHASES] = [
        Ban, Ban, Ban, Ban, Ban, Ban,
        Pick, Pick, Pick, Pick, Pick, Pick,
        Ban, Ban, Ban, Ban,
        Pick, Pick, Pick, Pick,
    ];

    (0..TOTAL_PHASES)
        .map(|i| DraftPhase {
            index: i as u8,
            kind: kinds[i],
            team: teams[i],
        })
        .collect()
}
