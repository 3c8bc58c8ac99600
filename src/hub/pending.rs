//! Per-user aggregation query: "pending actions for me" — the union of
//! lobby proposals awaiting their approval and draft rooms where it is
//! currently their turn. Implemented as a pure function over repository/hub
//! reads so it's testable without a running socket.

use super::ConnectionHub;
use crate::error::Result;
use crate::lobby::{LobbyRepository, PendingAction};
use uuid::Uuid;

/// One lobby's pending proposal, alongside the lobby id it belongs to (a
/// [`PendingAction`] already carries `lobby_id`, but callers shouldn't have
/// to know that to use this type).
#[derive(Debug, Clone)]
pub struct AwaitingApproval {
    pub lobby_id: Uuid,
    pub action: PendingAction,
}

#[derive(Debug, Clone, Default)]
pub struct PendingForUser {
    /// Pending proposals where this user is a captain of the side that has
    /// not yet approved.
    pub lobby_approvals: Vec<AwaitingApproval>,
    /// Draft room ids where this user is the current-turn captain.
    pub draft_turns: Vec<Uuid>,
}

/// Scans every lobby's pending proposal for ones awaiting `user_id`'s
/// approval, and every room registered with `hub` for ones where it is
/// `user_id`'s turn.
pub async fn pending_for_user(
    lobby_repo: &dyn LobbyRepository,
    hub: &ConnectionHub,
    user_id: Uuid,
) -> Result<PendingForUser> {
    let lobbies = lobby_repo.all_lobbies().await?;
    let mut lobby_approvals = Vec::new();

    for lobby in lobbies {
        let Some(pending) = lobby_repo.load_pending_action(lobby.id).await? else {
            continue;
        };
        if pending.status != crate::lobby::ActionStatus::Pending {
            continue;
        }
        let Some(approver) = lobby.require_any_captain(user_id).ok() else {
            continue;
        };
        let already_approved = match approver {
            crate::matchmaking::Team::Blue => pending.approved_by_blue,
            crate::matchmaking::Team::Red => pending.approved_by_red,
        };
        if !already_approved {
            lobby_approvals.push(AwaitingApproval {
                lobby_id: lobby.id,
                action: pending,
            });
        }
    }

    let draft_turns = hub.rooms_awaiting_turn(user_id).await;

    Ok(PendingForUser {
        lobby_approvals,
        draft_turns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenValidator;
    use crate::catalog::InMemoryChampionCatalog;
    use crate::lobby::{ActionKind, DraftMode, InMemoryLobbyRepository, Lobby, VotingConfig};
    use crate::persistence::draft_store::InMemoryDraftRepository;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn hub() -> ConnectionHub {
        ConnectionHub::new(
            Arc::new(StaticTokenValidator::new(HashMap::new())),
            Arc::new(InMemoryChampionCatalog::new(vec!["ahri".into()])),
            Arc::new(InMemoryDraftRepository::new()),
        )
    }

    #[tokio::test]
    async fn surfaces_proposal_awaiting_the_other_captain() {
        let repo = InMemoryLobbyRepository::new();
        let creator = Uuid::new_v4();
        let mut lobby = Lobby::new(
            creator,
            "abc12345".into(),
            DraftMode::Standard,
            VotingConfig::default(),
        );
        let red_captain = Uuid::new_v4();
        let mut red = crate::lobby::LobbyPlayer::new(red_captain, 1);
        red.team = Some(crate::matchmaking::Team::Red);
        red.is_captain = true;
        lobby.players.push(red);
        repo.save_lobby(lobby.clone()).await.unwrap();

        let pa = PendingAction::propose(
            lobby.id,
            ActionKind::StartDraft,
            creator,
            crate::matchmaking::Team::Blue,
        );
        repo.save_pending_action(pa).await.unwrap();

        let hub = hub();
        let result = pending_for_user(&repo, &hub, red_captain).await.unwrap();
        assert_eq!(result.lobby_approvals.len(), 1);
        assert_eq!(result.lobby_approvals[0].lobby_id, lobby.id);

        // The proposer itself already approved, so nothing is pending for them.
        let proposer_result = pending_for_user(&repo, &hub, creator).await.unwrap();
        assert!(proposer_result.lobby_approvals.is_empty());
    }
}
