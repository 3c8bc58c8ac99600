//! Scenario-level coverage spanning lobby coordination and the draft room
//! actor together, the way a single client session would exercise them.

use draftcore::prelude::*;
use std::sync::Arc;
use std::time::Duration;

struct NoopSpawner;

#[async_trait]
impl RoomSpawner for NoopSpawner {
    async fn spawn_room(&self, _seed: RoomSeed) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }
}

fn coordinator() -> LobbyCoordinator {
    let lobby_repo: Arc<dyn LobbyRepository> = Arc::new(InMemoryLobbyRepository::new());
    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    LobbyCoordinator::new(lobby_repo, profiles, Arc::new(NoopSpawner))
}

async fn fill_and_ready(coordinator: &LobbyCoordinator, lobby_id: Uuid, creator: Uuid) -> Vec<Uuid> {
    let mut roster = vec![creator];
    for _ in 0..9 {
        let lobby = coordinator.join(lobby_id, Uuid::new_v4()).await.unwrap();
        roster = lobby.players.iter().map(|p| p.user_id).collect();
    }
    for user_id in &roster {
        coordinator.set_ready(lobby_id, *user_id, true).await.unwrap();
    }
    roster
}

fn champion_catalog() -> Arc<dyn ChampionCatalog> {
    Arc::new(InMemoryChampionCatalog::new(
        (0..40).map(|i| format!("champion-{i:02}")).collect(),
    ))
}

#[tokio::test]
async fn full_happy_path_lobby_to_team_selected() {
    let coordinator = coordinator();
    let creator = Uuid::new_v4();
    let lobby = coordinator
        .create(creator, DraftMode::Standard, VotingConfig::default())
        .await
        .unwrap();
    fill_and_ready(&coordinator, lobby.id, creator).await;

    let lobby = coordinator.generate_teams(lobby.id, creator, 7).await.unwrap();
    assert_eq!(lobby.status, LobbyStatus::Matchmaking);
    let top_option = lobby.match_options[0].option_number;

    let blue_captain = lobby.captain_of(Team::Blue).unwrap().user_id;
    let red_captain = lobby.captain_of(Team::Red).unwrap().user_id;
    coordinator
        .propose_select_option(lobby.id, blue_captain, top_option)
        .await
        .unwrap();
    let lobby = coordinator
        .approve_pending(lobby.id, red_captain)
        .await
        .unwrap();

    assert_eq!(lobby.status, LobbyStatus::TeamSelected);
    assert_eq!(lobby.selected_option_number, Some(top_option));
}

#[tokio::test]
async fn swap_players_requires_both_captains_and_preserves_roster_size() {
    let coordinator = coordinator();
    let creator = Uuid::new_v4();
    let lobby = coordinator
        .create(creator, DraftMode::Standard, VotingConfig::default())
        .await
        .unwrap();
    fill_and_ready(&coordinator, lobby.id, creator).await;
    let lobby = coordinator.generate_teams(lobby.id, creator, 11).await.unwrap();
    let top_option = lobby.match_options[0].option_number;
    let blue_captain = lobby.captain_of(Team::Blue).unwrap().user_id;
    let red_captain = lobby.captain_of(Team::Red).unwrap().user_id;
    coordinator
        .propose_select_option(lobby.id, blue_captain, top_option)
        .await
        .unwrap();
    let lobby = coordinator.approve_pending(lobby.id, red_captain).await.unwrap();

    let blue_member = lobby
        .players
        .iter()
        .find(|p| p.team == Some(Team::Blue) && p.user_id != blue_captain)
        .unwrap()
        .user_id;
    let red_member = lobby
        .players
        .iter()
        .find(|p| p.team == Some(Team::Red) && p.user_id != red_captain)
        .unwrap()
        .user_id;

    coordinator
        .propose_swap_players(lobby.id, blue_captain, blue_member, red_member)
        .await
        .unwrap();
    let lobby = coordinator.approve_pending(lobby.id, red_captain).await.unwrap();

    assert_eq!(lobby.team_count(Team::Blue), 5);
    assert_eq!(lobby.team_count(Team::Red), 5);
    let swapped = lobby.find_player(blue_member).unwrap();
    assert_eq!(swapped.team, Some(Team::Red));
}

#[tokio::test]
async fn kicked_player_leaves_roster_and_frees_a_slot() {
    let coordinator = coordinator();
    let creator = Uuid::new_v4();
    let lobby = coordinator
        .create(creator, DraftMode::Standard, VotingConfig::default())
        .await
        .unwrap();
    let target = Uuid::new_v4();
    coordinator.join(lobby.id, target).await.unwrap();

    let lobby = coordinator.kick_player(lobby.id, creator, target).await.unwrap();
    assert!(lobby.find_player(target).is_none());
    assert_eq!(lobby.players.len(), 1);
}

#[tokio::test]
async fn majority_voting_finalizes_once_threshold_is_met() {
    let coordinator = coordinator();
    let creator = Uuid::new_v4();
    let voting = VotingConfig {
        enabled: true,
        mode: VotingMode::Majority,
    };
    let lobby = coordinator.create(creator, DraftMode::Standard, voting).await.unwrap();
    let roster = fill_and_ready(&coordinator, lobby.id, creator).await;
    let lobby = coordinator.generate_teams(lobby.id, creator, 3).await.unwrap();
    let winning_option = lobby.match_options[0].option_number;

    coordinator.open_voting(lobby.id, creator).await.unwrap();
    for user_id in &roster {
        coordinator
            .cast_vote(lobby.id, *user_id, winning_option)
            .await
            .unwrap();
    }

    let tally = coordinator.voting_status(lobby.id).await.unwrap();
    assert!(tally.can_finalize);
    assert_eq!(tally.winning_option, Some(winning_option));

    let lobby = coordinator.end_voting(lobby.id, creator, None).await.unwrap();
    assert_eq!(lobby.status, LobbyStatus::TeamSelected);
    assert_eq!(lobby.selected_option_number, Some(winning_option));
}

fn spawn_ready_room() -> (RoomHandle, Uuid, Uuid) {
    let blue_captain = Uuid::new_v4();
    let red_captain = Uuid::new_v4();
    let state = DraftState::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        None,
        DraftMode::Standard,
        blue_captain,
        red_captain,
        30,
        Default::default(),
    );
    let draft_repo: Arc<dyn DraftRepository> = Arc::new(InMemoryDraftRepository::new());
    let handle = RoomActor::spawn(state, champion_catalog(), draft_repo);
    (handle, blue_captain, red_captain)
}

#[tokio::test]
async fn pause_then_resume_restores_the_frozen_timer() {
    let (handle, blue_captain, red_captain) = spawn_ready_room();
    handle.set_ready(blue_captain, true).await.unwrap();
    handle.set_ready(red_captain, true).await.unwrap();
    handle.start_draft(blue_captain).await.unwrap();

    handle.pause_draft(blue_captain).await.unwrap();
    let paused = handle.snapshot().await.unwrap();
    assert_eq!(paused.status, draftcore::draft::RoomStatus::Paused);

    handle.resume_ready(blue_captain, true).await.unwrap();
    handle.resume_ready(red_captain, true).await.unwrap();

    // The resume countdown runs off the actor's own 1s ticker; give it a
    // moment to fire without pinning an exact tick count.
    tokio::time::sleep(Duration::from_secs(6)).await;

    let resumed = handle.snapshot().await.unwrap();
    assert_eq!(resumed.status, draftcore::draft::RoomStatus::InProgress);
}

#[tokio::test]
async fn edit_proposal_while_paused_can_be_accepted() {
    let (handle, blue_captain, red_captain) = spawn_ready_room();
    handle.set_ready(blue_captain, true).await.unwrap();
    handle.set_ready(red_captain, true).await.unwrap();
    handle.start_draft(blue_captain).await.unwrap();

    handle.select_champion(blue_captain, "champion-00".into()).await.unwrap();
    handle.lock_in(blue_captain).await.unwrap();

    handle.pause_draft(blue_captain).await.unwrap();
    handle
        .propose_edit(
            blue_captain,
            draftcore::draft::PhaseKind::Ban,
            Team::Blue,
            0,
            "champion-01".into(),
        )
        .await
        .unwrap();
    handle.respond_edit(red_captain, true).await.unwrap();

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.blue_bans[0], "champion-01");
}

#[tokio::test]
async fn edit_proposal_rejected_by_the_other_captain_leaves_state_unchanged() {
    let (handle, blue_captain, red_captain) = spawn_ready_room();
    handle.set_ready(blue_captain, true).await.unwrap();
    handle.set_ready(red_captain, true).await.unwrap();
    handle.start_draft(blue_captain).await.unwrap();

    handle.select_champion(blue_captain, "champion-00".into()).await.unwrap();
    handle.lock_in(blue_captain).await.unwrap();

    handle.pause_draft(blue_captain).await.unwrap();
    handle
        .propose_edit(
            blue_captain,
            draftcore::draft::PhaseKind::Ban,
            Team::Blue,
            0,
            "champion-01".into(),
        )
        .await
        .unwrap();
    handle.respond_edit(red_captain, false).await.unwrap();

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.blue_bans[0], "champion-00");
    assert!(state.pending_edit.is_none());
}
