//! End-to-end walk: ten players fill a lobby, a captain runs matchmaking,
//! both captains agree on an option, and the draft room plays out to
//! completion via direct actor calls (no socket layer involved).

use draftcore::prelude::*;
use std::sync::Arc;

struct NoopSpawner;

#[async_trait]
impl RoomSpawner for NoopSpawner {
    async fn spawn_room(&self, _seed: RoomSeed) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let lobby_repo: Arc<dyn LobbyRepository> = Arc::new(InMemoryLobbyRepository::new());
    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    let coordinator = LobbyCoordinator::new(lobby_repo, profiles, Arc::new(NoopSpawner));

    let creator = Uuid::new_v4();
    let lobby = coordinator
        .create(creator, DraftMode::Standard, VotingConfig::default())
        .await?;
    println!("created lobby {} with code {}", lobby.id, lobby.short_code);

    let mut roster = vec![creator];
    for _ in 0..9 {
        let joined = coordinator.join(lobby.id, Uuid::new_v4()).await?;
        roster = joined.players.iter().map(|p| p.user_id).collect();
    }
    for user_id in &roster {
        coordinator.set_ready(lobby.id, *user_id, true).await?;
    }

    let lobby = coordinator.generate_teams(lobby.id, creator, 42).await?;
    println!("generated {} match options", lobby.match_options.len());
    let top_option = lobby.match_options[0].option_number;

    let blue_captain = lobby.captain_of(Team::Blue).unwrap().user_id;
    let red_captain = lobby.captain_of(Team::Red).unwrap().user_id;
    coordinator
        .propose_select_option(lobby.id, blue_captain, top_option)
        .await?;
    let lobby = coordinator
        .approve_pending(lobby.id, red_captain)
        .await?;
    println!("teams locked in, status = {:?}", lobby.status);

    // Run the draft directly against the actor, standing in for the socket
    // layer the hub would otherwise drive.
    let catalog: Arc<dyn ChampionCatalog> = Arc::new(InMemoryChampionCatalog::new(
        (0..40).map(|i| format!("champion-{i:02}")).collect(),
    ));
    let draft_repo: Arc<dyn DraftRepository> = Arc::new(InMemoryDraftRepository::new());
    let room_id = Uuid::new_v4();
    let state = DraftState::new(
        room_id,
        lobby.id,
        None,
        lobby.draft_mode,
        blue_captain,
        red_captain,
        lobby.per_turn_timer_secs,
        Default::default(),
    );
    let handle = RoomActor::spawn(state, catalog.clone(), draft_repo);

    handle.set_ready(blue_captain, true).await?;
    handle.set_ready(red_captain, true).await?;
    handle.start_draft(blue_captain).await?;

    let champion_ids = catalog.all_champion_ids().await;
    let mut next = champion_ids.iter();
    for _ in 0..20 {
        let snapshot = handle.snapshot().await?;
        let Some(phase) = snapshot.current_phase() else {
            break;
        };
        let captain = snapshot.captain_for(phase.team);
        let champion_id = next.next().expect("enough champions for a full draft").clone();
        handle.select_champion(captain, champion_id).await?;
        handle.lock_in(captain).await?;
    }

    let final_state = handle.snapshot().await?;
    println!(
        "draft complete: blue picked {:?}, red picked {:?}",
        final_state.blue_picks, final_state.red_picks
    );

    Ok(())
}
