use terragen_core::{TilePos, TileType};
use terragen_game::{GameConfig, GameState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terragen=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GameConfig::from_env()?;
    let save_path = config.save_path.clone();

    let mut state = if save_path.exists() {
        GameState::load_from(&save_path, config)?
    } else {
        GameState::new(config)
    };
    state.tick();

    // Lever, three wires and a lamp in a row just below the player
    let start = state.player.tile_pos().offset(1, 1);
    let row = [
        TileType::Lever,
        TileType::Wire,
        TileType::Wire,
        TileType::Wire,
        TileType::Lamp,
    ];
    for (i, item) in row.into_iter().enumerate() {
        let pos = start.offset(i as i32, 0);
        state.grant(item, 1);
        state.player.select(Some(item));
        if let Err(err) = state.click(pos, false) {
            tracing::warn!(%pos, %item, %err, "could not place demo tile");
        }
    }
    state.player.select(None);

    let outcome = state.click(start, false)?;
    let lamp = start.offset(row.len() as i32 - 1, 0);
    let lit = state
        .grid
        .get_tile(lamp)
        .is_some_and(|t| t.tile_type == TileType::LampOn);
    tracing::info!(?outcome, %lamp, lit, "demo circuit toggled");

    report(&state, start);

    state.save_to(&save_path)?;
    Ok(())
}

fn report(state: &GameState, origin: TilePos) {
    let items: Vec<String> = state
        .inventory
        .iter()
        .map(|(item, count)| format!("{item}x{count}"))
        .collect();
    tracing::info!(
        seed = state.seed(),
        chunks = state.grid.chunk_count(),
        %origin,
        inventory = %items.join(", "),
        "session summary"
    );
}
