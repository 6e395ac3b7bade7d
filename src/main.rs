//! Brick Breaker headless runner
//!
//! Plays the game with a simple autopilot at a fixed 60 Hz and logs what
//! happens. Useful for soak testing balance changes without a window.
//!
//! Usage: `brick-breaker [SEED] [--frames N] [--tuning PATH] [--levels PATH]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brick_breaker::renderer::{DrawSurface, SpriteKey};
    use brick_breaker::sim::{FrameTime, GameEvent, GamePhase, GameState, Rect, TickInput, tick};
    use brick_breaker::{LevelSet, Tuning};
    use clap::Parser;
    use std::path::PathBuf;

    const DEFAULT_FRAMES: u64 = 60 * 60 * 5;

    /// Command-line options
    #[derive(Parser, Debug)]
    #[command(
        author,
        version,
        about = "Play brick breaker headless with an autopilot",
        long_about = None
    )]
    pub struct Options {
        /// Run seed
        #[arg(default_value_t = 42)]
        pub seed: u64,
        /// Stop after this many 60 Hz frames
        #[arg(long, default_value_t = DEFAULT_FRAMES)]
        pub frames: u64,
        /// Balance overrides (JSON)
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// Custom level set (JSON)
        #[arg(long)]
        pub levels: Option<PathBuf>,
    }

    /// Counts draw calls instead of rendering them
    #[derive(Debug, Default)]
    struct CountingSurface {
        sprites: usize,
        bricks: usize,
    }

    impl DrawSurface for CountingSurface {
        fn draw(&mut self, sprite: SpriteKey, _rect: Rect, _alpha: f32) {
            self.sprites += 1;
            if matches!(sprite, SpriteKey::Brick { .. }) {
                self.bricks += 1;
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        frame: u64,
        bricks_destroyed: u64,
        lives_lost: u64,
        powerups_collected: u64,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, levels: LevelSet) -> Self {
            Self {
                state: GameState::with_config(seed, tuning, levels),
                frame: 0,
                bricks_destroyed: 0,
                lives_lost: 0,
                powerups_collected: 0,
            }
        }

        /// Follow the ball and keep pressing every button
        fn autopilot(&self) -> TickInput {
            let phase = self.state.phase;
            TickInput {
                pointer_x: Some(self.state.ball.pos.x),
                launch: phase != GamePhase::GameOver && phase != GamePhase::Win,
                fire_held: true,
                pause: false,
                restart: false,
                advance: phase == GamePhase::LevelComplete,
            }
        }

        fn step(&mut self) {
            let input = self.autopilot();
            tick(&mut self.state, &input, FrameTime::at_frame(self.frame));
            self.frame += 1;

            for event in self.state.drain_events() {
                match event {
                    GameEvent::BrickDestroyed { points, combo } => {
                        self.bricks_destroyed += 1;
                        log::trace!("Brick destroyed: +{} (combo {})", points, combo);
                    }
                    GameEvent::LifeLost => {
                        self.lives_lost += 1;
                        log::info!("Life lost, {} left", self.state.lives);
                    }
                    GameEvent::PowerUpCollected(kind) => {
                        self.powerups_collected += 1;
                        log::info!("Collected {}", kind.label());
                    }
                    GameEvent::LevelComplete => {
                        log::info!(
                            "Cleared level {} at frame {}",
                            self.state.level_number(),
                            self.frame
                        );
                    }
                    _ => {}
                }
            }
        }

        fn is_finished(&self) -> bool {
            matches!(self.state.phase, GamePhase::GameOver | GamePhase::Win)
        }
    }

    pub fn run(opts: Options) {
        let seed = opts.seed;
        let frames = opts.frames;
        let tuning = opts.tuning.map(Tuning::load).unwrap_or_default();
        let levels = opts.levels.map(LevelSet::load).unwrap_or_default();

        log::info!("Brick Breaker (headless) starting with seed {}", seed);
        let mut game = Game::new(seed, tuning, levels);

        while game.frame < frames && !game.is_finished() {
            game.step();
        }

        let mut surface = CountingSurface::default();
        game.state.draw(&mut surface);

        let hud = game.state.hud();
        println!("Seed:        {}", seed);
        println!("Frames:      {}", game.frame);
        println!("Phase:       {:?}", hud.phase);
        println!("Level:       {}/{}", hud.level, hud.level_count);
        println!("Score:       {}", hud.score);
        println!("Lives:       {}", hud.lives);
        println!("Destroyed:   {}", game.bricks_destroyed);
        println!("Lives lost:  {}", game.lives_lost);
        println!("Power-ups:   {}", game.powerups_collected);
        println!("Sprites:     {} ({} bricks left)", surface.sprites, surface.bricks);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Options::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the simulation through the library
}
