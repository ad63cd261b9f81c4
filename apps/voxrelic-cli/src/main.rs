use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voxrelic_camera::Camera;
use voxrelic_common::TileCoord;
use voxrelic_hud::HudStatus;
use voxrelic_math::Vec3;
use voxrelic_render::{Renderer, TextRenderer};
use voxrelic_world::World;

#[derive(Parser)]
#[command(name = "voxrelic-cli", about = "Headless tools for the voxrelic demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default world as an ASCII height map
    Map,
    /// Walk a camera over every relic and onto the portal, printing the
    /// toast timeline
    Walkthrough {
        /// Print the final HUD status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one frame through the text backend
    Frame,
}

fn tile_center(tile: TileCoord) -> Vec3 {
    Vec3::new(tile.x as f32 + 0.5, 1.5, tile.z as f32 + 0.5)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Map => {
            let world = World::new();
            let relics: Vec<TileCoord> = world.relics().iter().map(|r| r.tile).collect();
            for z in 0..world.size() {
                let mut line = String::new();
                for x in 0..world.size() {
                    let tile = TileCoord::new(x, z);
                    let c = if relics.contains(&tile) {
                        '*'
                    } else if tile == world.portal() {
                        'P'
                    } else {
                        match world.height(tile) {
                            0 => '.',
                            h => char::from_digit(h as u32, 10).unwrap_or('?'),
                        }
                    };
                    line.push(c);
                }
                println!("{line}");
            }
            println!(
                "\n{} blocks, {} relics, portal at ({}, {})",
                world.blocks().len(),
                world.relics_total(),
                world.portal().x,
                world.portal().z
            );
        }
        Commands::Walkthrough { json } => {
            let mut world = World::new();
            let mut camera = Camera::new(16.0 / 9.0);
            let stops: Vec<TileCoord> = world
                .relics()
                .iter()
                .map(|r| r.tile)
                .chain(std::iter::once(world.portal()))
                .collect();

            let mut now = 0.0f64;
            for stop in stops {
                now += 1.0;
                camera.eye = tile_center(stop);
                camera.update_view();
                world.update_game(camera.eye, now);
                let msg = world.get_message(now);
                println!(
                    "t={now:>4.1}s tile ({:>2}, {:>2})  {}",
                    stop.x,
                    stop.z,
                    if msg.is_empty() { "-" } else { msg.as_str() }
                );
            }

            let status = HudStatus::gather(&camera, &world, 60.0, now);
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("\n{status}");
                println!("won: {}", world.has_won());
            }
        }
        Commands::Frame => {
            let world = World::new();
            let mut camera = Camera::new(16.0 / 9.0);
            camera.update_view();
            let calls = world.draw_list(camera.eye, 0.0);
            let summary = TextRenderer::new().render(camera.view(), camera.proj(), &calls);
            print!("{summary}");
        }
    }

    Ok(())
}
