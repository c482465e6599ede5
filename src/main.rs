use isorts::config::GameConfig;
use isorts::engine::Engine;
use isorts::state::GameState;
use isorts::states::MainMenu;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let default_level = if args.iter().any(|a| a == "--debug") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match GameConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let result = Engine::builder(config)
        .run(|engine| MainMenu::new(engine).map(|menu| Box::new(menu) as Box<dyn GameState>));

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
