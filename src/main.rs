use dotenv::dotenv;
use log::debug;
use reqwest::blocking::Client;
use tg_send::cli::App;

fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // One client for the whole run, handed to whatever needs the network.
    let app = App::new(Client::new());
    debug!("Starting tg-send");

    app.run(std::env::args_os(), &mut std::io::stdout().lock())
}
