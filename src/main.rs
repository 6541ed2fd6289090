use anyhow::Result;

use rag_chat::app::App;
use rag_chat::config::Config;
use rag_chat::tui::{self, EventHandler};
use rag_chat::{handler, logging, ui, QueryClient};

#[tokio::main]
async fn main() -> Result<()> {
    // A broken config file shouldn't keep the client from starting
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_path = Config::config_dir().ok().map(|dir| dir.join("rag-chat.log"));
    logging::init(config.log_filter(), log_path.as_deref());
    if let Some(e) = config_error {
        tracing::warn!(error = %format!("{e:#}"), "failed to load config, using defaults");
    }

    let backend_url = config.backend_url();
    tracing::info!(%backend_url, "starting rag-chat");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, QueryClient::new(&backend_url)).await;
    tui::restore()?;

    tracing::info!("exiting");
    result
}

async fn run(terminal: &mut tui::Tui, client: QueryClient) -> Result<()> {
    let mut events = EventHandler::new();
    let mut app = App::new(client, events.sender());

    while !app.should_quit {
        app.sync_view();
        terminal.draw(|frame| {
            let view = app.view.borrow();
            ui::render(frame, &view, &mut app.viewport, app.animation_frame)
        })?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
    }

    Ok(())
}
