//! Launch the full-screen board.

use anyhow::Result;

use crate::config::Config;
use crate::tui::app::App;
use crate::tui::event::EventHandler;

/// Event poll interval in milliseconds. Ticks at this rate also drive the
/// search debounce timer, so it must stay well under the debounce window.
const TICK_RATE_MS: u64 = 50;

pub async fn run(config: Config) -> Result<()> {
    let mut app = App::new(config)?;

    let mut terminal = crate::tui::init()?;
    let events = EventHandler::new(TICK_RATE_MS);
    let result = app.run(&mut terminal, events).await;
    crate::tui::restore()?;

    result
}
