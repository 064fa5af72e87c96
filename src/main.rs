use anyhow::Result;
use clap::Parser;
use tracing::info;

use typefall::cli::Cli;
use typefall::core::runner::Runner;
use typefall::games::typefall::TypefallGame;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing()?;

    // Validate everything before the terminal switches to raw mode
    let settings = cli.settings()?;
    info!(words = settings.vocabulary.len(), mode = ?settings.start_mode, "starting");

    let mut terminal = ratatui::init();
    let result = Runner::new(TypefallGame::new(settings)).run(&mut terminal).await;
    ratatui::restore();
    let game = result?;

    if let (Some(format), Some(summary)) = (cli.summary, game.last_summary()) {
        println!("{}", format.render(summary)?);
    }
    Ok(())
}
