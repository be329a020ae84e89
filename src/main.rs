use conveyorjog::{init_logging, Config, JogConsole, JogSession, SessionManager, SystemPortDriver};

fn main() -> anyhow::Result<()> {
    let config = Config::load_or_default()?;

    // Initialize logging
    init_logging(&config.logging.level)?;
    tracing::info!(
        "ConveyorJog {} (built {})",
        conveyorjog::VERSION,
        conveyorjog::BUILD_DATE
    );

    let driver = SystemPortDriver::new(config.connection.usb_only);
    let session =
        SessionManager::new(Box::new(driver)).with_timeout_ms(config.connection.write_timeout_ms);
    let mut console = JogConsole::new(JogSession::new(session), &config);

    let stdin = std::io::stdin();
    console.run(stdin.lock(), std::io::stdout())?;

    Ok(())
}
