//! Walks the sample catalog through a few selection changes and prints the
//! published envelopes.
//!
//! Run with `RUST_LOG=chartwise_core=debug` to see selection and frame events.

use std::sync::Arc;

use chartwise_core::sample::sample_catalog;
use chartwise_core::{CoreError, Symbol, Theme, Timeframe, ViewMode, ViewStateController};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog = Arc::new(sample_catalog()?);
    let mut controller = ViewStateController::with_defaults(catalog)?;

    print_frame(&controller)?;

    controller.select_instrument(&Symbol::parse("TSLA")?)?;
    controller.select_view_mode(ViewMode::Volume);
    print_frame(&controller)?;

    controller.select_timeframe(Timeframe::OneWeek);
    if let Err(err) = controller.select_instrument(&Symbol::parse("NFLX")?) {
        println!("rejected: {err} (epoch still {})", controller.state().epoch);
    }

    let overview = controller.overview();
    for snapshot in &overview.data {
        println!(
            "{:<6} {:>7.2}% {:<16} {}",
            snapshot.symbol,
            snapshot.net_change_percent,
            snapshot.momentum.as_str(),
            snapshot.relative.standing.as_str()
        );
    }

    println!("{}", controller.publish()?.to_json_pretty()?);
    Ok(())
}

fn print_frame(controller: &ViewStateController) -> Result<(), CoreError> {
    let frame = controller.frame()?;
    println!(
        "[epoch {}] {} {} {}",
        frame.state.epoch, frame.state.symbol, frame.state.timeframe, frame.state.view_mode
    );
    for theme in [Theme::MarketStory, Theme::PriceTrend, Theme::Risk] {
        if let Some(sentence) = frame.narrative.sentence(theme) {
            println!("  {:<14} {}", sentence.label, sentence.text);
        }
    }
    for signal in &frame.narrative.signals {
        println!("  - {signal}");
    }
    Ok(())
}
