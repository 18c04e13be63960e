//! Interactive console front end.
//!
//! The presentation loop runs on the calling task and is the only code
//! that touches the [`ConsoleView`]. Actions run on worker tasks through
//! the execution bridge; their results come back through the bridge's
//! queue and are rendered here, so input stays responsive while a slow
//! lookup is in flight.

mod input;
mod view;

pub use input::{parse_line, Command, InputError};
pub use view::{ConsoleView, Status};

use anyhow::{Context, Result};
use gplay_dispatch::{bridge, ActionRouter, Outcome, RunId};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Run the console on stdin/stdout/stderr until `quit` or end of input.
pub async fn run(router: Arc<ActionRouter>) -> Result<()> {
    let mut view = ConsoleView::new(std::io::stdout(), std::io::stderr());
    view.banner()?;

    let input = BufReader::new(tokio::io::stdin());
    run_with(router, input, &mut view).await
}

/// Presentation loop over arbitrary input and output.
///
/// On end of input every run still in flight is delivered before
/// returning; `quit` returns immediately.
pub async fn run_with<R, O, E>(
    router: Arc<ActionRouter>,
    input: R,
    view: &mut ConsoleView<O, E>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let (bridge, mut queue) = bridge::channel::<ConsoleView<O, E>>(router, Handle::current());
    let mut lines = input.lines();

    view.prompt()?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };

                match parse_line(&line) {
                    Ok(Command::Run { action, request }) => {
                        let handle = bridge.start(action.clone(), request, deliver);
                        view.started(handle.id(), &action)?;
                    }
                    Ok(Command::Help) => view.help()?,
                    Ok(Command::Quit) => {
                        debug!(pending = bridge.pending(), "console quit");
                        return Ok(());
                    }
                    Ok(Command::Empty) => {}
                    Err(err) => view.input_error(&err.to_string())?,
                }
                view.prompt()?;
            }
            Some(delivery) = queue.next() => {
                delivery.deliver(view);
                view.prompt()?;
            }
        }
    }

    while bridge.pending() > 0 {
        if !queue.deliver_next(view).await {
            break;
        }
    }
    Ok(())
}

/// Result callback, run on the presentation loop.
fn deliver<O: Write, E: Write>(view: &mut ConsoleView<O, E>, id: RunId, outcome: Outcome) {
    if let Err(err) = view.finished(id, outcome) {
        warn!(run = %id, error = %err, "failed to render result");
    }
}
