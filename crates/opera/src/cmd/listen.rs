use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use opera_transport::{MessageReceiver, TransportError};
use tracing::warn;

use crate::cmd::ListenArgs;
use crate::exit::{transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let mut receiver =
        MessageReceiver::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let message = match receiver.recv() {
            Ok(message) => message,
            // A sender that hung up mid-message or spoke garbage only
            // poisons its own connection. Keep listening.
            Err(TransportError::Decode(err)) => {
                warn!(%err, "discarding undecodable message");
                continue;
            }
            Err(err) => return Err(transport_error("receive failed", err)),
        };

        if let Some(tags) = &args.tags {
            if !tags.iter().any(|t| t == message.tag()) {
                continue;
            }
        }

        print_message(&message, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
