use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embring_frame::{FrameError, SerialBuffer};
use embring_transport::{TransportError, UnixDomainSocket};
use tracing::{info, warn};

use crate::cmd::pump::pump;
use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let poll_interval = parse_duration(&args.poll_interval)?;
    let config = args.buffer.config();
    config
        .validate()
        .map_err(|err| frame_error("invalid buffer config", err))?;

    let listener =
        UnixDomainSocket::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let source = args.path.display().to_string();
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let link = listener
            .accept()
            .map_err(|err| transport_error("accept failed", err))?;
        let mut buffer = SerialBuffer::with_config(link, config.clone())
            .map_err(|err| frame_error("buffer setup failed", err))?;

        while running.load(Ordering::SeqCst) {
            let result = pump(&mut buffer, |message| {
                printed = printed.saturating_add(1);
                print_message(&message, printed, &source, format);
            });

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }

            match result {
                Ok(0) => std::thread::sleep(poll_interval),
                Ok(_) => {}
                Err(FrameError::Transport(TransportError::Disconnected)) => {
                    info!(link = %source, "link closed");
                    break;
                }
                Err(err) if err.is_framing() => {
                    warn!(error = %err, "resynchronizing after framing error");
                    buffer.reset();
                }
                Err(err) => return Err(frame_error("receive failed", err)),
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
