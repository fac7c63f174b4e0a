use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use funnel_core::{Msg, Step, TargetGender};
use funnel_engine::{
    FunnelController, HttpRecorder, MemoryRecorder, Recorder, RecorderHandle, RecorderSettings,
    SystemClock, TimerQueue,
};
use funnel_logging::funnel_info;

use crate::config::{load_config, LoadedConfig};
use crate::logging;
use crate::render::Renderer;

/// How long the loop waits for a keystroke before pumping timers.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Vec<Msg>),
    Quit,
    Ignored,
}

/// Maps one line of user input to funnel messages for the current step.
pub fn parse_command(line: &str, step: Step) -> Command {
    let input = line.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Command::Quit;
    }
    let lowered = input.to_ascii_lowercase();
    match step {
        Step::Initial => match lowered.as_str() {
            "1" | "m" | "male" => Command::Send(vec![Msg::TargetSelected(TargetGender::Male)]),
            "2" | "f" | "female" => Command::Send(vec![Msg::TargetSelected(TargetGender::Female)]),
            _ => Command::Ignored,
        },
        Step::Input => Command::Send(vec![
            Msg::PhoneInputChanged(input.to_string()),
            Msg::SubmitClicked,
        ]),
        Step::Processing => Command::Ignored,
        Step::Result => match lowered.as_str() {
            "" | "next" | "report" => Command::Send(vec![Msg::ViewReportClicked]),
            _ => Command::Ignored,
        },
        Step::LockedReport => match lowered.as_str() {
            "open" => Command::Send(vec![Msg::OfferClicked]),
            _ => Command::Ignored,
        },
    }
}

pub fn run_app(config_path: &Path) -> anyhow::Result<()> {
    let LoadedConfig { config, notes } = load_config(config_path)?;
    logging::initialize(config.log_destination);
    for note in notes {
        funnel_info!("{}", note);
    }

    let settings = config.to_settings()?;
    let recorder: Arc<dyn Recorder> = match config.recorder_url()? {
        Some(base_url) => {
            funnel_info!("Recording simulations to {}", base_url);
            Arc::new(HttpRecorder::new(RecorderSettings::new(base_url)))
        }
        None => Arc::new(MemoryRecorder::new()),
    };

    let mut controller = FunnelController::new(
        settings,
        TimerQueue::new(SystemClock::default()),
        RecorderHandle::new(recorder),
    );
    controller.init();

    let input_rx = spawn_stdin_reader();
    let mut renderer = Renderer::new();
    let mut stdout = io::stdout();
    print_lines(&mut stdout, renderer.render(&controller.view()))?;

    let mut input_open = true;
    loop {
        if input_open {
            match input_rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => match parse_command(&line, controller.state().step()) {
                    Command::Send(msgs) => msgs.into_iter().for_each(|msg| controller.handle(msg)),
                    Command::Quit => break,
                    Command::Ignored => {}
                },
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => input_open = false,
            }
        } else {
            thread::sleep(POLL_INTERVAL);
        }

        controller.pump();
        if controller.consume_dirty() {
            print_lines(&mut stdout, renderer.render(&controller.view()))?;
        }
        if let Some(offer) = controller.take_offer() {
            writeln!(stdout, "Continue at: {offer}")?;
            break;
        }
        // Without more input only a running phase can still move the funnel.
        if !input_open && controller.state().step() != Step::Processing {
            break;
        }
    }

    controller.dispose();
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_lines(out: &mut impl Write, lines: Vec<String>) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
