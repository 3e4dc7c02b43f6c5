use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Args;
use cueclock_core::{
    AudioRegistry, Config, Event, LoggingSink, MemoryChannel, RunState, Session, TriggerInjector,
};

use super::format_clock;

#[derive(Args)]
pub struct RunArgs {
    /// Countdown length in minutes (defaults to run.default_minutes)
    #[arg(long)]
    minutes: Option<u32>,
    /// Cue to arm; repeat for more (defaults to cues.default_selection)
    #[arg(long = "cue")]
    cues: Vec<String>,
    /// Read external trigger messages from stdin, one per line
    #[arg(long)]
    stdin_triggers: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let minutes = args.minutes.unwrap_or(config.run.default_minutes);
    let selection: BTreeSet<String> = if args.cues.is_empty() {
        config.cues.default_selection.iter().cloned().collect()
    } else {
        args.cues.into_iter().collect()
    };

    let sink = Arc::new(LoggingSink::new(AudioRegistry::from_config(&config.sounds)));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut session = Session::new(sink);
        if args.stdin_triggers {
            let (channel, injector) = MemoryChannel::new();
            session.attach_channel(channel);
            spawn_stdin_reader(injector);
        }

        let started = session.start(selection, minutes.saturating_mul(60))?;
        if let Event::RunStarted {
            total_seconds,
            schedule,
            ..
        } = &started
        {
            println!("countdown started: {}", format_clock(*total_seconds));
            for (cue_id, trigger_at) in schedule.iter() {
                println!("  {cue_id:>10} at {}", format_clock(trigger_at));
            }
        }

        loop {
            tokio::select! {
                events = session.next_events() => {
                    for event in &events {
                        print_event(event);
                    }
                    if session.controller().state() != RunState::Running {
                        break;
                    }
                    print!("\r{} remaining ", format_clock(session.controller().time_remaining()));
                    let _ = std::io::stdout().flush();
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    if session.stop().is_some() {
                        println!("countdown stopped");
                    }
                    break;
                }
            }
        }

        let messages = session.controller().received_external_messages();
        if !messages.is_empty() {
            println!("external messages received:");
            for message in messages {
                println!("  {message}");
            }
        }
        Ok(())
    })
}

fn print_event(event: &Event) {
    match event {
        Event::CueFired {
            cue_id,
            time_remaining,
            ..
        } => println!("\ncue '{cue_id}' fired at {} remaining", format_clock(*time_remaining)),
        Event::ExternalMessage { message, .. } => println!("\n>> {message}"),
        Event::RunCompleted { .. } => println!("\ntime's up"),
        _ => {}
    }
}

/// Forward stdin lines into the trigger channel until EOF.
fn spawn_stdin_reader(injector: TriggerInjector) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Err(e) = injector.send(line) {
                log::warn!("dropping stdin trigger: {e}");
            }
        }
    });
}
