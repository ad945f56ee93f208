//! Interactive session.
//!
//! Drives the input and result views from stdin while a clock ticker keeps
//! the header time current. Downloads land in the configured output
//! directory.

use heartify_common::clock::{ClockTicker, SystemClock};
use heartify_common::config::AppConfig;
use heartify_common::error::HeartifyResult;
use heartify_display_model::{Notice, NoticeKind, Notifier, View, CAPTION, HEADER_TITLE};
use heartify_render_engine::{DirectorySink, GlyphRasterizer, HeartifySession, OffscreenDocument};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints notices to stdout.
struct ConsoleNotifier {
    json: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        if self.json {
            match serde_json::to_string(&notice) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("Failed to serialize notice: {e}"),
            }
            return;
        }
        let tag = match notice.kind {
            NoticeKind::Success => "[OK]",
            NoticeKind::Error => "[ERROR]",
        };
        println!("{tag} {}: {}", notice.title, notice.description);
    }
}

type CliSession =
    HeartifySession<GlyphRasterizer, OffscreenDocument, DirectorySink, ConsoleNotifier>;

/// What the next input line means.
enum Prompt {
    FirstName,
    SecondName { first: String },
    Action,
}

// Commands accepted where a name is expected.
const QUIT: &str = ":q";
const PROJECT: &str = ":z";

pub async fn run(config: AppConfig, json: bool) -> HeartifyResult<()> {
    let exporter = super::build_exporter(&config)?;
    let mut session: CliSession = HeartifySession::new(
        exporter,
        OffscreenDocument::new(),
        DirectorySink::new(&config.output_dir),
        ConsoleNotifier { json },
    );

    let mut ticker = ClockTicker::start(SystemClock);
    let mut clock_updates = ticker.subscribe();
    session.controller_mut().set_clock(ticker.current());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt = Prompt::FirstName;
    present(&session);
    ask(&prompt);

    loop {
        tokio::select! {
            changed = clock_updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let reading = clock_updates.borrow_and_update().clone();
                session.controller_mut().set_clock(reading);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim() == QUIT {
                    break;
                }
                let at_name_prompt = !matches!(prompt, Prompt::Action);
                if at_name_prompt && line.trim() == PROJECT {
                    session.download_project();
                } else {
                    prompt = match prompt {
                        Prompt::FirstName => {
                            session.controller_mut().edit_first_name(line.clone());
                            Prompt::SecondName { first: line }
                        }
                        Prompt::SecondName { first } => {
                            if session.submit(&first, &line) {
                                present(&session);
                                Prompt::Action
                            } else {
                                Prompt::FirstName
                            }
                        }
                        Prompt::Action => match line.trim() {
                            "i" => {
                                session.download_image().await;
                                Prompt::Action
                            }
                            "z" => {
                                session.download_project();
                                Prompt::Action
                            }
                            "n" => {
                                session.reset();
                                present(&session);
                                Prompt::FirstName
                            }
                            "q" => break,
                            "" => {
                                present(&session);
                                Prompt::Action
                            }
                            other => {
                                println!("Unknown action: {other}");
                                Prompt::Action
                            }
                        },
                    };
                }
                ask(&prompt);
            }
        }
    }

    ticker.stop();
    Ok(())
}

fn ask(prompt: &Prompt) {
    match prompt {
        Prompt::FirstName => println!("First name ({PROJECT} download project, {QUIT} quit):"),
        Prompt::SecondName { .. } => println!("Second name:"),
        Prompt::Action => println!(
            "Actions: [i] download image  [z] download project  [n] create new  [q] quit"
        ),
    }
}

fn present(session: &CliSession) {
    let controller = session.controller();
    println!();
    println!("{HEADER_TITLE}    {}", controller.clock());
    println!("{}", "=".repeat(50));
    match controller.view() {
        View::Input(input) if input.is_empty() => println!("Enter both names to begin."),
        View::Input(input) => {
            println!("First name:  {}", input.first_name);
            println!("Second name: {}", input.second_name);
        }
        View::Result(names) => {
            println!("{names}");
            println!("{CAPTION}");
        }
    }
    println!();
}
