//! Line-oriented interactive shell
//!
//! Presentation only: parses one command per line, forwards it to the
//! controller and prints whatever the event bus reports. Network commands
//! are spawned so a slow upload does not block the prompt.

use std::path::PathBuf;

use bsx_common::{ClientEvent, Error, Result, StatusMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::warn;

use crate::controller::{ClientController, StateSnapshot};

pub const HELP: &str = "\
Commands:
  register <username> <password>   create an account
  login <username> <password>      log in
  logout                           log out and clear the session
  select <path>                    choose the file to upload
  upload                           upload the selected file
  features <n1, n2, ...>           set the recommendation input
  recommend [n1, n2, ...]          request a recommendation
  status                           show the current session
  help                             show this help
  quit                             exit";

/// One parsed user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    Select(PathBuf),
    Upload,
    Features(String),
    Recommend(Option<String>),
    Status,
    Help,
    Quit,
}

/// Parse one input line
///
/// Blank lines yield `Ok(None)`. Missing credential words become empty
/// strings so the credential flow can apply its own validation.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "register" | "login" => {
            let mut words = rest.split_whitespace();
            let username = words.next().unwrap_or_default().to_string();
            let password = words.next().unwrap_or_default().to_string();
            if verb.eq_ignore_ascii_case("register") {
                Command::Register { username, password }
            } else {
                Command::Login { username, password }
            }
        }
        "logout" => Command::Logout,
        "select" => {
            if rest.is_empty() {
                return Err(Error::InvalidInput("usage: select <path>".to_string()));
            }
            Command::Select(PathBuf::from(rest))
        }
        "upload" => Command::Upload,
        "features" => Command::Features(rest.to_string()),
        "recommend" => Command::Recommend((!rest.is_empty()).then(|| rest.to_string())),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(Error::InvalidInput(format!(
                "unknown command '{}' (try 'help')",
                other
            )))
        }
    };

    Ok(Some(command))
}

pub fn render_status(status: &StatusMessage) -> String {
    format!("[{}] {}", status.severity, status.text)
}

/// Text for an event, or `None` for events the shell does not print
pub fn render_event(event: &ClientEvent) -> Option<String> {
    match event {
        ClientEvent::StatusChanged { status } => Some(render_status(status)),
        ClientEvent::UploadProgress { file_name, percent } => {
            Some(format!("Uploading {}: {}%", file_name, percent))
        }
        ClientEvent::RecommendationReceived { label } => {
            Some(format!("Recommendation: {}", label))
        }
        ClientEvent::SessionChanged { .. } => None,
    }
}

pub fn render_snapshot(snapshot: &StateSnapshot) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Session:        {}",
        if snapshot.authenticated {
            "logged in"
        } else {
            "anonymous"
        }
    ));

    lines.push(match &snapshot.pending_file {
        Some((name, size)) => format!("Selected file:  {} ({} bytes)", name, size),
        None => "Selected file:  none".to_string(),
    });

    lines.push(format!("Features input: {}", snapshot.recommend_input));

    lines.push(format!(
        "Recommendation: {}",
        snapshot.recommendation.as_deref().unwrap_or("none")
    ));

    if let Some(status) = &snapshot.status {
        lines.push(format!(
            "Last status:    {} ({})",
            render_status(status),
            status.timestamp.format("%H:%M:%S")
        ));
    }

    lines.join("\n")
}

fn print_event(event: &ClientEvent) {
    if let Some(text) = render_event(event) {
        println!("{}", text);
    }
}

/// Run the shell until `quit` or end of input
///
/// On `quit`, in-flight requests are abandoned. At end of input they are
/// awaited so scripted sessions see every result.
pub async fn run<R>(controller: ClientController, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = controller.subscribe();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let renderer = tokio::spawn(async move {
        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => print_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Shell fell behind on events");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = &mut stop_rx => {
                    while let Ok(event) = events.try_recv() {
                        print_event(&event);
                    }
                    break;
                }
            }
        }
    });

    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();
    let mut quit = false;

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => {
                quit = true;
                break;
            }
            Command::Help => println!("{}", HELP),
            Command::Status => println!("{}", render_snapshot(&controller.snapshot())),
            Command::Logout => {
                controller.logout();
            }
            Command::Select(path) => match controller.select_file(&path).await {
                Ok(file) => println!("Selected: {} ({} bytes)", file.name(), file.len()),
                Err(e) => println!("Could not select {}: {}", path.display(), e),
            },
            Command::Features(text) => controller.set_recommend_input(text),
            Command::Register { username, password } => {
                let controller = controller.clone();
                in_flight.spawn(async move {
                    controller.register(&username, &password).await;
                });
            }
            Command::Login { username, password } => {
                let controller = controller.clone();
                in_flight.spawn(async move {
                    controller.login(&username, &password).await;
                });
            }
            Command::Upload => {
                let controller = controller.clone();
                in_flight.spawn(async move {
                    controller.upload().await;
                });
            }
            Command::Recommend(text) => {
                if let Some(text) = text {
                    controller.set_recommend_input(text);
                }
                let controller = controller.clone();
                in_flight.spawn(async move {
                    controller.recommend().await;
                });
            }
        }

        // Reap finished requests so the set does not grow unbounded
        while in_flight.try_join_next().is_some() {}
    }

    if quit {
        in_flight.shutdown().await;
    } else {
        while in_flight.join_next().await.is_some() {}
    }

    let _ = stop_tx.send(());
    if let Err(e) = renderer.await {
        warn!(error = %e, "Event renderer stopped abnormally");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsx_common::Severity;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_credentials() {
        assert_eq!(
            parse_command("login alice s3cret").unwrap(),
            Some(Command::Login {
                username: "alice".to_string(),
                password: "s3cret".to_string()
            })
        );
        assert_eq!(
            parse_command("register bob").unwrap(),
            Some(Command::Register {
                username: "bob".to_string(),
                password: String::new()
            })
        );
    }

    #[test]
    fn test_parse_select_keeps_spaces() {
        assert_eq!(
            parse_command("select /tmp/my file.txt").unwrap(),
            Some(Command::Select(PathBuf::from("/tmp/my file.txt")))
        );
        assert!(parse_command("select").is_err());
    }

    #[test]
    fn test_parse_recommend_variants() {
        assert_eq!(
            parse_command("recommend").unwrap(),
            Some(Command::Recommend(None))
        );
        assert_eq!(
            parse_command("recommend 1, 2.5, abc, 3").unwrap(),
            Some(Command::Recommend(Some("1, 2.5, abc, 3".to_string())))
        );
        assert_eq!(
            parse_command("features 4,5").unwrap(),
            Some(Command::Features("4,5".to_string()))
        );
    }

    #[test]
    fn test_verbs_case_insensitive() {
        assert_eq!(parse_command("UPLOAD").unwrap(), Some(Command::Upload));
        assert_eq!(parse_command("Exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_command("download x"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_events() {
        let status = StatusMessage::new(Severity::Warning, "Please login first.");
        assert_eq!(
            render_event(&ClientEvent::StatusChanged { status }).as_deref(),
            Some("[warning] Please login first.")
        );
        assert_eq!(
            render_event(&ClientEvent::UploadProgress {
                file_name: "a.txt".to_string(),
                percent: 42
            })
            .as_deref(),
            Some("Uploading a.txt: 42%")
        );
        assert_eq!(
            render_event(&ClientEvent::SessionChanged {
                authenticated: true
            }),
            None
        );
    }

    #[test]
    fn test_render_snapshot() {
        let snapshot = StateSnapshot {
            authenticated: true,
            pending_file: Some(("a.txt".to_string(), 3)),
            recommend_input: "1,2".to_string(),
            recommendation: Some("2".to_string()),
            status: None,
        };
        let text = render_snapshot(&snapshot);
        assert!(text.contains("logged in"));
        assert!(text.contains("a.txt (3 bytes)"));
        assert!(text.contains("Recommendation: 2"));
        assert!(!text.contains("Last status"));
    }

    fn offline_controller() -> ClientController {
        let config = crate::ClientConfig::new("http://127.0.0.1:9").unwrap();
        ClientController::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_run_returns_while_other_handles_alive() {
        let controller = offline_controller();
        let script: &[u8] = b"features 1, 2\nbogus\nstatus\n";

        run(controller.clone(), script).await.unwrap();

        assert_eq!(controller.snapshot().recommend_input, "1, 2");
    }

    #[tokio::test]
    async fn test_run_stops_at_quit() {
        let controller = offline_controller();
        let script: &[u8] = b"logout\nquit\nfeatures 9\n";

        run(controller.clone(), script).await.unwrap();

        // Lines after quit are never read
        assert!(controller.snapshot().recommend_input.is_empty());
        assert_eq!(controller.latest_status().unwrap().text, crate::messages::LOGGED_OUT);
    }
}
