mod commands;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use services::{
    CertificateRequestError, Clock, CourseProgressController, Notifier, SourceMode,
    TracingNotifier, TrainingConfig,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;
use training_core::Notice;
use training_core::progress::TransitionError;

use crate::commands::{HELP, SessionCommand};

#[derive(Debug, Parser)]
#[command(name = "trainee", about = "Security awareness training from the terminal")]
struct Cli {
    /// TOML config file (defaults to $TRAINING_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where courses come from: remote or sample
    #[arg(long, global = true)]
    source: Option<String>,

    /// Base url of the training API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Employee id used for the course-list request
    #[arg(long, global = true)]
    user_id: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// List assigned courses with their progress
    Courses,
    /// Print aggregate training figures
    Overview,
    /// Work through videos and quizzes interactively (default)
    Session,
}

/// Prints notices for the user.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::debug!(kind = %notice.kind, title = %notice.title, "notice");
        println!("{notice}");
    }
}

impl Cli {
    fn training_config(&self) -> Result<TrainingConfig, Box<dyn std::error::Error>> {
        let mut config = TrainingConfig::load(self.config.as_deref())?;
        if let Some(source) = &self.source {
            config.source = source.parse::<SourceMode>()?;
        }
        if let Some(url) = &self.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(user) = &self.user_id {
            config.user_id = Some(user.clone());
        }
        Ok(config)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.training_config()?;
    let loader = config.course_loader()?;
    tracing::info!(source = %config.source, "starting");

    let command = cli.command.unwrap_or(Command::Session);
    // One-shot listings only log notices; the session prints them inline.
    let notifier: Arc<dyn Notifier> = match command {
        Command::Session => Arc::new(ConsoleNotifier),
        Command::Courses | Command::Overview => Arc::new(TracingNotifier),
    };
    let clock = Clock::default_clock();
    let mut controller = CourseProgressController::load(clock, notifier, &loader).await;

    match command {
        Command::Courses => {
            print!("{}", render::course_list(controller.courses(), clock.today()));
        }
        Command::Overview => {
            print!("{}", render::overview(&controller.overview()));
        }
        Command::Session => {
            print!("{}", render::course_list(controller.courses(), clock.today()));
            run_session(&mut controller, clock).await?;
        }
    }
    Ok(())
}

async fn run_session(
    controller: &mut CourseProgressController,
    clock: Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    println!("Type `help` for commands.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(commands::CommandError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command == SessionCommand::Quit {
            break;
        }
        if let Err(err) = handle(controller, clock, command) {
            // Already reported through the notifier.
            tracing::debug!(error = %err, "session command blocked");
        }
    }
    Ok(())
}

/// A session command the controller refused.
#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Certificate(#[from] CertificateRequestError),
}

fn handle(
    controller: &mut CourseProgressController,
    clock: Clock,
    command: SessionCommand,
) -> Result<(), ActionError> {
    match command {
        SessionCommand::List => {
            print!("{}", render::course_list(controller.courses(), clock.today()));
        }
        SessionCommand::Status => print!("{}", render::status(controller.state())),
        SessionCommand::Select { course, video } => {
            controller.select_video(course, video)?;
            print!("{}", render::status(controller.state()));
        }
        SessionCommand::Finish => {
            controller.on_video_playback_finished()?;
            print!("{}", render::status(controller.state()));
        }
        SessionCommand::Answer { question, option } => controller.submit_answer(question, option)?,
        SessionCommand::Next => {
            controller.advance_question()?;
            print!("{}", render::status(controller.state()));
        }
        SessionCommand::Score => controller.score_quiz()?,
        SessionCommand::Restart => {
            controller.restart_quiz()?;
            print!("{}", render::status(controller.state()));
        }
        SessionCommand::Certificate { course } => controller.download_certificate(course)?,
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::RecordingNotifier;
    use services::sources::sample_courses;
    use training_core::model::CourseId;
    use training_core::time::fixed_clock;

    fn controller(notifier: Arc<RecordingNotifier>) -> CourseProgressController {
        CourseProgressController::new(fixed_clock(), notifier, sample_courses().unwrap())
    }

    #[test]
    fn refused_certificate_surfaces_as_an_error() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut ctl = controller(notifier.clone());

        let err = handle(
            &mut ctl,
            fixed_clock(),
            SessionCommand::Certificate {
                course: CourseId::new(2),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::Certificate(_)));
        assert_eq!(notifier.take().len(), 1);

        handle(
            &mut ctl,
            fixed_clock(),
            SessionCommand::Certificate {
                course: CourseId::new(3),
            },
        )
        .unwrap();
    }

    #[test]
    fn blocked_transition_surfaces_as_an_error() {
        let mut ctl = controller(Arc::new(RecordingNotifier::new()));
        let err = handle(&mut ctl, fixed_clock(), SessionCommand::Next).unwrap_err();
        assert!(matches!(err, ActionError::Transition(_)));
    }
}
