use std::str::FromStr;

use thiserror::Error;
use training_core::model::{CourseId, OptionId, ParseIdError, QuestionId, VideoId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
}

/// One line typed into the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Status,
    Select { course: CourseId, video: VideoId },
    Finish,
    Answer { question: QuestionId, option: OptionId },
    Next,
    Score,
    Restart,
    Certificate { course: CourseId },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list                          show assigned courses
  status                        show the active video and quiz
  select <course> <video>       start watching a video
  finish                        the video finished playing
  answer <question> <option>    choose an answer
  next                          go to the next question
  score                         score the quiz now
  restart                       start the quiz again
  certificate <course>          download a course certificate
  help                          show this text
  quit                          leave the session";

impl SessionCommand {
    /// Parse a single input line.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for blank, unknown or malformed commands.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "status" => Self::Status,
            "select" | "watch" => {
                let [course, video] = two(&args, "select <course> <video>")?;
                Self::Select {
                    course: course.parse()?,
                    video: video.parse()?,
                }
            }
            "finish" | "done" => Self::Finish,
            "answer" => {
                let [question, option] = two(&args, "answer <question> <option>")?;
                Self::Answer {
                    question: question.parse()?,
                    option: option.parse()?,
                }
            }
            "next" => Self::Next,
            "score" => Self::Score,
            "restart" => Self::Restart,
            "certificate" | "cert" => {
                let [course] = one(&args, "certificate <course>")?;
                Self::Certificate {
                    course: course.parse()?,
                }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };

        let takes_args = matches!(
            command,
            Self::Select { .. } | Self::Answer { .. } | Self::Certificate { .. }
        );
        if !takes_args && !args.is_empty() {
            return Err(CommandError::Usage(bare_usage(command)));
        }
        Ok(command)
    }
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn one<'a>(args: &[&'a str], usage: &'static str) -> Result<[&'a str; 1], CommandError> {
    match args {
        [a] => Ok([*a]),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn two<'a>(args: &[&'a str], usage: &'static str) -> Result<[&'a str; 2], CommandError> {
    match args {
        [a, b] => Ok([*a, *b]),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn bare_usage(command: SessionCommand) -> &'static str {
    match command {
        SessionCommand::List => "list",
        SessionCommand::Status => "status",
        SessionCommand::Finish => "finish",
        SessionCommand::Next => "next",
        SessionCommand::Score => "score",
        SessionCommand::Restart => "restart",
        SessionCommand::Help => "help",
        SessionCommand::Quit => "quit",
        SessionCommand::Select { .. } => "select <course> <video>",
        SessionCommand::Answer { .. } => "answer <question> <option>",
        SessionCommand::Certificate { .. } => "certificate <course>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_ids() {
        assert_eq!(
            SessionCommand::parse("select 1 101").unwrap(),
            SessionCommand::Select {
                course: CourseId::new(1),
                video: VideoId::new(101)
            }
        );
        assert_eq!(
            "ANSWER 1011 10111".parse::<SessionCommand>().unwrap(),
            SessionCommand::Answer {
                question: QuestionId::new(1011),
                option: OptionId::new(10111)
            }
        );
        assert_eq!(
            SessionCommand::parse("cert 3").unwrap(),
            SessionCommand::Certificate {
                course: CourseId::new(3)
            }
        );
    }

    #[test]
    fn parses_bare_commands_and_aliases() {
        assert_eq!(SessionCommand::parse("  next ").unwrap(), SessionCommand::Next);
        assert_eq!(SessionCommand::parse("done").unwrap(), SessionCommand::Finish);
        assert_eq!(SessionCommand::parse("q").unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(SessionCommand::parse("   ").unwrap_err(), CommandError::Empty);
        assert_eq!(
            SessionCommand::parse("select 1").unwrap_err(),
            CommandError::Usage("select <course> <video>")
        );
        assert_eq!(
            SessionCommand::parse("next 2").unwrap_err(),
            CommandError::Usage("next")
        );
        assert!(matches!(
            SessionCommand::parse("answer x 1").unwrap_err(),
            CommandError::InvalidId(_)
        ));
        assert_eq!(
            SessionCommand::parse("dance").unwrap_err(),
            CommandError::Unknown("dance".into())
        );
    }
}
