//! Question command handler.
//!
//! Narrates one survey question, read either from a generated-question JSON
//! file or from `--text`/`--option` flags.

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use narrate_core::{GeneratedQuestion, QuestionCategory, QuestionType, question_screen};
use tokio::io::AsyncBufRead;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::session::{self, SessionEnd};

/// Where the question comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    File(PathBuf),
    Inline { text: String, options: Vec<String> },
}

impl QuestionSource {
    /// Build a source from the `question` subcommand arguments.
    pub fn from_args(
        file: Option<PathBuf>,
        text: Option<String>,
        options: Vec<String>,
    ) -> Result<Self, CliError> {
        match (file, text) {
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(text)) => Ok(Self::Inline { text, options }),
            _ => Err(CliError::Arguments(
                "Pass exactly one of --file or --text".to_string(),
            )),
        }
    }

    /// Resolve into a question.
    ///
    /// Inline questions with options are multiple choice, without options
    /// they are written.
    pub fn load(self) -> Result<GeneratedQuestion, CliError> {
        match self {
            Self::File(path) => read_question_file(&path),
            Self::Inline { text, options } => {
                let question_type = if options.is_empty() {
                    QuestionType::Written
                } else {
                    QuestionType::MultipleChoice
                };
                Ok(GeneratedQuestion {
                    category: QuestionCategory::Interests,
                    question_text: text,
                    question_type,
                    options: (!options.is_empty()).then_some(options),
                })
            }
        }
    }
}

fn read_question_file(path: &Path) -> Result<GeneratedQuestion, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| {
        CliError::Arguments(format!("{} is not a generated question: {e}", path.display()))
    })
}

/// Narrate `question`.
pub async fn execute<R, W, Q>(
    ctx: CliContext,
    question: &GeneratedQuestion,
    input: R,
    out: &mut W,
    quit: Q,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    Q: Future<Output = ()>,
{
    writeln!(out, "{:?} question", question.category)?;
    session::run(ctx, question_screen(question), input, out, quit).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_question_with_options_is_multiple_choice() {
        let question = QuestionSource::Inline {
            text: "Pick one".into(),
            options: vec!["A".into(), "B".into()],
        }
        .load()
        .unwrap();
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.options.as_deref().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_inline_question_without_options_is_written() {
        let question = QuestionSource::from_args(None, Some("Tell us more".into()), vec![])
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(question.question_type, QuestionType::Written);
        assert!(question.options.is_none());
    }

    #[test]
    fn test_question_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(
            &path,
            r#"{"category":"Needs","question_text":"What help do you need?","type":"written"}"#,
        )
        .unwrap();

        let question = QuestionSource::File(path).load().unwrap();
        assert_eq!(question.category, QuestionCategory::Needs);
        assert_eq!(question.question_text, "What help do you need?");
    }

    #[test]
    fn test_bad_question_file_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, "{\"category\":\"Unknown\"}").unwrap();
        assert!(matches!(
            QuestionSource::File(path).load(),
            Err(CliError::Arguments(_))
        ));
    }

    #[test]
    fn test_missing_question_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            QuestionSource::File(dir.path().join("missing.json")).load(),
            Err(CliError::Io(_))
        ));
    }
}
