//! Top-level CLI command definitions.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use narrate_core::SurveyType;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the prebuilt voices
    Voices,

    /// Narrate a single survey question
    Question {
        /// JSON file holding a generated question
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,

        /// Question text, as an alternative to --file
        #[arg(long)]
        text: Option<String>,

        /// Answer option (repeatable; only used with --text)
        #[arg(long, requires = "text")]
        option: Vec<String>,
    },

    /// Narrate the survey start screen
    Start {
        /// Survey type to select on the start screen
        #[arg(long, value_enum, default_value_t = SurveyTypeArg::Career)]
        survey_type: SurveyTypeArg,
    },
}

/// Survey type as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurveyTypeArg {
    Career,
    Education,
    Independent,
}

impl From<SurveyTypeArg> for SurveyType {
    fn from(arg: SurveyTypeArg) -> Self {
        match arg {
            SurveyTypeArg::Career => Self::CareerSpin,
            SurveyTypeArg::Education => Self::EducationSpin,
            SurveyTypeArg::Independent => Self::IndependentSpin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_type_arg_maps_to_domain() {
        assert_eq!(
            SurveyType::from(SurveyTypeArg::Independent),
            SurveyType::IndependentSpin
        );
        assert_eq!(
            SurveyType::from(SurveyTypeArg::Career).as_str(),
            "career_spin"
        );
    }
}
