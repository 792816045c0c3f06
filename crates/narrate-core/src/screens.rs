//! Survey screens and the text they narrate.
//!
//! The survey flow itself lives elsewhere; these helpers only describe what a
//! screen reads aloud so the driver can build its queue.

use serde::{Deserialize, Serialize};

use crate::builder::ScreenContent;

pub const APP_TITLE: &str = "Dynamic Transitions";
pub const APP_SUBTITLE: &str = "AI-powered surveys for student success.";
pub const ANSWERS_CUE: &str = "Answers:";
pub const START_BUTTON: &str = "Start Survey";

/// Goals offered on the start screen for the education survey.
pub const EDUCATION_GOAL_OPTIONS: [&str; 4] = [
    "Four-year college or university",
    "Community college",
    "Trade or technical school",
    "Apprenticeship or on-the-job training",
];

/// Kind of transition survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyType {
    CareerSpin,
    EducationSpin,
    IndependentSpin,
}

impl SurveyType {
    pub const ALL: [Self; 3] = [Self::CareerSpin, Self::EducationSpin, Self::IndependentSpin];

    /// Wire value, also used in element ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CareerSpin => "career_spin",
            Self::EducationSpin => "education_spin",
            Self::IndependentSpin => "independent_spin",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CareerSpin => "Career",
            Self::EducationSpin => "Education",
            Self::IndependentSpin => "Independent Living",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CareerSpin => {
                "Explore career paths that match your strengths and interests. (Approx. 10-15 mins)"
            }
            Self::EducationSpin => {
                "Plan the education or training you want after high school. (Approx. 10-15 mins)"
            }
            Self::IndependentSpin => {
                "Focus on skills for living independently, like budgeting and daily routines. (Approx. 10-15 mins)"
            }
        }
    }
}

/// SPIN category a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionCategory {
    Strengths,
    Preferences,
    Interests,
    Needs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleSelect,
    Written,
}

impl QuestionType {
    /// Whether answers are picked from a list of options.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::MultipleSelect)
    }
}

/// A question as produced by the question-generation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub category: QuestionCategory,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Narration for a survey question: the question, then the answer cue and
/// each option for choice questions.
#[must_use]
pub fn question_screen(question: &GeneratedQuestion) -> ScreenContent {
    let content = ScreenContent::new().question("question-text", question.question_text.clone());

    if !question.question_type.has_options() {
        return content;
    }

    content
        .label("answers-cue", ANSWERS_CUE)
        .options("option", question.options.iter().flatten().cloned())
}

/// Narration for the start screen with `survey_type` selected.
#[must_use]
pub fn start_screen(survey_type: SurveyType) -> ScreenContent {
    let mut content = ScreenContent::new()
        .title("app-title", APP_TITLE)
        .title("app-subtitle", APP_SUBTITLE)
        .label("name-label", "Student's Name")
        .label("grade-label", "Grade")
        .label("teacher-label", "Teacher of Record")
        .label("survey-type-label", "Survey Type");

    for offered in SurveyType::ALL {
        content = content.option(
            format!("survey-type-{}", offered.as_str()),
            format!("{}. {}", offered.label(), offered.description()),
        );
    }

    content = match survey_type {
        SurveyType::CareerSpin => content.label(
            "goal-label-career",
            "What is a career goal you're thinking about?",
        ),
        SurveyType::EducationSpin => content
            .label(
                "goal-label-education",
                "What is your main goal for education after high school?",
            )
            .options("goal-option", EDUCATION_GOAL_OPTIONS),
        SurveyType::IndependentSpin => content,
    };

    content.action("start-button", START_BUTTON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_queue;

    fn choice_question() -> GeneratedQuestion {
        GeneratedQuestion {
            category: QuestionCategory::Interests,
            question_text: "Which of these sounds most fun?".into(),
            question_type: QuestionType::MultipleChoice,
            options: Some(vec!["Building things".into(), "Helping people".into()]),
        }
    }

    #[test]
    fn choice_question_reads_cue_and_options() {
        let queue = build_queue(&question_screen(&choice_question()));
        assert_eq!(
            queue.ids(),
            vec!["question-text", "answers-cue", "option-0", "option-1"]
        );
    }

    #[test]
    fn written_question_reads_only_the_question() {
        let question = GeneratedQuestion {
            question_type: QuestionType::Written,
            options: None,
            ..choice_question()
        };
        assert_eq!(build_queue(&question_screen(&question)).ids(), vec!["question-text"]);
    }

    #[test]
    fn start_screen_goal_prompt_depends_on_survey_type() {
        let career = build_queue(&start_screen(SurveyType::CareerSpin));
        assert!(career.ids().contains(&"goal-label-career"));
        assert!(!career.ids().contains(&"goal-label-education"));

        let education = build_queue(&start_screen(SurveyType::EducationSpin));
        assert!(education.ids().contains(&"goal-label-education"));
        assert!(education.ids().contains(&"goal-option-3"));

        let independent = build_queue(&start_screen(SurveyType::IndependentSpin));
        assert!(!independent.ids().iter().any(|id| id.starts_with("goal-")));
    }

    #[test]
    fn start_screen_ends_with_start_button() {
        let queue = build_queue(&start_screen(SurveyType::IndependentSpin));
        assert_eq!(queue.ids().first(), Some(&"app-title"));
        assert_eq!(queue.ids().last(), Some(&"start-button"));
    }

    #[test]
    fn question_deserializes_from_model_json() {
        let json = r#"{
            "category": "Strengths",
            "question_text": "What are you good at?",
            "type": "multiple_select",
            "options": ["Math", "Art", "Sports", "Writing"]
        }"#;
        let question: GeneratedQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.category, QuestionCategory::Strengths);
        assert_eq!(question.question_type, QuestionType::MultipleSelect);
        assert_eq!(question.options.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn written_question_deserializes_without_options() {
        let json = r#"{"category": "Needs", "question_text": "Tell me more.", "type": "written"}"#;
        let question: GeneratedQuestion = serde_json::from_str(json).unwrap();
        assert!(question.options.is_none());
    }
}
