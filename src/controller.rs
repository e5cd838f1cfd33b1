//! Form / result state machine
//!
//! The controller is the single owner of the user's inputs and of whatever
//! the last successful generation produced. It never talks to the model
//! itself: `submit` hands out a ticket, the caller runs the generation, and
//! `complete` applies the outcome.

use log::{debug, info, warn};

use crate::activity::{ActivityType, GeneratedActivity, PrintablePage, UserInputs, AGE_BANDS, LANGUAGES};
use crate::assemble::assemble_pages;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Form visible, inputs editable
    Editing,
    /// A submission is in flight; the form is locked
    Generating,
    /// Pages are ready for download
    Reviewing,
}

/// Handle for one in-flight generation
#[derive(Debug, Clone)]
pub struct Submission {
    epoch: u64,
    pub inputs: UserInputs,
}

impl Submission {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug)]
pub struct Controller {
    inputs: UserInputs,
    phase: Phase,
    error: Option<String>,
    pages: Vec<PrintablePage>,
    epoch: u64,
    exporting: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(UserInputs::default())
    }
}

impl Controller {
    pub fn new(inputs: UserInputs) -> Self {
        Self {
            inputs,
            phase: Phase::Editing,
            error: None,
            pages: Vec::new(),
            epoch: 0,
            exporting: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn inputs(&self) -> &UserInputs {
        &self.inputs
    }

    /// Banner text from the last failed submission, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Cover first, then one page per generated variation. Empty unless
    /// reviewing.
    pub fn pages(&self) -> &[PrintablePage] {
        &self.pages
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    fn require(&self, phase: Phase, action: &str) -> Result<()> {
        if self.phase != phase {
            return Err(Error::StateError(format!(
                "cannot {} while {:?}",
                action, self.phase
            )));
        }
        Ok(())
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<()> {
        self.require(Phase::Editing, "edit theme")?;
        self.inputs.theme = theme.into();
        Ok(())
    }

    pub fn set_recipient_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.require(Phase::Editing, "edit name")?;
        self.inputs.recipient_name = name.into();
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.require(Phase::Editing, "edit language")?;
        if !LANGUAGES.contains(&language) {
            return Err(Error::ConfigError(format!("unsupported language: {}", language)));
        }
        self.inputs.language = language.to_string();
        Ok(())
    }

    pub fn set_age_band(&mut self, age_band: &str) -> Result<()> {
        self.require(Phase::Editing, "edit age band")?;
        if !AGE_BANDS.contains(&age_band) {
            return Err(Error::ConfigError(format!("unsupported age band: {}", age_band)));
        }
        self.inputs.age_band = age_band.to_string();
        Ok(())
    }

    pub fn set_activity_type(&mut self, activity_type: ActivityType) -> Result<()> {
        self.require(Phase::Editing, "edit activity type")?;
        self.inputs.activity_type = activity_type;
        Ok(())
    }

    /// Lock the form and hand out a ticket for the current inputs.
    ///
    /// Clears any previous banner. Fails without changing state if the
    /// inputs are incomplete or a submission is already running.
    pub fn submit(&mut self) -> Result<Submission> {
        self.require(Phase::Editing, "submit")?;
        self.inputs.validate()?;

        self.epoch += 1;
        self.error = None;
        self.phase = Phase::Generating;
        info!("submission {} for {}", self.epoch, self.inputs.activity_type.key());
        Ok(Submission { epoch: self.epoch, inputs: self.inputs.clone() })
    }

    /// Apply the outcome of a generation.
    ///
    /// Returns `false` when the ticket is stale (a later transition already
    /// happened) and the outcome was dropped.
    pub fn complete(&mut self, ticket: &Submission, outcome: Result<Vec<GeneratedActivity>>) -> bool {
        if ticket.epoch != self.epoch || self.phase != Phase::Generating {
            warn!(
                "dropping stale generation result (ticket {}, current {}, {:?})",
                ticket.epoch, self.epoch, self.phase
            );
            return false;
        }

        match outcome {
            Ok(activities) => {
                debug!("submission {} produced {} activities", ticket.epoch, activities.len());
                self.pages = assemble_pages(&ticket.inputs, activities);
                self.phase = Phase::Reviewing;
            }
            Err(e) => {
                warn!("submission {} failed: {}", ticket.epoch, e);
                self.error = Some(e.user_message());
                self.phase = Phase::Editing;
            }
        }
        true
    }

    /// Back to an empty form. Theme and name are cleared; language, age band
    /// and activity type are kept.
    pub fn reset(&mut self) -> Result<()> {
        self.require(Phase::Reviewing, "reset")?;
        self.epoch += 1;
        self.pages.clear();
        self.error = None;
        self.exporting = false;
        self.inputs.theme.clear();
        self.inputs.recipient_name.clear();
        self.phase = Phase::Editing;
        Ok(())
    }

    /// Mark an export as running. Only one export at a time.
    pub fn begin_export(&mut self) -> Result<()> {
        self.require(Phase::Reviewing, "export")?;
        if self.exporting {
            return Err(Error::StateError("an export is already running".into()));
        }
        self.exporting = true;
        Ok(())
    }

    /// Clear the busy flag. Export failures are logged only; the pages stay.
    pub fn finish_export<T>(&mut self, outcome: &Result<T>) {
        if let Err(e) = outcome {
            warn!("export failed: {}", e);
        }
        self.exporting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{QuizData, QuizQuestion};

    fn filled() -> Controller {
        let mut c = Controller::default();
        c.set_theme("Dinosaurs").unwrap();
        c.set_recipient_name("Turma A").unwrap();
        c.set_activity_type(ActivityType::Quiz).unwrap();
        c
    }

    fn quiz(title: &str) -> GeneratedActivity {
        GeneratedActivity::Quiz(QuizData {
            title: title.into(),
            questions: vec![QuizQuestion {
                question: "Q?".into(),
                options: vec!["a".into(), "b".into()],
                answer: "a".into(),
            }],
        })
    }

    #[test]
    fn starts_editing_with_defaults() {
        let c = Controller::default();
        assert_eq!(c.phase(), Phase::Editing);
        assert_eq!(c.inputs().language, "Português");
        assert_eq!(c.inputs().age_band, "5-6 anos");
        assert_eq!(c.inputs().activity_type, ActivityType::ConnectTheDots);
        assert!(c.pages().is_empty());
    }

    #[test]
    fn successful_submission_reaches_review() {
        let mut c = filled();
        let t = c.submit().unwrap();
        assert_eq!(c.phase(), Phase::Generating);
        assert!(c.submit().is_err());
        assert!(c.set_theme("x").is_err());

        assert!(c.complete(&t, Ok(vec![quiz("1"), quiz("2"), quiz("3")])));
        assert_eq!(c.phase(), Phase::Reviewing);
        assert_eq!(c.pages().len(), 4);
        assert!(matches!(c.pages()[0], PrintablePage::Cover(_)));
        assert!(c.error().is_none());
    }

    #[test]
    fn failed_submission_returns_to_form_with_banner() {
        let mut c = filled();
        let t = c.submit().unwrap();
        assert!(c.complete(&t, Err(Error::InvalidResponse("eof".into()))));
        assert_eq!(c.phase(), Phase::Editing);
        assert!(c.error().unwrap().contains("inválidos"));
        assert!(c.pages().is_empty());
        assert_eq!(c.inputs().theme, "Dinosaurs");

        // banner clears on the next submit
        c.submit().unwrap();
        assert!(c.error().is_none());
    }

    #[test]
    fn incomplete_inputs_do_not_submit() {
        let mut c = Controller::default();
        assert!(c.submit().is_err());
        assert_eq!(c.phase(), Phase::Editing);
    }

    #[test]
    fn reset_keeps_selections_and_clears_text() {
        let mut c = filled();
        c.set_language("Inglês").unwrap();
        let t = c.submit().unwrap();
        c.complete(&t, Ok(vec![quiz("1")]));
        c.reset().unwrap();

        assert_eq!(c.phase(), Phase::Editing);
        assert!(c.pages().is_empty());
        assert!(c.inputs().theme.is_empty());
        assert!(c.inputs().recipient_name.is_empty());
        assert_eq!(c.inputs().language, "Inglês");
        assert_eq!(c.inputs().activity_type, ActivityType::Quiz);
        assert!(c.reset().is_err());
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut c = filled();
        let first = c.submit().unwrap();
        c.complete(&first, Err(Error::GenerationError("503".into())));
        let second = c.submit().unwrap();

        assert!(!c.complete(&first, Ok(vec![quiz("late")])));
        assert_eq!(c.phase(), Phase::Generating);
        assert!(c.complete(&second, Ok(vec![quiz("fresh")])));
        match &c.pages()[1] {
            PrintablePage::Activity(a) => assert_eq!(a.title(), "fresh"),
            other => panic!("unexpected page {:?}", other),
        }
    }

    #[test]
    fn closed_lists_are_enforced() {
        let mut c = Controller::default();
        assert!(c.set_language("Klingon").is_err());
        assert!(c.set_age_band("99 anos").is_err());
        assert_eq!(c.inputs().language, "Português");
    }

    #[test]
    fn one_export_at_a_time() {
        let mut c = filled();
        assert!(c.begin_export().is_err());
        let t = c.submit().unwrap();
        c.complete(&t, Ok(vec![quiz("1")]));
        c.begin_export().unwrap();
        assert!(c.is_exporting());
        assert!(c.begin_export().is_err());
        c.finish_export::<()>(&Err(Error::ExportError("disk full".into())));
        assert!(!c.is_exporting());
        assert_eq!(c.phase(), Phase::Reviewing);
        assert_eq!(c.pages().len(), 2);
    }
}
