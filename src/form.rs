//! Line-oriented form for the interactive mode
//!
//! `Form` reads answers from any `BufRead` and writes prompts to any
//! `Write`, so the whole session can be driven from a test with a
//! `Cursor`. End of input means quit.

use std::io::{BufRead, Write};

use futures::future::BoxFuture;
use log::debug;

use crate::activity::{ActivityType, PrintablePage, AGE_BANDS, LANGUAGES};
use crate::controller::{Controller, Phase};
use crate::generation::{fun_fact, generate_activities, ContentGenerator};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Download,
    Reset,
    Quit,
}

pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Read one trimmed line; `None` at end of input.
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Free text. Blank keeps `current` unless it is empty.
    fn text(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let label = if current.is_empty() {
            label.to_string()
        } else {
            format!("{} [{}]", label, current)
        };
        loop {
            match self.ask(&label)? {
                None => return Ok(None),
                Some(s) if !s.is_empty() => return Ok(Some(s)),
                Some(_) if !current.is_empty() => return Ok(Some(current.to_string())),
                Some(_) => self.say("Campo obrigatório.")?,
            }
        }
    }

    /// Numbered menu. Blank keeps `current`; returns the chosen index.
    fn choose(&mut self, label: &str, options: &[&str], current: usize) -> Result<Option<usize>> {
        self.say(label)?;
        for (i, opt) in options.iter().enumerate() {
            let mark = if i == current { '*' } else { ' ' };
            writeln!(self.output, " {}{:>2}. {}", mark, i + 1, opt)?;
        }
        loop {
            match self.ask("Escolha")? {
                None => return Ok(None),
                Some(s) if s.is_empty() => return Ok(Some(current)),
                Some(s) => match s.parse::<usize>() {
                    Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                    _ => self.say(&format!("Digite um número de 1 a {}.", options.len()))?,
                },
            }
        }
    }

    /// Walk every field of the form. Returns `false` at end of input.
    pub fn fill(&mut self, controller: &mut Controller) -> Result<bool> {
        if let Some(banner) = controller.error() {
            let banner = format!("! {}", banner);
            self.say(&banner)?;
        }

        let current = controller.inputs().clone();
        let Some(theme) = self.text("Tema", &current.theme)? else {
            return Ok(false);
        };
        controller.set_theme(theme)?;

        let lang_idx = LANGUAGES.iter().position(|l| *l == current.language).unwrap_or(0);
        let Some(i) = self.choose("Idioma", LANGUAGES, lang_idx)? else {
            return Ok(false);
        };
        controller.set_language(LANGUAGES[i])?;

        let age_idx = AGE_BANDS.iter().position(|a| *a == current.age_band).unwrap_or(0);
        let Some(i) = self.choose("Faixa etária", AGE_BANDS, age_idx)? else {
            return Ok(false);
        };
        controller.set_age_band(AGE_BANDS[i])?;

        let labels: Vec<&str> = ActivityType::ALL.iter().map(|t| t.label()).collect();
        let type_idx = ActivityType::ALL
            .iter()
            .position(|t| *t == current.activity_type)
            .unwrap_or(0);
        let Some(i) = self.choose("Tipo de atividade", &labels, type_idx)? else {
            return Ok(false);
        };
        controller.set_activity_type(ActivityType::ALL[i])?;

        let Some(name) = self.text("Nome (aluno ou turma)", &current.recipient_name)? else {
            return Ok(false);
        };
        controller.set_recipient_name(name)?;
        Ok(true)
    }

    /// Summarize the pages and ask what to do next.
    pub fn review(&mut self, controller: &Controller) -> Result<ReviewChoice> {
        self.say("")?;
        for (i, page) in controller.pages().iter().enumerate() {
            let line = match page {
                PrintablePage::Cover(c) => format!("  {}. Capa: {} ({})", i + 1, c.recipient_name, c.theme),
                PrintablePage::Activity(a) => format!("  {}. {}: {}", i + 1, a.activity_type().label(), a.title()),
            };
            self.say(&line)?;
        }
        loop {
            match self.ask("[d] baixar PDF  [r] recomeçar  [q] sair")?.as_deref() {
                None | Some("q") => return Ok(ReviewChoice::Quit),
                Some("d") => return Ok(ReviewChoice::Download),
                Some("r") => return Ok(ReviewChoice::Reset),
                Some(other) => debug!("ignoring review answer {:?}", other),
            }
        }
    }
}

/// Drive the controller until the user quits or input ends.
///
/// `download` receives a snapshot of the pages and resolves to a
/// description of where the document went.
pub async fn run_session<R, W, G, D>(
    form: &mut Form<R, W>,
    controller: &mut Controller,
    generator: &G,
    mut download: D,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    G: ContentGenerator + Sync,
    D: FnMut(Vec<PrintablePage>) -> BoxFuture<'static, Result<String>>,
{
    loop {
        match controller.phase() {
            Phase::Editing => {
                if !form.fill(controller)? {
                    return Ok(());
                }
                let ticket = match controller.submit() {
                    Ok(t) => t,
                    Err(e) => {
                        form.say(&e.user_message())?;
                        continue;
                    }
                };
                form.say(fun_fact())?;
                let outcome = generate_activities(generator, &ticket.inputs).await;
                controller.complete(&ticket, outcome);
            }
            Phase::Generating => {
                return Err(Error::StateError("session resumed while a generation is in flight".into()));
            }
            Phase::Reviewing => match form.review(controller)? {
                ReviewChoice::Download => {
                    controller.begin_export()?;
                    let outcome = download(controller.pages().to_vec()).await;
                    match &outcome {
                        Ok(dest) => form.say(&format!("PDF salvo em {}", dest))?,
                        Err(e) => form.say(&format!("Não foi possível exportar: {}", e))?,
                    }
                    controller.finish_export(&outcome);
                }
                ReviewChoice::Reset => controller.reset()?,
                ReviewChoice::Quit => return Ok(()),
            },
        }
    }
}
