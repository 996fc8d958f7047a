use std::path::PathBuf;

use log::{debug, info, warn};

use crate::batch::generate_cookies;
use crate::error::Error;
use crate::presenter::{Presenter, Summary, Tone};
use crate::util::{file_exists, load_password_list, resolve_path};

pub const DEFAULT_OUTPUT: &str = "~/cookies.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    Single,
    File,
}

impl PasswordMode {
    const CHOICES: [&'static str; 2] = ["1", "2"];

    fn from_choice(choice: &str) -> Self {
        match choice {
            "1" => Self::Single,
            _ => Self::File,
        }
    }
}

/// Everything collected for one batch.
#[derive(Debug)]
struct Batch {
    username: String,
    passwords: Vec<String>,
    output: String,
    resolved: PathBuf,
}

/// Interactive loop: collect, confirm, generate, ask to repeat.
pub struct Session<'a> {
    presenter: &'a mut dyn Presenter,
}

impl<'a> Session<'a> {
    pub fn new(presenter: &'a mut dyn Presenter) -> Self {
        Self { presenter }
    }

    /// Runs until the operator declines another batch.
    ///
    /// Only [`Error::Interrupted`] and terminal failures escape.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.presenter.banner()?;
            let batch = match self.collect().and_then(|batch| self.approve(batch)) {
                Ok(batch) => batch,
                Err(Error::Cancelled) => continue,
                Err(e) => return Err(e),
            };

            self.generate(&batch)?;

            if !self.presenter.confirm("Do you want to generate another batch?")? {
                self.presenter.message(Tone::Info, "Goodbye")?;
                return Ok(());
            }
        }
    }

    fn collect(&mut self) -> Result<Batch, Error> {
        let username = self
            .presenter
            .prompt("Enter username (single username, e.g., wiener)", None)?;

        self.presenter.message(
            Tone::Info,
            "Password input mode: (1) Single password  (2) Password list file",
        )?;
        let choice = self
            .presenter
            .choose("Choose mode", &PasswordMode::CHOICES, "2")?;

        let passwords = match PasswordMode::from_choice(&choice) {
            PasswordMode::Single => {
                vec![self.presenter.prompt("Enter password (can be empty)", None)?]
            }
            PasswordMode::File => self.password_file()?,
        };

        let output = self.presenter.prompt(
            "Enter output path and filename (e.g., ~/cookies.txt)",
            Some(DEFAULT_OUTPUT),
        )?;
        let resolved = resolve_path(&output)?;

        Ok(Batch {
            username,
            passwords,
            output,
            resolved,
        })
    }

    fn password_file(&mut self) -> Result<Vec<String>, Error> {
        loop {
            let path = self.presenter.prompt(
                "Enter password file path (one per line, e.g., ~/passwords.txt)",
                None,
            )?;
            match load_password_list(&path) {
                Ok(passwords) => {
                    self.presenter.list("Passwords", &passwords)?;
                    return Ok(passwords);
                }
                Err(e @ Error::PathNotFound(_)) => {
                    self.presenter.message(Tone::Error, &e.to_string())?
                }
                Err(Error::Io(e)) => {
                    warn!("read {path:?}: {e}");
                    let text = format!("cannot read {}: {e}", path.trim());
                    self.presenter.message(Tone::Error, &text)?
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Summary and overwrite confirmations. A decline is [`Error::Cancelled`].
    fn approve(&mut self, batch: Batch) -> Result<Batch, Error> {
        self.presenter.summary(&Summary {
            username: &batch.username,
            count: batch.passwords.len(),
            output: &batch.resolved,
        })?;

        if !self.presenter.confirm("Proceed and generate cookies?")? {
            return self.cancel("Cancelled. Returning to input...");
        }

        if file_exists(&batch.resolved) {
            let question = format!("File {} exists. Overwrite?", batch.resolved.display());
            if !self.presenter.confirm(&question)? {
                return self.cancel("Aborted by user. Returning to input...");
            }
        }
        Ok(batch)
    }

    fn cancel(&mut self, notice: &str) -> Result<Batch, Error> {
        debug!("{notice}");
        self.presenter.message(Tone::Info, notice)?;
        self.presenter.pause()?;
        Err(Error::Cancelled)
    }

    /// Generation failures are reported, not returned.
    fn generate(&mut self, batch: &Batch) -> Result<(), Error> {
        self.presenter.begin_batch(batch.passwords.len())?;

        let mut shown = Ok(());
        let presenter = &mut *self.presenter;
        let result = generate_cookies(&batch.username, &batch.passwords, &batch.output, |p| {
            if shown.is_ok() {
                shown = presenter.progress(p);
            }
        });
        self.presenter.end_batch()?;
        shown?;

        match result {
            Ok(count) => {
                info!("batch of {count} for {:?} done", batch.username);
                self.presenter.message(
                    Tone::Success,
                    &format!(
                        "Wrote {count} cookies to:\n{}",
                        batch.resolved.display()
                    ),
                )
            }
            Err(e) => self
                .presenter
                .message(Tone::Error, &format!("writing file failed: {e}")),
        }
    }
}
