//! The cleanup command: select, confirm, remove.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{CleanupError, Result};
use crate::logging::Logger;
use crate::remove::{FsRemover, RemovalReport, Remover, remove_selection};
use crate::select::{Policy, Selection, Selector};
use crate::size::format_bytes;

/// What a cleanup run selected and, unless it was a dry run, removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub selection: Selection,
    /// `None` when nothing was removed: a dry run or an empty selection
    pub report: Option<RemovalReport>,
}

pub struct Cleanup<'a> {
    target_dir: &'a Path,
    policy: Policy,
    skip_prompt: bool,
    dry_run: bool,
    verbose: u8,
    quiet: bool,
}

#[derive(Default)]
pub struct CleanupBuilder<'a> {
    target_dir: Option<&'a Path>,
    policy: Option<Policy>,
    skip_prompt: bool,
    dry_run: bool,
    verbose: u8,
    quiet: bool,
}

impl<'a> CleanupBuilder<'a> {
    pub fn target_dir(mut self, path: &'a Path) -> Self {
        self.target_dir = Some(path);
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn skip_prompt(mut self, skip: bool) -> Self {
        self.skip_prompt = skip;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> Result<Cleanup<'a>> {
        let target_dir = self.target_dir.ok_or_else(|| {
            CleanupError::Config("A target directory is required".to_string())
        })?;
        let policy = self.policy.ok_or_else(|| {
            CleanupError::Config("Did not specify either keep-after or free-up".to_string())
        })?;

        Ok(Cleanup {
            target_dir,
            policy,
            skip_prompt: self.skip_prompt,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        })
    }
}

impl<'a> Cleanup<'a> {
    pub fn builder<'b>() -> CleanupBuilder<'b> {
        CleanupBuilder::default()
    }

    /// Run against the real filesystem, prompting on stdin.
    pub fn run(&self) -> Result<CleanupOutcome> {
        let stdin = std::io::stdin();
        self.run_with(&mut FsRemover, &mut stdin.lock(), &mut std::io::stderr())
    }

    /// Run with an explicit remover and prompt streams.
    ///
    /// The summary and the prompt are written to `output`; the answer is read
    /// from `input`. Declining returns [`CleanupError::Aborted`].
    pub fn run_with<R, I, O>(
        &self,
        remover: &mut R,
        input: &mut I,
        output: &mut O,
    ) -> Result<CleanupOutcome>
    where
        R: Remover + ?Sized,
        I: BufRead + ?Sized,
        O: Write + ?Sized,
    {
        let log = Logger::new(self.verbose, self.quiet);

        log.verbose(1, format!("Cleaning up {}", self.target_dir.display()));

        let selection = Selector::builder()
            .target_dir(self.target_dir)
            .policy(self.policy.clone())
            .build()?
            .select(&log)?;

        if selection.is_empty() {
            log.info("Nothing to clean up.");
            return Ok(CleanupOutcome {
                selection,
                report: None,
            });
        }

        if !log.quiet() {
            write_summary(&selection, output).map_err(stream_error)?;
        }

        if self.dry_run {
            log.info("Dry run: nothing was removed.");
            return Ok(CleanupOutcome {
                selection,
                report: None,
            });
        }

        if !self.skip_prompt && !confirm("Proceed with cleanup?", input, output)? {
            return Err(CleanupError::Aborted);
        }

        let report = remove_selection(&selection, remover, &log);
        log.info(format!(
            "Removed {} links, {} files and {} folders.",
            report.links.removed, report.files.removed, report.folders.removed
        ));
        if report.failed() > 0 {
            log.warn(format!(
                "Could not remove {} links, {} files and {} folders.",
                report.links.failed, report.files.failed, report.folders.failed
            ));
        }
        log.info("Cleanup complete.");

        Ok(CleanupOutcome {
            selection,
            report: Some(report),
        })
    }
}

fn write_summary<O: Write + ?Sized>(selection: &Selection, output: &mut O) -> std::io::Result<()> {
    writeln!(output, "These items will be deleted:")?;
    for (heading, paths) in [
        ("Folders", &selection.folders),
        ("Files", &selection.files),
        ("Links", &selection.links),
    ] {
        if paths.is_empty() {
            continue;
        }
        writeln!(output, "  {heading}:")?;
        for path in paths {
            writeln!(output, "    {}", path.display())?;
        }
    }
    writeln!(
        output,
        "This frees up {}.",
        format_bytes(selection.freed_bytes)
    )
}

/// Ask a yes/no question; an empty answer or end of input means no.
fn confirm<I, O>(question: &str, input: &mut I, output: &mut O) -> Result<bool>
where
    I: BufRead + ?Sized,
    O: Write + ?Sized,
{
    loop {
        write!(output, "{question} [y/N] ").map_err(stream_error)?;
        output.flush().map_err(stream_error)?;

        let mut answer = String::new();
        let read = input.read_line(&mut answer).map_err(stream_error)?;
        if read == 0 {
            writeln!(output).map_err(stream_error)?;
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "ye" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")
                .map_err(stream_error)?,
        }
    }
}

fn stream_error(source: std::io::Error) -> CleanupError {
    CleanupError::Io {
        path: PathBuf::from("<terminal>"),
        source,
    }
}
