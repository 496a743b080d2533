use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;

use dd_app::SessionOrchestrator;
use dd_core::claim::ClaimProgress;
use dd_core::security::SecretString;
use dd_core::session::{AppPhase, FlowError, SessionView};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use super::render::{render_error, render_progress, render_view};

const AUTHENTICATED_HELP: &str = "Commands: claim, refresh, logout, quit";

/// Line-oriented front end over a [`SessionOrchestrator`].
///
/// Reads commands from `R` and writes everything the user sees to `W`.
pub struct Console<R, W> {
    orchestrator: Arc<SessionOrchestrator>,
    lines: Lines<R>,
    /// Lines typed while a claim was running, replayed afterwards.
    pending: VecDeque<String>,
    input_closed: bool,
    shown_phase: Option<AppPhase>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(orchestrator: Arc<SessionOrchestrator>, input: R, out: W) -> Self {
        Self {
            orchestrator,
            lines: input.lines(),
            pending: VecDeque::new(),
            input_closed: false,
            shown_phase: None,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Boot the session and serve commands until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        let booted = self.orchestrator.boot().await;
        self.report(booted)?;

        loop {
            let view = self.orchestrator.view();
            if self.shown_phase != Some(view.phase) {
                self.show(&view)?;
            }

            let keep_going = match view.phase {
                AppPhase::Loading => false,
                AppPhase::LoggedOut => self.login_prompt().await?,
                AppPhase::AwaitingPin => self.pin_prompt().await?,
                AppPhase::Authenticated => self.command_prompt().await?,
                AppPhase::ClaimInProgress => {
                    self.watch_claim().await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        writeln!(self.out, "Bye!")?;
        self.out.flush()
    }

    async fn login_prompt(&mut self) -> io::Result<bool> {
        let Some(phone) = self.prompt("Phone: ").await? else {
            return Ok(false);
        };
        if phone.trim() == "quit" {
            return Ok(false);
        }
        let Some(password) = self.prompt("Password: ").await? else {
            return Ok(false);
        };
        let result = self
            .orchestrator
            .submit_login(&phone, SecretString::new(password))
            .await;
        self.report(result)?;
        Ok(true)
    }

    async fn pin_prompt(&mut self) -> io::Result<bool> {
        let Some(line) = self.prompt("PIN: ").await? else {
            return Ok(false);
        };
        let result = match line.trim() {
            "quit" => return Ok(false),
            "back" => self.orchestrator.back().await,
            "logout" => self.orchestrator.logout().await,
            _ => {
                self.orchestrator
                    .submit_pin(SecretString::new(line.trim()))
                    .await
            }
        };
        self.report(result)?;
        Ok(true)
    }

    async fn command_prompt(&mut self) -> io::Result<bool> {
        let Some(line) = self.prompt("> ").await? else {
            return Ok(false);
        };
        let result = match line.trim() {
            "" => return Ok(true),
            "quit" | "exit" => return Ok(false),
            "claim" => self.orchestrator.start_claim().await,
            "refresh" => self.orchestrator.refresh_stats().await,
            "logout" => self.orchestrator.logout().await,
            other => {
                debug!(command = other, "unknown console command");
                writeln!(self.out, "{AUTHENTICATED_HELP}")?;
                return Ok(true);
            }
        };
        self.report(result)?;
        Ok(true)
    }

    /// Follow a running claim until the session leaves the claim phase.
    ///
    /// `cancel` stops the claim. Any other line is kept for the prompt that
    /// follows, and closed input lets the claim run to the end.
    async fn watch_claim(&mut self) -> io::Result<()> {
        let mut views = self.orchestrator.subscribe();
        let mut progress = self.orchestrator.claim_progress();
        let mut last_shown: Option<ClaimProgress> = None;

        if let Some(rx) = progress.as_mut() {
            let current = *rx.borrow_and_update();
            self.show_progress(current, &mut last_shown)?;
        }

        loop {
            if views.borrow_and_update().phase != AppPhase::ClaimInProgress {
                break;
            }

            tokio::select! {
                changed = async {
                    match progress.as_mut() {
                        Some(rx) => rx.changed().await.map(|()| *rx.borrow_and_update()),
                        None => std::future::pending().await,
                    }
                } => {
                    match changed {
                        Ok(current) => self.show_progress(current, &mut last_shown)?,
                        Err(_) => {
                            if let Some(rx) = progress.take() {
                                let current = *rx.borrow();
                                self.show_progress(current, &mut last_shown)?;
                            }
                        }
                    }
                }
                line = self.read_input(), if !self.input_closed => {
                    match line? {
                        Some(line) if line.trim() == "cancel" => {
                            if let Err(err) = self.orchestrator.cancel_claim().await {
                                self.end_progress_line(&mut last_shown)?;
                                self.out.write_all(render_error(&err).as_bytes())?;
                            }
                        }
                        Some(line) => self.pending.push_back(line),
                        None => {}
                    }
                }
                changed = views.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if let Some(rx) = progress.as_ref() {
            let current = *rx.borrow();
            self.show_progress(current, &mut last_shown)?;
        }
        self.end_progress_line(&mut last_shown)?;

        let view = self.orchestrator.view();
        self.show(&view)?;
        if let Some(err) = &view.last_error {
            self.out.write_all(render_error(err).as_bytes())?;
        }
        self.out.flush()
    }

    fn show_progress(
        &mut self,
        progress: ClaimProgress,
        last_shown: &mut Option<ClaimProgress>,
    ) -> io::Result<()> {
        let unchanged = last_shown.is_some_and(|last| {
            last.phase == progress.phase && last.rounded() == progress.rounded()
        });
        if unchanged {
            return Ok(());
        }
        write!(self.out, "\r{}", render_progress(&progress))?;
        self.out.flush()?;
        *last_shown = Some(progress);
        Ok(())
    }

    fn end_progress_line(&mut self, last_shown: &mut Option<ClaimProgress>) -> io::Result<()> {
        if last_shown.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn report(&mut self, result: Result<SessionView, FlowError>) -> io::Result<()> {
        match result {
            Ok(view) => {
                self.show(&view)?;
                if let Some(notice) = &view.last_error {
                    self.out.write_all(render_error(notice).as_bytes())?;
                }
            }
            Err(err) => self.out.write_all(render_error(&err).as_bytes())?,
        }
        self.out.flush()
    }

    fn show(&mut self, view: &SessionView) -> io::Result<()> {
        self.shown_phase = Some(view.phase);
        self.out.write_all(render_view(view).as_bytes())
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.next_line().await
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }
        self.read_input().await
    }

    async fn read_input(&mut self) -> io::Result<Option<String>> {
        if self.input_closed {
            return Ok(None);
        }
        let line = self.lines.next_line().await?;
        if line.is_none() {
            self.input_closed = true;
        }
        Ok(line)
    }
}
