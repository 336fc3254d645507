//! Interactive wizard front end.

use anyhow::{Context, Result};
use colored::Colorize;
use medcheck_application::{SessionRecorder, StepInput, SymptomDraft, WizardEngine};
use medcheck_core::config::{CheckerConfig, RecorderMode};
use medcheck_core::session::{SessionRecordRepository, SessionState};
use medcheck_core::{CheckerError, WizardStep};
use medcheck_infrastructure::{ConfigService, JsonlSessionRecordRepository};
use medcheck_interaction::{HttpReasoningClient, HttpSessionRecordRepository};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use serde_json::Value;
use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

const COMMANDS: [&str; 3] = ["/back", "/quit", "/restart"];

/// Completion and hints for the wizard's slash commands.
struct WizardHelper;

impl Helper for WizardHelper {}

impl Completer for WizardHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for WizardHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for WizardHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for WizardHelper {}

type WizardEditor = Editor<WizardHelper, DefaultHistory>;

enum Prompted {
    Line(String),
    /// A slash command was handled; re-render the current step.
    Handled,
    Quit,
}

pub async fn run(service: &ConfigService, config: &CheckerConfig) -> Result<()> {
    let client = HttpReasoningClient::from_config(&config.backend)
        .context("Failed to create reasoning client")?;
    let mut engine = WizardEngine::new(Arc::new(client))
        .with_request_timeout(config.backend.request_timeout());
    if let Some(recorder) = build_recorder(service, config)? {
        engine = engine.with_recorder(recorder);
    }

    let mut rl: WizardEditor = Editor::new()?;
    rl.set_helper(Some(WizardHelper));

    println!("{}", "=== Symptom Checker ===".bright_magenta().bold());
    println!(
        "{}",
        "This tool does not replace professional medical advice.".yellow()
    );
    println!(
        "{}",
        "Type '/back' to go back, '/restart' to start over, or '/quit' to exit.".bright_black()
    );
    tracing::info!(backend = %config.backend.base_url, "Symptom checker started");

    let mut draft = SymptomDraft::new();
    loop {
        let session = engine.inspect(|session, _| session.clone())?;
        let step = engine.current_step()?;

        let input = match step {
            WizardStep::Intake => {
                heading(1, "About you");
                let age = match prompt(&mut rl, &engine, "Age: ").await? {
                    Prompted::Line(line) => line,
                    Prompted::Handled => continue,
                    Prompted::Quit => break,
                };
                let sex = match prompt(&mut rl, &engine, "Sex (male/female/other): ").await? {
                    Prompted::Line(line) => line,
                    Prompted::Handled => continue,
                    Prompted::Quit => break,
                };
                StepInput::Intake { age, sex }
            }
            WizardStep::Analysis => {
                heading(2, "Your symptoms");
                if !session.symptoms().is_empty() {
                    println!(
                        "{}",
                        format!("Press Enter to keep: {}", session.symptoms()).bright_black()
                    );
                }
                match prompt(&mut rl, &engine, "Describe your symptoms: ").await? {
                    Prompted::Line(line) if line.is_empty() && !session.symptoms().is_empty() => {
                        StepInput::Continue
                    }
                    Prompted::Line(line) => {
                        draft.type_text(line);
                        draft.to_input()
                    }
                    Prompted::Handled => continue,
                    Prompted::Quit => break,
                }
            }
            WizardStep::ConditionSelection => {
                heading(3, "Possible conditions");
                print_conditions(&session);
                match prompt(&mut rl, &engine, "Choose a condition (number or name): ").await? {
                    Prompted::Line(line) if line.is_empty() => StepInput::Continue,
                    Prompted::Line(line) => StepInput::Select(resolve_choice(&session, &line)),
                    Prompted::Handled => continue,
                    Prompted::Quit => break,
                }
            }
            WizardStep::DetailsAndTreatment => {
                heading(4, "Condition details");
                print_details(&session);
                match prompt(&mut rl, &engine, "Press Enter to see treatment options: ").await? {
                    Prompted::Line(_) => StepInput::Continue,
                    Prompted::Handled => continue,
                    Prompted::Quit => break,
                }
            }
            WizardStep::Complete => {
                print_treatments(&session);
                if let Some(receipt) = engine.wait_for_recording().await {
                    println!("{}", receipt.message.bright_black());
                }
                match prompt(&mut rl, &engine, "Start a new session? [y/N]: ").await? {
                    Prompted::Line(line) if line.eq_ignore_ascii_case("y") => {
                        engine.restart().await;
                        draft = SymptomDraft::new();
                        continue;
                    }
                    Prompted::Handled => continue,
                    _ => break,
                }
            }
        };

        if let Err(e) = engine.advance(input).await {
            print_error(&e);
        }
    }

    engine.wait_for_recording().await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

fn build_recorder(service: &ConfigService, config: &CheckerConfig) -> Result<Option<SessionRecorder>> {
    let repository: Arc<dyn SessionRecordRepository> = match config.recorder.mode {
        RecorderMode::Disabled => return Ok(None),
        RecorderMode::Remote => Arc::new(
            HttpSessionRecordRepository::from_config(&config.backend)
                .context("Failed to create session recorder")?,
        ),
        RecorderMode::File => {
            let path = service
                .records_file(config)
                .context("Failed to resolve record file")?;
            Arc::new(JsonlSessionRecordRepository::new(path))
        }
    };
    Ok(Some(SessionRecorder::new(repository)))
}

/// Reads one line, handling slash commands against the engine.
async fn prompt(rl: &mut WizardEditor, engine: &WizardEngine, text: &str) -> Result<Prompted> {
    let line = match rl.readline(text) {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            engine.abandon();
            return Ok(Prompted::Quit);
        }
        Err(e) => return Err(e).context("Failed to read input"),
    };
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        let _ = rl.add_history_entry(trimmed);
    }

    match trimmed {
        "/quit" | "/exit" => {
            engine.abandon();
            Ok(Prompted::Quit)
        }
        "/back" => {
            if let Err(e) = engine.retreat() {
                print_error(&e);
            }
            Ok(Prompted::Handled)
        }
        "/restart" => {
            engine.restart().await;
            println!("{}", "Started a new session.".bright_green());
            Ok(Prompted::Handled)
        }
        _ => Ok(Prompted::Line(trimmed.to_string())),
    }
}

/// Maps a list number onto the condition's id; anything else is passed through.
fn resolve_choice(session: &SessionState, choice: &str) -> String {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| session.conditions().get(index))
        .map(|c| c.id.clone())
        .unwrap_or_else(|| choice.to_string())
}

fn heading(number: usize, title: &str) {
    println!();
    println!("{}", format!("Step {number} of 4: {title}").bright_magenta().bold());
}

fn print_conditions(session: &SessionState) {
    let selected = session.selected_condition();
    for (index, condition) in session.conditions().iter().enumerate() {
        let marker = if selected == Some(condition) { "*" } else { " " };
        println!(
            "{marker} {}. {} {}",
            index + 1,
            condition.name.bold(),
            format!("[{}]", condition.probability).cyan()
        );
        if !condition.description.is_empty() {
            println!("     {}", condition.description.bright_black());
        }
    }
    if selected.is_some() {
        println!("{}", "Press Enter to keep the marked condition.".bright_black());
    }
}

fn print_details(session: &SessionState) {
    let (Some(condition), Some(details)) = (session.selected_condition(), session.details()) else {
        return;
    };
    println!("{}", condition.name.bold());
    if !details.overview.is_empty() {
        println!("{}", details.overview);
    }
    if !details.causes.is_empty() {
        println!("{} {}", "Causes:".cyan(), details.causes);
    }
    print_list("Risk factors", &details.risk_factors);
    print_list("Complications", &details.complications);
    print_list("Prevention", &details.prevention);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", format!("{title}:").cyan());
    for item in items {
        println!("  - {item}");
    }
}

fn print_treatments(session: &SessionState) {
    println!();
    println!("{}", "Treatment options".bright_magenta().bold());
    match session.treatments() {
        Some(treatments) => print_json(treatments.as_json(), 0),
        None => println!("{}", "No treatment information was returned.".bright_black()),
    }
    println!(
        "{}",
        "Consult a healthcare professional before starting any treatment.".yellow()
    );
}

/// Prints treatment data, whose shape is owned by the reasoning service.
fn print_json(value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Object(_) | Value::Array(_) => {
                        println!("{indent}{}", format!("{}:", humanize(key)).cyan());
                        print_json(value, depth + 1);
                    }
                    _ => println!("{indent}{} {}", format!("{}:", humanize(key)).cyan(), scalar(value)),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => print_json(item, depth),
                    _ => println!("{indent}- {}", scalar(item)),
                }
            }
        }
        other => println!("{indent}{}", scalar(other)),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `homeCare` -> `Home care`.
fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.extend(ch.to_lowercase());
        } else if ch == '_' {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

fn print_error(error: &CheckerError) {
    let message = match error {
        CheckerError::Validation(message) => message.clone(),
        other => other.to_string(),
    };
    eprintln!("{}", message.red());
    if let Some(redirect) = error.redirect() {
        eprintln!("{}", format!("Returned to the {redirect} step.").yellow());
    }
    if error.is_retryable() {
        eprintln!("{}", "Your input was kept; press Enter to try again.".bright_black());
    }
}
