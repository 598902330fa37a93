use clap::{Parser, Subcommand};
use funnel_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "funnel")]
#[command(about = "Guided protocol selection funnel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog/quiz content file (overrides config)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the funnel interactively (default)
    Run,

    /// Apply scripted intents and print the resulting state
    Replay {
        /// Intents in order: known, unknown, select:<id>, confirm, back,
        /// answer:<id>, accept, explore
        #[arg(required = true)]
        intents: Vec<String>,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,

        /// Report rejected intents and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// List the medication catalog
    Catalog,

    /// List the diagnostic quiz
    Quiz,

    /// Check catalog/quiz integrity
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    funnel_core::logging::init_with_level(level);

    match cli.command {
        Some(Commands::Run) | None => cmd_run(load_content(&cli.content, &config)?),
        Some(Commands::Replay {
            intents,
            json,
            keep_going,
        }) => cmd_replay(load_content(&cli.content, &config)?, &intents, json, keep_going),
        Some(Commands::Catalog) => {
            let content = load_content(&cli.content, &config)?;
            display_catalog(&content.catalog, None);
            Ok(())
        }
        Some(Commands::Quiz) => {
            display_quiz(&*load_content(&cli.content, &config)?);
            Ok(())
        }
        Some(Commands::Validate) => cmd_validate(cli.content.as_ref(), &config),
    }
}

/// Content from `--content` if given, otherwise whatever the config points at
fn load_content(path: &Option<PathBuf>, config: &Config) -> Result<Arc<FunnelContent>> {
    match path {
        Some(path) => Ok(Arc::new(FunnelContent::load_from(path)?)),
        None => config.load_content(),
    }
}

fn cmd_run(content: Arc<FunnelContent>) -> Result<()> {
    let mut session = FunnelSession::new(Arc::clone(&content));

    // Re-render whenever the session accepts an intent
    let view = Arc::clone(&content);
    session.subscribe(move |change: &StateChange| render(&view, &change.current));

    render(&content, session.state());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.state().is_terminal() {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                println!("Session ended on the {} screen.", session.state().screen);
                return Ok(());
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            println!("Session ended on the {} screen.", session.state().screen);
            return Ok(());
        }

        let intent = match parse_input(&session, input) {
            Ok(intent) => intent,
            Err(e) => {
                println!("  ! {}", e);
                continue;
            }
        };

        if let Err(e) = session.dispatch(intent) {
            if e.is_rejection() {
                println!("  ! {}", e);
            } else {
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Interpret a line of input on the current screen
///
/// The full intent words always work; each screen also accepts shortcuts
/// (y/n on the decision screen, a bare medication id in the catalog, an
/// option id or number in the quiz).
fn parse_input(session: &FunnelSession, input: &str) -> Result<Intent> {
    if let Ok(intent) = input.parse::<Intent>() {
        return Ok(intent);
    }

    let state = session.state();
    let shortcut = match state.screen {
        Screen::Decision => match input.to_lowercase().as_str() {
            "y" | "yes" => Some(Intent::ChooseKnown),
            "n" | "no" => Some(Intent::ChooseUnknown),
            _ => None,
        },
        Screen::Catalog => Some(Intent::SelectMedication(input.to_string())),
        Screen::Quiz => session.current_question().map(|question| {
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => {
                    Intent::Answer(question.options[n - 1].id.clone())
                }
                _ => Intent::Answer(input.to_string()),
            }
        }),
        Screen::Recommendation | Screen::Intake => None,
    };

    shortcut.ok_or_else(|| Error::Parse(format!("unrecognized input '{}'", input)))
}

fn cmd_replay(
    content: Arc<FunnelContent>,
    intents: &[String],
    json: bool,
    keep_going: bool,
) -> Result<()> {
    let mut session = FunnelSession::new(content);

    for raw in intents {
        let intent: Intent = raw.parse()?;
        match session.dispatch(intent) {
            Ok(_) => {}
            Err(e) if keep_going && e.is_rejection() => {
                eprintln!("Rejected '{}': {}", raw, e);
            }
            Err(e) => return Err(e),
        }
    }

    let state = session.state();
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    println!("screen: {}", state.screen);
    println!(
        "selected: {}",
        state.selected_medication_id.as_deref().unwrap_or("-")
    );
    if state.screen == Screen::Quiz {
        println!("question: {}/{}", state.quiz_index + 1, session.quiz().len());
    }
    println!("answers: {}", state.answers.join(", "));
    Ok(())
}

fn cmd_validate(path: Option<&PathBuf>, config: &Config) -> Result<()> {
    let (content, source) = match path.or(config.content.path.as_ref()) {
        Some(path) => (FunnelContent::read_from(path)?, path.display().to_string()),
        None => (build_default_content(), "embedded content".to_string()),
    };

    let errors = content.validate();
    if !errors.is_empty() {
        eprintln!("Content validation errors in {}:", source);
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::ContentValidation(format!("{} problem(s)", errors.len())));
    }

    println!(
        "✓ {} is valid: {} medications in {} categories, {} questions",
        source,
        content.catalog.len(),
        content.catalog.categories.len(),
        content.quiz.len()
    );
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn render(content: &FunnelContent, state: &FunnelState) {
    println!();
    match state.screen {
        Screen::Decision => {
            println!("PRECISION PROTOCOLS");
            println!("Do you know what you want?");
            println!();
            println!("  [y] Yes - I know my specific medication");
            println!("  [n] No  - Run the Diagnostic Quiz");
        }
        Screen::Catalog => {
            println!("MEDICATION LIBRARY");
            display_catalog(&content.catalog, state.selected_medication_id.as_deref());
            println!("Type a medication id to select it, 'confirm' to begin intake, 'back' to return.");
        }
        Screen::Quiz => {
            if let Some(question) = content.quiz.question(state.quiz_index) {
                println!("METRIC {:02} / {:02}", state.quiz_index + 1, content.quiz.len());
                println!("{}", question.title.to_uppercase());
                println!("{}", question.prompt);
                println!();
                for (i, option) in question.options.iter().enumerate() {
                    println!("  [{}] {} ({})", i + 1, option.label, option.id);
                    println!("      {}", option.sublabel);
                }
            }
        }
        Screen::Recommendation => {
            println!("YOUR OPTIMIZATION FOUNDRY");
            println!();
            println!("  Recommended protocol: {}", selected_name(content, state));
            println!();
            println!("  'accept' to accept the protocol and begin intake");
            println!("  'explore' to explore all medications");
        }
        Screen::Intake => {
            println!("CLINICAL VERIFICATION");
            println!("  Protocol: {}", selected_name(content, state));
            println!();
            println!("  01 Personal Identification");
            println!("  02 Medical History Sequence");
        }
    }
}

fn selected_name<'a>(content: &'a FunnelContent, state: &FunnelState) -> &'a str {
    state
        .selected_medication_id
        .as_deref()
        .and_then(|id| content.catalog.find(id))
        .map(|m| m.name.as_str())
        .unwrap_or("-")
}

fn display_catalog(catalog: &Catalog, selected: Option<&str>) {
    for category in &catalog.categories {
        println!();
        println!("── {} ──", category.name);
        for med in &category.medications {
            let marker = if selected == Some(med.id.as_str()) { "*" } else { " " };
            println!("{} {:<12} {} [{}]", marker, med.id, med.name, med.tag);
            println!("  {:<12} {}", "", med.description);
        }
    }
    println!();
}

fn display_quiz(content: &FunnelContent) {
    for step in content.quiz.steps() {
        let question = step.question();
        println!();
        println!("{} - {}", question.id, question.title);
        println!("  {}", question.prompt);
        for option in &question.options {
            println!(
                "  {:<12} {} -> {}",
                option.id, option.label, option.recommended_medication_id
            );
        }
    }
    println!();
}
