use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use text_humanizer::session::{
    random_sample, LanguageStyle, Mode, Settings, Tone, EXAMPLE_TEXT, QUICK_TEST_TEXT,
};
use text_humanizer::{
    Humanizer, HumanizerError, Hyperparameters, Result, Session, SplitterKind,
};

#[derive(Parser)]
#[command(
    name = "humanize",
    about = "Rewrite formal, machine-sounding prose into casual text",
    version
)]
struct Cli {
    /// File paths to rewrite (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// Seed the random generator for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with pipeline hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentence splitter: unicode or punctuation
    #[arg(long)]
    splitter: Option<SplitterKind>,

    /// Directory containing abbreviations.txt for the unicode splitter
    #[arg(long)]
    resource_dir: Option<PathBuf>,

    /// Number of rewrite passes over each input
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    #[arg(long, value_enum, default_value_t)]
    mode: Mode,

    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(1..=10))]
    intensity: u8,

    #[arg(long, value_enum, default_value_t)]
    style: LanguageStyle,

    #[arg(long, value_enum, default_value_t)]
    tone: Tone,

    /// Rewrite the built-in example text instead of reading files or stdin
    #[arg(long, conflicts_with = "files")]
    example: bool,

    /// Print a JSON report (texts, statistics, simulated score) per input
    #[arg(long)]
    json: bool,

    /// Start an interactive shell; each line is rewritten and recorded
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let humanizer = Arc::new(build_humanizer(cli)?);
    let settings = Settings {
        mode: cli.mode,
        intensity: cli.intensity,
        language_style: cli.style,
        tone: cli.tone,
    };
    let mut session = Session::new(humanizer, settings)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if cli.interactive {
        return run_shell(&mut session, &mut rng);
    }

    if cli.example {
        rewrite_one(&mut session, EXAMPLE_TEXT, cli, &mut rng)?;
    } else if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| HumanizerError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        rewrite_one(&mut session, &input, cli, &mut rng)?;
    } else {
        for path in &cli.files {
            let text = read_file(path)?;
            rewrite_one(&mut session, &text, cli, &mut rng)?;
        }
    }
    Ok(())
}

fn build_humanizer(cli: &Cli) -> Result<Humanizer> {
    let mut hp = match &cli.config {
        Some(path) => Hyperparameters::load_from(path)?,
        None => Hyperparameters::default(),
    };
    if let Some(splitter) = cli.splitter {
        hp.splitter = splitter;
    }
    if let Some(dir) = &cli.resource_dir {
        hp.resource_dir = Some(dir.clone());
    }
    Humanizer::new(hp)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| HumanizerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn rewrite_one(session: &mut Session, text: &str, cli: &Cli, rng: &mut StdRng) -> Result<()> {
    if text.trim().is_empty() {
        // blank input passes through untouched
        print!("{text}");
        return Ok(());
    }
    session.process(text, rng)?;
    if cli.passes > 1 {
        session.refine(cli.passes as usize - 1, rng)?;
    }
    if cli.json {
        println!("{}", session.report_json()?);
    } else if let Some(result) = session.result() {
        println!("{result}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive shell
// ---------------------------------------------------------------------------

const HELP: &str = "\
Type text to rewrite it. Commands:
  :example          rewrite the built-in example text
  :random           rewrite a randomly picked sample text
  :quick            rewrite a one-line test sentence (not recorded)
  :reprocess        rewrite the last input again
  :enhance          run the current result through two more passes
  :stats            word/char counts and simulated detection score
  :analyze          quick labels for the current result
  :history          list transcript entries
  :summary          processed count and average simulated score
  :settings         print the session settings as JSON
  :export <path>    write the current result as a text file
  :report <path>    write the current result as a JSON report
  :new              forget the current text
  :clear            clear the transcript
  :help             show this help
  :quit             leave the shell";

fn run_shell(session: &mut Session, rng: &mut StdRng) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    println!("{HELP}");
    println!("(detection scores are simulated random numbers, not measurements)");
    loop {
        print!("> ");
        let _ = stdout.flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match shell_command(session, line, rng) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Quit) => break,
            // report and keep the shell alive
            Err(e) if e.is_recoverable() => eprintln!("{e}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

enum ShellFlow {
    Continue,
    Quit,
}

fn shell_command(session: &mut Session, line: &str, rng: &mut StdRng) -> Result<ShellFlow> {
    let Some(command) = line.strip_prefix(':') else {
        print_entry(session, line, rng)?;
        return Ok(ShellFlow::Continue);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "example" => print_entry(session, EXAMPLE_TEXT, rng)?,
        "random" => {
            let sample = random_sample(rng);
            println!("{sample}\n");
            print_entry(session, sample, rng)?;
        }
        "quick" => println!(
            "in:  {}\nout: {}",
            QUICK_TEST_TEXT,
            session.quick_test(rng)
        ),
        "reprocess" => println!("{}", session.reprocess(rng)?),
        "enhance" => println!("{}", session.enhance(rng)?),
        "stats" => {
            let stats = session.stats().ok_or(HumanizerError::NothingProcessed)?;
            println!(
                "original words: {}\nhumanized words: {}\noriginal chars: {}\nhumanized chars: {}\nword change: {:.0}%",
                stats.original_words,
                stats.humanized_words,
                stats.original_chars,
                stats.humanized_chars,
                stats.change_percentage
            );
            if let Some(score) = session.detection_score() {
                println!("simulated detection: {score}%");
            }
            println!("mode: {}", session.settings().mode);
        }
        "analyze" => {
            let analysis = session.analysis().ok_or(HumanizerError::NothingProcessed)?;
            println!(
                "readability: {}\ncomplexity: {}\nhuman-likeness: {}",
                analysis.readability, analysis.complexity, analysis.human_likeness
            );
        }
        "history" => {
            if session.history().is_empty() {
                println!("no history yet");
            }
            for (i, entry) in session.history().iter().enumerate() {
                println!(
                    "#{} {} | mode: {} | detection: {}%\n  in:  {}\n  out: {}",
                    i + 1,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.settings.mode,
                    entry.detection_score,
                    preview(&entry.input),
                    preview(&entry.output)
                );
            }
        }
        "summary" => {
            let summary = session.summary();
            println!(
                "processed: {}\naverage simulated detection: {:.1}%",
                summary.processed, summary.average_detection
            );
        }
        "settings" => println!("{}", session.settings().to_json()?),
        "export" => session.write_text(Path::new(required(arg, "export")?))?,
        "report" => session.write_report(Path::new(required(arg, "report")?))?,
        "new" => session.new_text(),
        "clear" => session.clear_history(),
        "help" => println!("{HELP}"),
        "quit" | "exit" => return Ok(ShellFlow::Quit),
        other => {
            return Err(HumanizerError::Unexpected(format!(
                "unknown command `:{other}` (try :help)"
            )))
        }
    }
    Ok(ShellFlow::Continue)
}

fn print_entry(session: &mut Session, input: &str, rng: &mut StdRng) -> Result<()> {
    let entry = session.process(input, rng)?;
    println!("{}", entry.output);
    println!("[simulated detection: {}%]", entry.detection_score);
    Ok(())
}

fn required<'a>(arg: &'a str, command: &str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(HumanizerError::InvalidConfig(format!(
            ":{command} needs a file path"
        )))
    } else {
        Ok(arg)
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 100;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
