use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use clef_quest::game::Game;
use clef_quest::gemini::Gemini;
use clef_quest::quiz::{AdvanceOutcome, Feedback, Phase, QuizController, RewardStatus};
use clef_quest::{
    name, resolve_note, staff_svg, staff_text, Clef, EditOutcome, ImageData, ImageEditor,
    LevelCatalog, NoteIndex, NoteName, QuestConfig,
};

mod cli;

use cli::{Cli, Commands};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("clef-quest error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Commands::Levels { clef } => list_levels(clef),
        Commands::Staff { clef, index, svg } => {
            draw_staff(clef, index, svg);
            Ok(())
        }
        Commands::Play { level, seed } => play(level, seed).await,
        Commands::Retouch { image, prompt, out } => retouch(&image, &prompt, out).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CLEF_QUEST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn list_levels(only: Option<Clef>) -> anyhow::Result<()> {
    let catalog = LevelCatalog::load_builtin()?;
    for clef in Clef::ALL.into_iter().filter(|c| only.map_or(true, |o| o == *c)) {
        println!("{} ({clef})", clef.label());
        for level in catalog.for_clef(clef) {
            println!(
                "  {:>2}  {:<12} {:<6}  {:>2} notes  pass {}/{} questions",
                level.id,
                level.short_name(),
                format!("{:?}", level.difficulty),
                level.note_count(),
                level.required_score,
                level.total_questions,
            );
        }
    }
    Ok(())
}

fn draw_staff(clef: Clef, index: NoteIndex, svg: bool) {
    let position = resolve_note(clef, index);
    if svg {
        println!("{}", staff_svg(clef, &position));
        return;
    }
    print!("{}", staff_text(&position));
    println!(
        "{clef} clef, index {index}: {} (steps {}, {} ledger line(s), stem {:?})",
        name(index),
        position.steps,
        position.ledger_lines.len(),
        position.stem,
    );
}

async fn play(level_id: u32, seed: Option<u64>) -> anyhow::Result<()> {
    let config = QuestConfig::load_with_dotenv()?;
    let catalog = LevelCatalog::load_builtin()?;
    let rewards = Gemini::from_config(&config.gemini);
    let editor = rewards.clone();
    let quiz = match seed {
        Some(seed) => QuizController::seeded(seed),
        None => QuizController::from_entropy(),
    };
    let mut game = Game::from_config(catalog, quiz, rewards, &config.game);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    game.start_level(level_id)?;
    loop {
        if let Some(level) = game.current_level() {
            println!("\n== {} ==\n{}", level.name, level.description);
        }
        if !play_session(&mut game, &mut input).await? {
            game.return_to_menu();
            return Ok(());
        }
        show_result(&mut game, &editor, &mut input).await?;

        let passed = game.quiz().result().is_some_and(|r| r.passed);
        if passed || !ask(&mut input, "Try again? [y/N] ").await? {
            game.return_to_menu();
            return Ok(());
        }
        game.retry()?;
    }
}

/// Ask questions until the level completes. `false` if the player quit.
async fn play_session<R, P>(game: &mut Game<R, P>, input: &mut Input) -> anyhow::Result<bool>
where
    R: clef_quest::RewardProvider,
    P: clef_quest::quiz::NotePicker,
{
    while game.quiz().phase() == Phase::AwaitingAnswer {
        let (Some(session), Some(position)) = (game.quiz().session(), game.current_position())
        else {
            break;
        };
        println!(
            "\nQuestion {}/{}   score {}   streak {}",
            session.questions_answered + 1,
            session.level.total_questions,
            session.score,
            session.streak,
        );
        print!("{}", staff_text(&position));

        let Some(line) = prompt(input, "Note (C D E F G A B, q to quit): ").await? else {
            return Ok(false);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(false);
        }
        let answer: NoteName = match line.parse() {
            Ok(answer) => answer,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let Some(submission) = game.submit(answer) else {
            continue;
        };
        match submission.feedback {
            Feedback::Correct => println!("Correct! +{}", submission.points),
            Feedback::Wrong => println!("Not quite, that was {}.", submission.correct_name),
        }
        if let AdvanceOutcome::Stale = game.finish_feedback(submission.ticket).await {
            break;
        }
    }
    Ok(true)
}

async fn show_result<R, P>(
    game: &mut Game<R, P>,
    editor: &Gemini,
    input: &mut Input,
) -> anyhow::Result<()>
where
    R: clef_quest::RewardProvider,
    P: clef_quest::quiz::NotePicker,
{
    let Some(result) = game.quiz().result().cloned() else {
        return Ok(());
    };
    println!(
        "\nFinal score {} (needed {})",
        result.final_score, result.required_score
    );
    if !result.passed {
        println!("Level failed. Keep practising!");
        return Ok(());
    }

    println!("Level passed! Preparing your reward...");
    let Some(doll) = game.claim_reward().await else {
        return Ok(());
    };
    println!("New doll unlocked: {}", doll.name);
    println!("  {}", doll.description);
    println!("  {}", doll.image_url);
    if let Some(RewardStatus::Unlocked { doll_id, .. }) = game.quiz().result().map(|r| &r.reward) {
        tracing::debug!(doll = %doll_id, dolls = game.collection().len(), "collection updated");
    }
    offer_retouch(game, editor, input, &doll.id).await
}

/// Offer magic edits of a doll until one is applied or the player skips.
async fn offer_retouch<R, P>(
    game: &mut Game<R, P>,
    editor: &Gemini,
    input: &mut Input,
    doll_id: &str,
) -> anyhow::Result<()>
where
    R: clef_quest::RewardProvider,
    P: clef_quest::quiz::NotePicker,
{
    loop {
        let Some(path) = prompt(input, "Picture for a magic edit (blank to skip): ").await? else {
            return Ok(());
        };
        if path.is_empty() {
            return Ok(());
        }
        let source = match read_image(Path::new(&path)).await {
            Ok(source) => source,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };
        let Some(change) = prompt(input, "What should change? ").await? else {
            return Ok(());
        };

        match game.retouch_doll(editor, doll_id, &source, &change).await {
            EditOutcome::Applied => {
                println!("Magic edit applied.");
                return Ok(());
            }
            EditOutcome::Retry => println!("{RETRY_HINT}"),
            EditOutcome::UnknownDoll => return Ok(()),
        }
    }
}

async fn prompt(input: &mut Input, text: &str) -> anyhow::Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    let line = input.next_line().await.context("failed to read from stdin")?;
    Ok(line.map(|l| l.trim().to_string()))
}

async fn ask(input: &mut Input, question: &str) -> anyhow::Result<bool> {
    let answer = prompt(input, question).await?.unwrap_or_default();
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

const RETRY_HINT: &str = "The magic edit did not work this time. Try again or rephrase the prompt.";

async fn read_image(path: &Path) -> anyhow::Result<ImageData> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    Ok(ImageData::new(ImageData::mime_type_for_extension(extension), bytes))
}

async fn retouch(image: &Path, prompt: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = QuestConfig::load_with_dotenv()?;
    let editor = Gemini::from_config(&config.gemini);
    if !editor.is_online() {
        tracing::info!("no Gemini API key configured; image edits are unavailable");
    }
    match edit_file(&editor, image, prompt, out).await? {
        Some(out) => eprintln!("Wrote edited picture to {}", out.display()),
        None => eprintln!("{RETRY_HINT}"),
    }
    Ok(())
}

/// Edit a picture file. `None` when the editor produced nothing.
async fn edit_file<E: ImageEditor>(
    editor: &E,
    image: &Path,
    prompt: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    let source = read_image(image).await?;
    let Some(edited) = editor.request_image_edit(&source, prompt).await else {
        return Ok(None);
    };

    let extension = image.extension().and_then(|e| e.to_str()).unwrap_or("png");
    let out = out.unwrap_or_else(|| image.with_extension(format!("edited.{extension}")));
    tokio::fs::write(&out, &edited.bytes)
        .await
        .with_context(|| format!("failed to write '{}'", out.display()))?;
    Ok(Some(out))
}
