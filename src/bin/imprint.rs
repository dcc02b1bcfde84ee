use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "imprint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one PNG per CSV row into a directory.
    Render(RenderArgs),
    /// Print diagnostics about placeholder fonts (family name + SHA-256 of font bytes).
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Base image (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Placeholder JSON array.
    #[arg(long)]
    placeholders: PathBuf,

    /// CSV data with a header row.
    #[arg(long)]
    data: PathBuf,

    /// Output directory; receives out0.png, out1.png, ...
    #[arg(long)]
    out: PathBuf,

    /// Avatar gender for placeholders without `avatarGender`.
    #[arg(long, value_enum, default_value_t = GenderChoice::Male)]
    avatar_gender: GenderChoice,

    /// Seed for reproducible avatars.
    #[arg(long)]
    avatar_seed: Option<u64>,

    /// Font file used when a placeholder has no usable font.
    #[arg(long)]
    default_font: Option<PathBuf>,

    /// Fraction of the text height lifted off the placeholder's bottom edge.
    #[arg(long, default_value_t = imprint::BASELINE_ADJUST)]
    baseline_adjust: f64,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Placeholder JSON array.
    #[arg(long)]
    placeholders: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GenderChoice {
    Male,
    Female,
}

impl From<GenderChoice> for imprint::AvatarGender {
    fn from(value: GenderChoice) -> Self {
        match value {
            GenderChoice::Male => Self::Male,
            GenderChoice::Female => Self::Female,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn read_bytes(path: &Path, what: &str) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let image = read_bytes(&args.image, "image")?;
    let placeholders = read_text(&args.placeholders, "placeholders")?;
    let data = read_text(&args.data, "data")?;

    let mut opts = imprint::BatchOpts::default()
        .with_avatar_gender(args.avatar_gender.into())
        .with_baseline_adjust(args.baseline_adjust);
    if let Some(seed) = args.avatar_seed {
        opts = opts.with_avatar_seed(seed);
    }
    if let Some(path) = &args.default_font {
        opts = opts.with_default_font(read_bytes(path, "default font")?);
    }

    let mut batch = imprint::BatchRenderer::from_encoded(&image, &placeholders, &data, opts)?;
    let mut sink = imprint::PngDirSink::new(&args.out);
    let report = batch.run(&mut sink)?;

    if report.skipped_rows > 0 || report.degraded_placeholders > 0 {
        eprintln!(
            "{} rows skipped, {} placeholders degraded",
            report.skipped_rows, report.degraded_placeholders
        );
    }
    println!("Success, saved in {}", args.out.display());
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let json = read_text(&args.placeholders, "placeholders")?;
    let placeholders = imprint::parse_placeholders(&json)?;
    let mut engine = imprint::TextLayoutEngine::new();

    println!("placeholder font diagnostics:");
    for p in &placeholders {
        println!("  {} ({}):", p.id, p.csv_key);
        println!("    font:        {}", p.font_name);
        if p.font_content.trim().is_empty() {
            println!("    source:      default face");
            continue;
        }
        match engine.load_face_base64(&p.font_content) {
            Ok(face) => {
                println!("    family:      {}", face.family());
                println!("    sha256:      {}", sha256_hex(face.bytes()));
            }
            Err(err) => println!("    error:       {err}"),
        }
    }

    match imprint::system_default_face_bytes() {
        Some(bytes) => {
            let face = engine.load_face(bytes).context("load system default face")?;
            println!("default face:");
            println!("  family:      {}", face.family());
            println!("  sha256:      {}", sha256_hex(face.bytes()));
        }
        None => println!("default face: none installed"),
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
