use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "picshade", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shade a frame with a tiled picture and write it as a PNG.
    Tile(TileArgs),
    /// Serialize a picture shader, read it back and compare.
    Roundtrip(RoundtripArgs),
}

#[derive(Parser, Debug)]
struct TileArgs {
    /// Input picture JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Horizontal tile mode.
    #[arg(long, value_enum, default_value_t = TileChoice::Repeat)]
    tmx: TileChoice,

    /// Vertical tile mode.
    #[arg(long, value_enum, default_value_t = TileChoice::Repeat)]
    tmy: TileChoice,

    /// Uniform scale applied to the picture.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Rotation in degrees, applied after scaling.
    #[arg(long, default_value_t = 0.0)]
    rotate: f64,

    /// Texel filter.
    #[arg(long, value_enum, default_value_t = FilterChoice::Nearest)]
    filter: FilterChoice,

    /// Paint alpha.
    #[arg(long, default_value_t = 255)]
    alpha: u8,

    /// Shade rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when `--parallel` is set.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RoundtripArgs {
    /// Input picture JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Horizontal tile mode.
    #[arg(long, value_enum, default_value_t = TileChoice::Repeat)]
    tmx: TileChoice,

    /// Vertical tile mode.
    #[arg(long, value_enum, default_value_t = TileChoice::Repeat)]
    tmy: TileChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TileChoice {
    Clamp,
    Repeat,
    Mirror,
}

impl From<TileChoice> for picshade::TileMode {
    fn from(v: TileChoice) -> Self {
        match v {
            TileChoice::Clamp => Self::Clamp,
            TileChoice::Repeat => Self::Repeat,
            TileChoice::Mirror => Self::Mirror,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Bilinear,
}

impl From<FilterChoice> for picshade::FilterQuality {
    fn from(v: FilterChoice) -> Self {
        match v {
            FilterChoice::Nearest => Self::Nearest,
            FilterChoice::Bilinear => Self::Bilinear,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Tile(args) => cmd_tile(args),
        Command::Roundtrip(args) => cmd_roundtrip(args),
    }
}

fn read_picture_json(path: &Path) -> anyhow::Result<Arc<picshade::Picture>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("open picture '{}'", path.display()))?;
    let picture = picshade::Picture::from_json(&bytes)
        .with_context(|| format!("parse picture '{}'", path.display()))?;
    Ok(Arc::new(picture))
}

fn make_shader(
    path: &Path,
    tmx: TileChoice,
    tmy: TileChoice,
) -> anyhow::Result<picshade::PictureShader> {
    let picture = read_picture_json(path)?;
    let (w, h) = (picture.width(), picture.height());
    picshade::PictureShader::create(Some(picture), tmx.into(), tmy.into())
        .with_context(|| format!("picture '{}' is empty ({w}x{h})", path.display()))
}

fn cmd_tile(args: TileArgs) -> anyhow::Result<()> {
    let opts = picshade::RasterOpts::from_env()?;
    let shader = make_shader(&args.in_path, args.tmx, args.tmy)?.with_raster_opts(opts);

    let matrix = picshade::Affine::rotate(args.rotate.to_radians())
        * picshade::Affine::scale(args.scale);
    let rec = picshade::ContextRec::new(matrix)
        .with_paint_alpha(args.alpha)
        .with_filter(args.filter.into());
    let threading = picshade::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
        ..picshade::RenderThreading::default()
    };

    let frame = picshade::shade_frame(&shader, &rec, args.width, args.height, &threading)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.save_png(&args.out)?;

    let stats = shader.cache_stats();
    eprintln!(
        "wrote {} (tile rasterizations: {}, cache hits: {})",
        args.out.display(),
        stats.rasterizations,
        stats.hits
    );
    Ok(())
}

fn cmd_roundtrip(args: RoundtripArgs) -> anyhow::Result<()> {
    let shader = make_shader(&args.in_path, args.tmx, args.tmy)?;
    let bytes = picshade::serialize_shader(&shader)?;
    let back = picshade::deserialize_shader(&bytes)?;
    let again = picshade::serialize_shader(back.as_ref())?;
    if again != bytes {
        anyhow::bail!(
            "shader changed across serialization ({} vs {} bytes)",
            bytes.len(),
            again.len()
        );
    }
    println!("{shader}");
    println!("roundtrip ok: {} bytes", bytes.len());
    Ok(())
}
