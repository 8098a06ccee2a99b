use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use perfview::{
    CompareSlider, CompareView, Compositor, ImageSlot, MaskCache, MaskStrategy, PatternGeometry,
    ProductCatalog, SceneImages, Segment, Tuning, ViewOptions, ViewingContext, ViewportMetrics,
};

#[derive(Parser, Debug)]
#[command(name = "perfview", version)]
struct Cli {
    /// Product catalog JSON (defaults to the built-in products).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Tuning JSON (missing fields take defaults).
    #[arg(long, global = true)]
    tuning: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog products.
    Products(ProductsArgs),
    /// Print resolved pixel geometry for every product under a viewing context.
    Geometry(ViewArgs),
    /// Validate the catalog and tuning files.
    Check,
    /// Rasterize one product's mask and report its statistics.
    Mask(MaskArgs),
    /// Composite a comparison and print its layout, layers and legend as JSON.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct ProductsArgs {
    /// Emit JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
struct ViewArgs {
    /// Viewer side.
    #[arg(long, value_enum, default_value_t = SideArg::Inside)]
    side: SideArg,

    /// Lighting mode.
    #[arg(long, value_enum, default_value_t = LightingArg::Day)]
    lighting: LightingArg,

    /// Viewing distance in metres.
    #[arg(long, default_value_t = 3.0)]
    distance: f64,

    /// Screen pixels per millimetre at the reference distance.
    #[arg(long, default_value_t = 4.0)]
    px_per_mm: f64,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Product id.
    #[arg(long)]
    product: String,

    /// Rasterizer strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Tile)]
    strategy: StrategyArg,

    /// Device pixel ratio (tile strategy).
    #[arg(long, default_value_t = 1)]
    dpr: u32,

    /// Viewport width (viewport strategy).
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height (viewport strategy).
    #[arg(long, default_value_t = 720)]
    height: u32,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Product ids, one segment each, after the Original segment.
    #[arg(long, value_delimiter = ',', required = true)]
    products: Vec<String>,

    /// Background scene image.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Scene on the viewer's side of the glass (reverse vision).
    #[arg(long)]
    interior: Option<PathBuf>,

    /// Printed artwork.
    #[arg(long)]
    artwork: Option<PathBuf>,

    /// Initial cut positions in percent.
    #[arg(long, value_delimiter = ',')]
    cuts: Option<Vec<f64>>,

    /// Viewport width.
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Viewport height.
    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Rasterizer strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Tile)]
    strategy: StrategyArg,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SideArg {
    Inside,
    Outside,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LightingArg {
    Day,
    Night,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    Tile,
    Viewport,
}

impl ViewArgs {
    fn context(&self) -> ViewingContext {
        ViewingContext {
            side: match self.side {
                SideArg::Inside => perfview::Side::Inside,
                SideArg::Outside => perfview::Side::Outside,
            },
            lighting: match self.lighting {
                LightingArg::Day => perfview::Lighting::Day,
                LightingArg::Night => perfview::Lighting::Night,
            },
            distance_m: self.distance,
            px_per_mm: self.px_per_mm,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let tuning = load_tuning(cli.tuning.as_deref())?;
    match cli.cmd {
        Command::Products(args) => cmd_products(&catalog, args),
        Command::Geometry(args) => cmd_geometry(&catalog, &tuning, &args),
        Command::Check => cmd_check(&catalog, &tuning),
        Command::Mask(args) => cmd_mask(&catalog, &tuning, args),
        Command::Compare(args) => cmd_compare(&catalog, tuning, args),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<ProductCatalog> {
    match path {
        Some(p) => ProductCatalog::load(p)
            .with_context(|| format!("load product catalog '{}'", p.display())),
        None => Ok(ProductCatalog::builtin()),
    }
}

fn load_tuning(path: Option<&Path>) -> anyhow::Result<Tuning> {
    let Some(p) = path else {
        return Ok(Tuning::default());
    };
    let text =
        std::fs::read_to_string(p).with_context(|| format!("read tuning '{}'", p.display()))?;
    Tuning::from_json_str(&text).with_context(|| format!("parse tuning '{}'", p.display()))
}

fn load_image(path: Option<&Path>) -> anyhow::Result<ImageSlot> {
    let Some(p) = path else {
        return Ok(ImageSlot::Missing);
    };
    let bytes = std::fs::read(p).with_context(|| format!("read image '{}'", p.display()))?;
    let img =
        perfview::decode_image(&bytes).with_context(|| format!("decode image '{}'", p.display()))?;
    Ok(ImageSlot::Ready(img))
}

fn cmd_products(catalog: &ProductCatalog, args: ProductsArgs) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }
    for p in &catalog.products {
        let pitch = p.pitch_mm.unwrap_or_else(|| {
            perfview::pitch_mm_from_open_area(p.open_area, p.hole_diameter_mm, p.lattice)
        });
        println!(
            "{:<8} {:<8} oa={:>4.1}% d={:.2}mm pitch={:.2}mm {:?}{}",
            p.id,
            p.label,
            p.open_area * 100.0,
            p.hole_diameter_mm,
            pitch,
            p.lattice,
            if p.enabled_default { "" } else { " (disabled)" }
        );
    }
    Ok(())
}

fn cmd_geometry(catalog: &ProductCatalog, tuning: &Tuning, args: &ViewArgs) -> anyhow::Result<()> {
    let ctx = args.context();
    let overlay = perfview::lighting_overlay(ctx.side, ctx.lighting);
    let rows: Vec<_> = catalog
        .products
        .iter()
        .map(|p| {
            let g = PatternGeometry::resolve(p, &ctx, tuning.reference_m);
            let boost = match ctx.side {
                perfview::Side::Outside => tuning.white_boost_alpha(g.pitch_px),
                perfview::Side::Inside => 0.0,
            };
            json!({
                "id": p.id,
                "pitchMm": g.pitch_mm,
                "pitchPx": g.pitch_px,
                "pitchYPx": g.pitch_y_px,
                "radiusPx": g.radius_px,
                "effectiveOpenArea": g.effective_open_area(),
                "whiteBoostAlpha": boost,
            })
        })
        .collect();
    let out = json!({
        "context": ctx,
        "tint": { "tone": format!("{:?}", overlay.tone), "alpha": overlay.alpha },
        "reverseVision": perfview::needs_reverse_vision(ctx.side, ctx.lighting),
        "products": rows,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_check(catalog: &ProductCatalog, tuning: &Tuning) -> anyhow::Result<()> {
    catalog.validate().context("validate catalog")?;
    tuning.validate().context("validate tuning")?;
    println!("ok: {} products", catalog.products.len());
    Ok(())
}

fn strategy(arg: StrategyArg, dpr: u32) -> MaskStrategy {
    match arg {
        StrategyArg::Tile => MaskStrategy::Tiled { dpr },
        StrategyArg::Viewport => MaskStrategy::FullViewport,
    }
}

fn cmd_mask(catalog: &ProductCatalog, tuning: &Tuning, args: MaskArgs) -> anyhow::Result<()> {
    let product = catalog
        .get(&args.product)
        .with_context(|| format!("unknown product '{}'", args.product))?;
    product.validate()?;
    let g = PatternGeometry::resolve(product, &args.view.context(), tuning.reference_m);

    let mut cache = MaskCache::new(tuning.mask_cache_capacity);
    let mask = match strategy(args.strategy, args.dpr) {
        MaskStrategy::Tiled { dpr } => {
            cache.get_or_build_tile(g.lattice, g.pitch_px, g.radius_px, dpr)?
        }
        MaskStrategy::FullViewport => cache.get_or_build_viewport(
            g.lattice,
            g.pitch_px,
            g.radius_px,
            ViewportMetrics::new(args.width, args.height),
        )?,
    };
    let out = json!({
        "id": product.id,
        "layout": format!("{:?}", mask.layout()),
        "width": mask.width(),
        "height": mask.height(),
        "cutFraction": mask.cut_fraction(),
        "fingerprint": format!("{:016x}", mask.fingerprint()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_compare(catalog: &ProductCatalog, tuning: Tuning, args: CompareArgs) -> anyhow::Result<()> {
    let ctx = args.view.context();
    let mut segments = vec![Segment::original("Original", ctx)];
    for id in &args.products {
        let product = catalog
            .get(id)
            .with_context(|| format!("unknown product '{id}'"))?;
        segments.push(Segment::with_film(product.clone(), ctx));
    }

    let background = load_image(args.background.as_deref())?;
    let interior = load_image(args.interior.as_deref())?;
    let artwork = load_image(args.artwork.as_deref())?;

    let mut slider = CompareSlider::new(segments, args.cuts, &tuning);
    slider.resize(ViewportMetrics::new(args.width, args.height));

    let cache = std::sync::Arc::new(std::sync::Mutex::new(MaskCache::new(
        tuning.mask_cache_capacity,
    )));
    let compositor = Compositor::with_cache(tuning, strategy(args.strategy, 1), cache.clone());
    let view = CompareView::new(compositor, ViewOptions::default());
    let frame = view.render(
        &slider,
        SceneImages {
            background: &background,
            opposite: &interior,
            artwork: &artwork,
        },
    )?;

    let stats = cache
        .lock()
        .map_err(|_| anyhow::anyhow!("mask cache lock poisoned"))?
        .stats();
    let out = json!({
        "width": frame.width,
        "height": frame.height,
        "cuts": slider.positions(),
        "slices": frame.slices.iter().map(|s| json!([s.from_pct, s.to_pct])).collect::<Vec<_>>(),
        "layers": frame.layers.iter().map(|l| json!({
            "film": l.film,
            "reverseVision": l.reverse_vision,
            "artwork": format!("{:?}", l.artwork),
            "whiteBoostAlpha": l.white_boost_alpha,
        })).collect::<Vec<_>>(),
        "legend": frame.legend.iter().map(|e| json!({
            "label": e.label,
            "productId": e.product_id,
            "openAreaPct": e.open_area_pct,
            "pitchPx": e.pitch_px,
            "radiusPx": e.radius_px,
        })).collect::<Vec<_>>(),
        "maskCache": { "builds": stats.builds, "hits": stats.hits },
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
