use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ndarray::Ix2;
use tessera_core::boundary::BoundaryMode;
use tessera_core::config::{FilterConfig, FootprintConfig};
use tessera_core::consts::DEFAULT_CHUNK_EXTENT;
use tessera_core::filters::order_filter;
use tessera_core::runtime::ChunkedArray;
use tessera_core::window::{ParamValue, Statistic};

use crate::io::{load_image, save_image};
use crate::summary::print_filter_summary;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatisticArg {
    Min,
    Max,
    Median,
    Rank,
    Percentile,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Input image file (TIFF or PNG)
    pub file: PathBuf,

    /// TOML filter config; command-line options override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Order statistic to compute
    #[arg(long, value_enum)]
    pub statistic: Option<StatisticArg>,

    /// Rank for --statistic rank (0 = smallest)
    #[arg(long)]
    pub rank: Option<i64>,

    /// Percentile for --statistic percentile (0..=100)
    #[arg(long)]
    pub percentile: Option<f64>,

    /// Window size: "S" or "S0,S1"
    #[arg(long)]
    pub size: Option<ParamValue>,

    /// Disk footprint radius (overrides --size)
    #[arg(long)]
    pub ball: Option<f64>,

    /// Window origin: "O" or "O0,O1"; fractional for median and rank
    #[arg(long, allow_hyphen_values = true)]
    pub origin: Option<ParamValue>,

    /// Boundary mode: reflect, constant, nearest, mirror, wrap
    #[arg(long)]
    pub mode: Option<BoundaryMode>,

    /// Fill value for --mode constant
    #[arg(long, allow_hyphen_values = true)]
    pub cval: Option<f64>,

    /// Chunk shape: "C0,C1"
    #[arg(long, value_delimiter = ',')]
    pub chunks: Option<Vec<usize>>,

    /// Output file path
    #[arg(short, long, default_value = "filtered.tiff")]
    pub output: PathBuf,
}

impl FilterArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<FilterConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str::<FilterConfig>(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => FilterConfig::default(),
        };

        if let Some(stat) = self.statistic {
            config.statistic = match stat {
                StatisticArg::Min => Statistic::Minimum,
                StatisticArg::Max => Statistic::Maximum,
                StatisticArg::Median => Statistic::Median,
                StatisticArg::Rank => Statistic::Rank(
                    self.rank.context("--statistic rank requires --rank")?,
                ),
                StatisticArg::Percentile => Statistic::Percentile(
                    self.percentile
                        .context("--statistic percentile requires --percentile")?,
                ),
            };
        }
        if let Some(ref size) = self.size {
            config.size = Some(size.clone());
            config.footprint = None;
        }
        if let Some(radius) = self.ball {
            config.footprint = Some(FootprintConfig::Ball { ndim: 2, radius });
        }
        if let Some(ref origin) = self.origin {
            config.origin = origin.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(cval) = self.cval {
            config.cval = cval;
        }
        if let Some(ref chunks) = self.chunks {
            config.chunks = Some(chunks.clone());
        }
        Ok(config)
    }
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let config = args.resolve_config()?;

    let data = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let (h, w) = data.dim();
    println!("Loaded {}x{} image", w, h);

    let chunks = config
        .chunks
        .clone()
        .unwrap_or_else(|| vec![DEFAULT_CHUNK_EXTENT; 2]);
    print_filter_summary(&config, &args.file, &args.output, (h, w), &chunks);

    let input = ChunkedArray::from_array(&data, &chunks)
        .with_context(|| format!("Invalid chunk shape {chunks:?}"))?;
    let window = config.window_args::<f32>()?;
    let filtered = order_filter(&input, config.statistic, &window)
        .with_context(|| format!("{} filter failed", config.statistic))?;
    let result = filtered
        .to_array()
        .into_dimensionality::<Ix2>()
        .context("Filter output is not two-dimensional")?;

    save_image(&result, &args.output)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
