use std::path::Path;

use console::Style;
use tessera_core::boundary::BoundaryMode;
use tessera_core::config::FilterConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_filter_summary(
    config: &FilterConfig,
    input: &Path,
    output: &Path,
    shape: (usize, usize),
    chunks: &[usize],
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Tessera Filter"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(rayon::current_num_threads())
    );
    println!();

    // Window
    println!("  {}", s.header.apply_to("Window"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Statistic"),
        s.method.apply_to(config.statistic)
    );
    match (&config.footprint, &config.size) {
        (Some(fp), _) => println!(
            "    {:<12}{}",
            s.label.apply_to("Footprint"),
            s.value.apply_to(fp)
        ),
        (None, Some(size)) => println!(
            "    {:<12}{}",
            s.label.apply_to("Size"),
            s.value.apply_to(size)
        ),
        (None, None) => println!(
            "    {:<12}{}",
            s.label.apply_to("Size"),
            s.disabled.apply_to("unset")
        ),
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Origin"),
        s.value.apply_to(&config.origin)
    );
    if config.mode == BoundaryMode::Constant {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mode"),
            s.method.apply_to(format!("constant ({})", config.cval))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mode"),
            s.method.apply_to(config.mode)
        );
    }
    println!();

    // Partitioning
    let grid: Vec<usize> = [shape.0, shape.1]
        .iter()
        .zip(chunks)
        .map(|(&len, &c)| if c == 0 { 0 } else { len.div_ceil(c) })
        .collect();
    println!("  {}", s.header.apply_to("Chunks"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Image"),
        s.value.apply_to(format!("{}x{}", shape.1, shape.0))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Chunk"),
        s.value.apply_to(format!("{chunks:?}"))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Grid"),
        s.value.apply_to(format!("{grid:?}"))
    );
    println!();
}
