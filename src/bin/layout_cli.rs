#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("layout_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use layout_engine::layout::{
        LayoutConfig, LayoutContext, LayoutKind, LayoutTarget, generate_layout, validate_count,
    };
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;
    const DEFAULT_COUNT: usize = 200;

    const USAGE: &str = r#"layout_cli (layout-engine)

USAGE:
  layout_cli list
  layout_cli run <layout|all> [options]

LAYOUTS:
  table, sphere, helix, grid, tetrahedron

OPTIONS (run):
  --count <n>        Number of records to place (default 200)
  --seed <n>         Seed for randomized placement (tetrahedron top-up)
  --out-dir <dir>    Write <layout>.snap to this dir (required for `all`)
  --out <path>       Write the snapshot to this file (single layout only)
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                for kind in LayoutKind::ALL {
                    println!("{kind}");
                }
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let layout_name = args.next().ok_or("missing layout name")?;

        let mut count = DEFAULT_COUNT;
        let mut seed: Option<u64> = None;
        let mut out_dir: Option<PathBuf> = None;
        let mut out_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--count" => {
                    let raw = args.value("--count")?;
                    let parsed: i64 = raw
                        .parse()
                        .map_err(|e| format!("invalid --count `{raw}`: {e}"))?;
                    count = validate_count(parsed).map_err(|e| e.to_string())?;
                }
                "--seed" => {
                    let raw = args.value("--seed")?;
                    seed = Some(raw.parse().map_err(|e| format!("invalid --seed `{raw}`: {e}"))?);
                }
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--out" => out_path = Some(PathBuf::from(args.value("--out")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = LayoutConfig::default();
        let mut ctx = seed.map_or_else(LayoutContext::new, LayoutContext::seeded);

        let kinds: Vec<LayoutKind> = if layout_name == "all" {
            LayoutKind::ALL.to_vec()
        } else {
            vec![layout_name.parse::<LayoutKind>().map_err(|e| e.to_string())?]
        };

        if let Some(dir) = out_dir.as_ref() {
            if out_path.is_some() {
                return Err("use either --out-dir or --out (not both)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;
            for kind in kinds {
                let snapshot = layout_snapshot(kind, count, &config, &mut ctx)?;
                let path = dir.join(format!("{kind}.snap"));
                write_text_file(&path, &snapshot, overwrite)?;
                eprintln!("wrote {}", path.display());
            }
            return Ok(());
        }

        let [kind] = kinds.as_slice() else {
            return Err("`run all` requires --out-dir".to_string());
        };
        let snapshot = layout_snapshot(*kind, count, &config, &mut ctx)?;
        if let Some(path) = out_path.as_deref() {
            write_text_file(path, &snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{snapshot}");
        }
        Ok(())
    }

    fn layout_snapshot(
        kind: LayoutKind,
        count: usize,
        config: &LayoutConfig,
        ctx: &mut LayoutContext,
    ) -> Result<String, String> {
        let targets = generate_layout(kind, count, config, ctx).map_err(|e| e.to_string())?;
        eprintln!("{kind}: targets={}", targets.len());
        Ok(format_snapshot(kind, &targets))
    }

    fn format_snapshot(kind: LayoutKind, targets: &[LayoutTarget]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "layout {kind}");
        let _ = writeln!(out, "count {}", targets.len());
        for (index, target) in targets.iter().enumerate() {
            let _ = write!(out, "t {index}");
            for value in target
                .position
                .to_array()
                .into_iter()
                .chain(target.rotation.to_array())
            {
                out.push(' ');
                write_f64(&mut out, value);
            }
            out.push('\n');
        }
        out
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }

}
