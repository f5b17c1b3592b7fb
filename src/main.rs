use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use spec_apply::diagnostics;
use spec_apply::render;
use spec_apply::{Registry, SpecDocument};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "spec-apply")]
#[command(about = "Apply a JSON spec of named functions to shared arguments", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). Otherwise SPEC_APPLY_LOG applies.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a spec document and print the result tree as JSON.
    Run {
        #[arg(long)]
        spec: String,

        /// Arguments as JSON. An array is spread; any other value is one argument.
        #[arg(long, conflicts_with = "args_file")]
        args: Option<String>,

        /// Read the arguments JSON from a file instead.
        #[arg(long)]
        args_file: Option<String>,

        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        pretty: bool,
    },
    /// Validate a spec document and print its shape.
    Check {
        #[arg(long)]
        spec: String,
    },
    /// List the builtin functions leaves can name.
    Builtins,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_logging(cli.verbose);

    let registry = Registry::with_builtins();

    match cli.cmd {
        Commands::Run {
            spec,
            args,
            args_file,
            out,
            pretty,
        } => {
            let input = match (args, args_file) {
                (Some(text), _) => ArgsSource::Inline(text),
                (None, Some(path)) => ArgsSource::File(path),
                (None, None) => ArgsSource::None,
            };
            let json = run(&registry, &spec, &input, pretty)?;
            write_output(&json, out.as_deref())?;
        }
        Commands::Check { spec } => {
            let report = check(&registry, &spec)?;
            print!("{}", report.shape);
            eprintln!("{}", report.summary);
        }
        Commands::Builtins => {
            let width = registry.iter().map(|b| b.name.len()).max().unwrap_or(0);
            for b in registry.iter() {
                println!("{:width$}  {}", b.name, b.summary, width = width);
            }
        }
    }

    Ok(())
}

/// Where `run` reads its arguments from.
enum ArgsSource {
    Inline(String),
    File(String),
    None,
}

/// Validate and apply the spec at `spec_path`, returning the rendered result
/// with a trailing newline.
fn run(registry: &Registry, spec_path: &str, input: &ArgsSource, pretty: bool) -> Result<String> {
    // 1) Parse + validate the spec document.
    let validated = load_document(spec_path)?
        .validate_and_build(registry)
        .with_context(|| diagnostics::error_message(format!("validate spec {}", spec_path)))?;

    // 2) Collect arguments.
    let args = match input {
        ArgsSource::Inline(text) => parse_args(text).context("parse --args")?,
        ArgsSource::File(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| diagnostics::error_message(format!("read args file {}", path)))?;
            parse_args(&text).with_context(|| format!("parse args file {}", path))?
        }
        ArgsSource::None => {
            diagnostics::warn("no arguments given; leaves are called with an empty list");
            Vec::new()
        }
    };
    tracing::info!(
        spec = %spec_path,
        leaves = validated.shape.leaf_count(),
        args = args.len(),
        "applying"
    );

    // 3) Apply.
    let result = validated.apply(&args)?;

    // 4) Render.
    let json = render::render_json(&result, pretty)?;
    Ok(format!("{json}\n"))
}

/// Write rendered output to `out`, or to stdout when no path is given.
fn write_output(text: &str, out: Option<&str>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write {}", path))?;
            tracing::info!("wrote {}", path);
        }
        None => print!("{text}"),
    }
    Ok(())
}

struct CheckReport {
    /// Pretty shape JSON for stdout.
    shape: String,
    /// One-line summary for stderr.
    summary: String,
}

fn check(registry: &Registry, spec_path: &str) -> Result<CheckReport> {
    let validated = load_document(spec_path)?
        .validate_and_build(registry)
        .with_context(|| diagnostics::error_message(format!("validate spec {}", spec_path)))?;
    Ok(CheckReport {
        shape: format!("{}\n", render::render_shape(&validated.shape)?),
        summary: format!(
            "ok: {} leaves, depth {}",
            validated.shape.leaf_count(),
            validated.shape.depth()
        ),
    })
}

fn load_document(path: &str) -> Result<SpecDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read spec file {}", path)))?;
    let doc = SpecDocument::from_json_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse spec file {}", path)))?;
    Ok(doc)
}

/// An array is the argument list; any other JSON value is a single argument.
fn parse_args(text: &str) -> Result<Vec<Value>> {
    let text = text.trim();
    if text.is_empty() {
        bail!("{}", diagnostics::error_message("arguments are empty"));
    }
    let v: Value = serde_json::from_str(text)?;
    Ok(match v {
        Value::Array(items) => items,
        other => vec![other],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn args_array_is_spread() {
        assert_eq!(parse_args("[1, \"a\"]").unwrap(), vec![json!(1), json!("a")]);
        assert_eq!(parse_args(" 5 ").unwrap(), vec![json!(5)]);
        assert_eq!(parse_args("[[1]]").unwrap(), vec![json!([1])]);
        assert!(parse_args("  ").is_err());
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from([
            "spec-apply", "-v", "run", "--spec", "s.json", "--args", "[5]", "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.cmd, Commands::Run { pretty: true, .. }));
    }

    const WIRING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/wiring.json");
    const CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/config.json");

    fn scratch(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("spec-apply-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn wiring_expectations(out: &Value) {
        assert_eq!(out["database"]["url"], json!("postgres://localhost/orders"));
        assert_eq!(out["database"]["pool_size"], json!(8));
        assert_eq!(out["http"]["port"], json!(8080));
        assert_eq!(out["service_name"], json!("orders"));
        assert_eq!(out["replicas"], json!(2));
    }

    #[test]
    fn run_reads_args_file() {
        let registry = Registry::with_builtins();
        let text = run(&registry, WIRING, &ArgsSource::File(CONFIG.to_string()), false).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.trim_end().lines().count(), 1);
        let out: Value = serde_json::from_str(&text).unwrap();
        wiring_expectations(&out);
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["database", "http", "service_name", "replicas"]);
    }

    #[test]
    fn run_with_inline_args_and_pretty_output() {
        let registry = Registry::with_builtins();
        let spec = scratch("inline-spec.json", r#"{"a": "add(1)", "b": {"c": "mul(2)"}}"#);
        let text = run(&registry, &spec, &ArgsSource::Inline("5".into()), true).unwrap();
        assert_eq!(text, "{\n  \"a\": 6,\n  \"b\": {\n    \"c\": 10\n  }\n}\n");
        std::fs::remove_file(spec).ok();
    }

    #[test]
    fn run_without_args_calls_leaves_with_empty_list() {
        let registry = Registry::with_builtins();
        let spec = scratch("empty-args-spec.json", r#"{"n": "count", "all": "args"}"#);
        let text = run(&registry, &spec, &ArgsSource::None, false).unwrap();
        assert_eq!(text, "{\"n\":0,\"all\":[]}\n");
        std::fs::remove_file(spec).ok();
    }

    #[test]
    fn run_reports_invalid_spec() {
        let registry = Registry::with_builtins();
        let spec = scratch("invalid-spec.json", r#"{"a": 5}"#);
        let err = run(&registry, &spec, &ArgsSource::Inline("[5]".into()), false).unwrap_err();
        assert!(
            err.chain()
                .any(|e| e.to_string().starts_with("invalid spec at a:"))
        );
        std::fs::remove_file(spec).ok();
    }

    #[test]
    fn run_output_written_to_file_keeps_trailing_newline() {
        let registry = Registry::with_builtins();
        let text = run(&registry, WIRING, &ArgsSource::File(CONFIG.to_string()), false).unwrap();
        let out = scratch("out.json", "stale");
        write_output(&text, Some(&out)).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, text);
        assert!(written.ends_with("}\n"));
        wiring_expectations(&serde_json::from_str(&written).unwrap());
        std::fs::remove_file(out).ok();
    }

    #[test]
    fn check_prints_shape_and_summary() {
        let report = check(&Registry::with_builtins(), WIRING).unwrap();
        let shape: Value = serde_json::from_str(&report.shape).unwrap();
        assert_eq!(
            shape,
            json!({
                "database": {"url": null, "pool_size": null},
                "http": {"port": null, "banner": null},
                "service_name": null,
                "replicas": null
            })
        );
        assert!(report.shape.ends_with("}\n"));
        assert_eq!(report.summary, "ok: 6 leaves, depth 2");
    }

    #[test]
    fn args_and_args_file_conflict() {
        let res = Cli::try_parse_from([
            "spec-apply", "run", "--spec", "s.json", "--args", "[5]", "--args-file", "a.json",
        ]);
        assert!(res.is_err());
    }
}
