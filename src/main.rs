use clap::Parser;
use itertools::Itertools;
use pict_template::{DataTemplate, Pict, PictSettings};
use serde_json::Value;
use tracing::{debug, Level};

/// Render a template string, substituting values addressed between
/// delimiters (e.g. `{{Record.name}}`).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Template text
    template: String,
    /// Record JSON, addressed as `Record.<path>`
    #[arg(long, default_value = "{}")]
    record: String,
    /// Context JSON array, addressed as `Context[<n>].<path>`
    #[arg(long)]
    context: Option<String>,
    /// Settings file (JSON with Product, AppData, Bundle)
    #[arg(long)]
    settings: Option<std::path::PathBuf>,
    /// Start delimiter
    #[arg(long, default_value = "{{")]
    start: String,
    /// End delimiter
    #[arg(long, default_value = "}}")]
    end: String,
    /// Render through the asynchronous path
    #[arg(long = "async")]
    use_async: bool,
    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let settings = match args.settings.as_ref() {
        Some(path) => PictSettings::from_file(path).unwrap_or_else(|e| fail(format!("Invalid settings: {e}"))),
        None => PictSettings::default(),
    };

    let record: Value = serde_json::from_str(&args.record)
        .unwrap_or_else(|e| fail(format!("Invalid record JSON: {e}")));

    let context: Option<Vec<Value>> = args.context.as_ref().map(|raw| {
        serde_json::from_str(raw).unwrap_or_else(|e| fail(format!("Invalid context JSON array: {e}")))
    });

    let mut pict = Pict::new(settings);
    let (start, end) = (args.start.clone(), args.end.clone());
    if let Err(e) = pict.add_template(|env| DataTemplate::with_delimiters(env, start, end)) {
        fail(e);
    }
    debug!(
        patterns = %pict
            .meta_template()
            .patterns()
            .iter()
            .map(|p| format!("{}…{}", p.start(), p.end()))
            .join(", "),
        "registered patterns"
    );

    let out = if args.use_async {
        let mut result = None;
        pict.parse_template_with_callback(&args.template, &record, context.as_deref(), |r| result = Some(r));
        match result {
            Some(Ok(text)) => text,
            Some(Err(e)) => fail(e),
            None => fail("render callback was not invoked"),
        }
    } else {
        pict.parse_template(&args.template, &record, context.as_deref())
    };

    println!("{out}");
}
