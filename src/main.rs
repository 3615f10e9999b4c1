use anyhow::Context;
use clap::Parser;
use code_dump::{
    DEFAULT_PREFERENCES_FILE, JsonFileStore, OutputTarget, Pipeline, PreferenceStore, Preferences,
};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "code-dump",
    version,
    author,
    about = "Dump a source tree into a single Markdown file",
    long_about = "Dump a source tree into a single, timestamped Markdown file.\n\n\
    Files are filtered by extension, excluded directory names and name substrings, \
    then written in a stable case-insensitive order, each under its own heading \
    in a language-tagged code fence. Settings are read from a preferences file \
    first and then overridden by the flags below.\n\n\
    USAGE EXAMPLES:\n  \
      # Dump the current directory with saved or default settings\n  \
      code-dump\n\n  \
      # Only C# and shader files under Assets\n  \
      code-dump --source Assets --extensions .cs,.shader\n\n  \
      # Write to a fixed file and remember the settings\n  \
      code-dump -s src --output snapshot.md --save\n\n  \
      # Machine-readable result\n  \
      code-dump --json --utc"
)]
struct Cli {
    /// Folder to dump, relative to the current directory
    #[arg(short, long, value_name = "PATH")]
    source: Option<String>,

    /// Directory receiving timestamped dumps
    #[arg(short = 'o', long, value_name = "PATH")]
    out_dir: Option<String>,

    /// Write to exactly this file instead of a timestamped one
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Document title and base of the generated file name
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Comma-separated extensions to keep; empty keeps every file
    #[arg(short, long, value_name = "CSV")]
    extensions: Option<String>,

    /// Comma-separated directory names to skip at any depth
    #[arg(short = 'x', long, value_name = "CSV")]
    exclude_dirs: Option<String>,

    /// Keep only files whose name contains this text
    #[arg(long, value_name = "TEXT")]
    include: Option<String>,

    /// Drop files whose name contains this text
    #[arg(long, value_name = "TEXT")]
    exclude: Option<String>,

    /// Stamp the dump in UTC
    #[arg(long, overrides_with = "local")]
    utc: bool,

    /// Stamp the dump in local time
    #[arg(long, overrides_with = "utc")]
    local: bool,

    /// Omit the counts and the header block
    #[arg(long, overrides_with = "header")]
    no_header: bool,

    /// Write the counts and the header block
    #[arg(long, overrides_with = "no_header")]
    header: bool,

    /// Preferences file
    #[arg(long, default_value = DEFAULT_PREFERENCES_FILE, value_name = "FILE")]
    prefs: PathBuf,

    /// Save the effective settings back to the preferences file
    #[arg(long)]
    save: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layers the flags that were given on top of `prefs`.
    fn apply(&self, prefs: &mut Preferences) {
        if let Some(ref source) = self.source {
            prefs.source_folder.clone_from(source);
        }
        if let Some(ref out_dir) = self.out_dir {
            prefs.output_directory.clone_from(out_dir);
        }
        if let Some(ref name) = self.name {
            prefs.base_file_name.clone_from(name);
        }
        if let Some(ref extensions) = self.extensions {
            prefs.extensions.clone_from(extensions);
        }
        if let Some(ref exclude_dirs) = self.exclude_dirs {
            prefs.exclude_dirs.clone_from(exclude_dirs);
        }
        if let Some(ref include) = self.include {
            prefs.include_name_contains.clone_from(include);
        }
        if let Some(ref exclude) = self.exclude {
            prefs.exclude_name_contains.clone_from(exclude);
        }
        if self.utc {
            prefs.use_utc_time = true;
        } else if self.local {
            prefs.use_utc_time = false;
        }
        if self.no_header {
            prefs.write_header = false;
        } else if self.header {
            prefs.write_header = true;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;

    let store = JsonFileStore::new(cwd.join(&cli.prefs));
    let mut prefs = store
        .load()
        .with_context(|| format!("Failed to load preferences from {}", store.path().display()))?;
    cli.apply(&mut prefs);

    if cli.save {
        store
            .save(&prefs)
            .with_context(|| format!("Failed to save preferences to {}", store.path().display()))?;
    }

    let timestamp = prefs.timestamp_now();
    let mut config = prefs
        .into_config(&cwd, timestamp)
        .context("Failed to build configuration")?;
    if let Some(output) = cli.output {
        config.output = OutputTarget::File(output);
    }
    config.skip_paths.push(store.path().to_path_buf());

    let pipeline = Pipeline::new(config).context("Failed to create pipeline")?;
    let result = pipeline.run().context("Dump failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{json}");
    } else {
        println!("{}", result.status_line(pipeline.config()));
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("code_dump=info"),
        1 => EnvFilter::new("code_dump=debug"),
        _ => EnvFilter::new("code_dump=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
