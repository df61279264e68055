use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use url::Url;

use docs_augment::config::SiteConfig;
use docs_augment::logging::init_tracing;
use docs_augment::patches::redirect_target;
use docs_augment::SiteAugmenter;

/// Post-process rendered documentation pages.
#[derive(Debug, Parser)]
#[command(name = "docs-augment", version, about)]
struct Cli {
  /// Configuration file; defaults to `docs_augment.config.json` next to the input.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Increase logging verbosity (-v info, -vv debug).
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Patch a single HTML page rendered at `--url`.
  Page {
    /// HTML file to patch.
    file: PathBuf,
    /// URL the page is served at.
    #[arg(long)]
    url: Url,
    /// Write the result here instead of patching in place.
    #[arg(long)]
    output: Option<PathBuf>,
  },
  /// Patch every HTML page of a rendered site.
  Site {
    /// Root directory of the rendered site.
    dir: PathBuf,
    /// URL the site root is served at.
    #[arg(long)]
    base_url: Url,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Render the tag filter state described by `--url` into a gallery page.
  Filter {
    /// Gallery HTML file.
    file: PathBuf,
    /// URL carrying the `tags` query parameter.
    #[arg(long)]
    url: Url,
    /// Write the result here instead of patching in place.
    #[arg(long)]
    output: Option<PathBuf>,
  },
  /// Print the canonical location of a legacy URL, if it has one.
  Redirect {
    /// URL to canonicalize.
    url: Url,
  },
}

fn load_config(explicit: Option<&Path>, near: &Path) -> Result<SiteConfig> {
  match explicit {
    Some(path) => SiteConfig::from_path(path)
      .ok_or_else(|| anyhow!("failed to load configuration from {}", path.display())),
    None => Ok(SiteConfig::discover(near)),
  }
}

fn parent_dir(file: &Path) -> &Path {
  file.parent().unwrap_or_else(|| Path::new("."))
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Command::Page { file, url, output } => {
      let config = load_config(cli.config.as_deref(), parent_dir(&file))?;
      let report = SiteAugmenter::new(config).augment_file(&file, &url, output.as_deref())?;
      println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Command::Site { dir, base_url, json } => {
      let config = load_config(cli.config.as_deref(), &dir)?;
      let report = SiteAugmenter::new(config).augment_dir(&dir, &base_url)?;
      if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
      } else {
        for page in &report.changed {
          println!("patched {page}");
        }
        println!(
          "{} pages visited, {} patched ({} images, {} links rewritten)",
          report.pages,
          report.changed.len(),
          report.blog_images,
          report.blog_links
        );
      }
    }
    Command::Filter { file, url, output } => {
      let config = load_config(cli.config.as_deref(), parent_dir(&file))?;
      let html =
        fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
      let rendered = SiteAugmenter::new(config).prerender_filter(&html, &url)?;
      let target = output.as_deref().unwrap_or(&file);
      fs::write(target, rendered).with_context(|| format!("failed to write {}", target.display()))?;
    }
    Command::Redirect { url } => match redirect_target(&url) {
      Some(target) => println!("{target}"),
      None => tracing::info!("{url} is already canonical"),
    },
  }

  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);
  run(cli)
}
