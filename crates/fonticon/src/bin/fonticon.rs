use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fonticon::{Config, FontIcon, FontIconBackend, IconStyle, PickerResults};
use miette::{IntoDiagnostic, Result, miette};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and manage font icon catalogs")]
struct Args {
    /// Path to KDL config file; Font Awesome 4.7.0 defaults when omitted
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every icon id with its name
    Icons,
    /// List icons by category
    Groups,
    /// Search icon ids
    Search {
        /// Substring to look for
        term: String,
    },
    /// Resolve a class-name template
    Class {
        /// Semantic key, e.g. `icon` or `fixed-width`
        key: String,
        /// Template arguments
        args: Vec<String>,
    },
    /// Render the markup for an icon
    Tag {
        /// Icon id
        id: String,
        #[arg(long)]
        list_item: bool,
        #[arg(long)]
        fixed_width: bool,
        /// CSS color
        #[arg(long)]
        color: Option<String>,
    },
    /// Clear all cached catalogs
    Flush,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_env("FONTICON_LOG"))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let backend = config.into_backend()?;

    match args.command {
        Command::Icons => {
            let icons = backend.icons().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&icons).into_diagnostic()?);
            } else {
                for (id, name) in icons.iter() {
                    println!("{id}\t{name}");
                }
            }
        }
        Command::Groups => {
            let catalog = backend.grouped_icons().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*catalog).into_diagnostic()?);
            } else {
                for (category, icons) in catalog.groups() {
                    println!("{category} ({})", icons.len());
                    for icon in icons {
                        println!("  {}\t{}\t{}", icon.id, icon.name, icon.unicode);
                    }
                }
            }
        }
        Command::Search { term } => {
            let groups = backend.search(&term).await?;
            if args.json {
                let results = PickerResults::from(groups);
                println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
            } else {
                for group in groups {
                    println!("{}", group.category);
                    for m in group.matches {
                        println!("  {}\t{}", m.id, m.name);
                    }
                }
            }
        }
        Command::Class { key, args: template_args } => {
            let template_args: Vec<&str> = template_args.iter().map(String::as_str).collect();
            match backend.class_name(&key, &template_args)? {
                Some(class) => println!("{class}"),
                None => return Err(miette!("no class template configured for `{key}`")),
            }
        }
        Command::Tag {
            id,
            list_item,
            fixed_width,
            color,
        } => {
            let icon = FontIcon::parse(&id)?;
            let style = IconStyle {
                list_item,
                fixed_width,
            };
            match backend.icon_tag(icon.as_ref(), style, color.as_deref())? {
                Some(tag) => println!("{tag}"),
                None => return Err(miette!("no icon given")),
            }
        }
        Command::Flush => {
            backend.flush().await?;
            eprintln!("catalog cache cleared");
        }
    }

    Ok(())
}
