//! Tok2css CLI - design-token to CSS custom-property transpiler

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tokcss::{
    convert_themes, convert_token_sets, ConversionSummary, CssProfile, EngineOptions,
    ResolutionMode, TokenResult,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tok2css")]
#[command(version)]
#[command(about = "Tok2css - design-token to CSS custom-property transpiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert every token set listed in $metadata.json into generated modules
    Sets {
        /// Directory containing token-set JSON files and $metadata.json
        #[arg(short, long, default_value = "tokens")]
        tokens: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long, default_value = "prebuild")]
        out: PathBuf,

        /// Reference resolution mode
        #[arg(short, long, value_enum, default_value_t = Resolution::Lazy)]
        resolution: Resolution,

        /// Emit legacy two-argument rgba() instead of relative-color syntax
        #[arg(long)]
        legacy_rgba: bool,
    },

    /// Assemble themes from a themes config and emit one module per theme
    Themes {
        /// Themes config file
        #[arg(short, long, default_value = "themes.json")]
        config: PathBuf,

        /// Directory containing token-set JSON files
        #[arg(short, long, default_value = "tokens")]
        tokens: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long, default_value = "prebuild")]
        out: PathBuf,

        /// Reference resolution mode
        #[arg(short, long, value_enum, default_value_t = Resolution::Lazy)]
        resolution: Resolution,

        /// Emit legacy two-argument rgba() instead of relative-color syntax
        #[arg(long)]
        legacy_rgba: bool,

        /// Re-run size-keyword px coercion after the override patch
        #[arg(long)]
        recoerce_overrides: bool,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Resolution {
    /// Inline referenced values at build time
    Eager,
    /// Defer references to var() lookups at runtime
    Lazy,
}

#[cfg(feature = "cli")]
impl From<Resolution> for ResolutionMode {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Eager => ResolutionMode::Eager,
            Resolution::Lazy => ResolutionMode::Lazy,
        }
    }
}

#[cfg(feature = "cli")]
fn profile(legacy_rgba: bool) -> CssProfile {
    if legacy_rgba {
        CssProfile::Legacy
    } else {
        CssProfile::Modern
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result: TokenResult<ConversionSummary> = match cli.command {
        Commands::Sets {
            tokens,
            out,
            resolution,
            legacy_rgba,
        } => {
            let options = EngineOptions {
                resolution: resolution.into(),
                profile: profile(legacy_rgba),
                ..Default::default()
            };
            convert_token_sets(&tokens, &out, options)
        }

        Commands::Themes {
            config,
            tokens,
            out,
            resolution,
            legacy_rgba,
            recoerce_overrides,
        } => {
            let options = EngineOptions {
                resolution: resolution.into(),
                profile: profile(legacy_rgba),
                recoerce_after_patch: recoerce_overrides,
            };
            convert_themes(&tokens, &config, &out, options)
        }

        Commands::Info => {
            println!("Tok2css - design-token to CSS custom-property transpiler");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ Tokens Studio JSON token trees ($metadata.json manifests)");
            println!("  ✓ Cross-file {{dotted.path}} reference resolution (eager or lazy)");
            println!("  ✓ rgba composition with token-valued opacity");
            println!("  ✓ darken/lighten color modification (hsl, lch)");
            println!("  ✓ Multiplication expressions and px unit inference");
            println!("  ✓ Theme assembly with override patches");
            println!();
            return;
        }
    };

    match result {
        Ok(summary) => {
            for warning in &summary.warnings {
                eprintln!("[tok2css] warning: {}", warning);
            }
            println!(
                "Conversion complete: {} modules written, {} skipped",
                summary.written.len(),
                summary.skipped.len()
            );
            if !summary.skipped.is_empty() {
                for name in &summary.skipped {
                    eprintln!("[tok2css] skipped: {}", name);
                }
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("[tok2css] error: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tokcss --features cli");
    eprintln!("  tok2css <COMMAND> [OPTIONS]");
}
