//! groundgen CLI - Command-line interface for ground-texture generation
//!
//! This binary generates batches of texture / defects / depth image sets and
//! prints the built-in presets.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use groundgen_cli::commands;
use groundgen_cli::commands::generate::GenerateOptions;
use groundgen_cli::logging;

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            ground,
            count,
            output_dir,
            defects,
            seed,
            depth_range,
            svg,
            textures,
            background_texture,
            resolution,
            json,
        } => {
            let options = GenerateOptions {
                ground,
                count,
                output_dir: PathBuf::from(output_dir),
                defects,
                seed,
                depth_range,
                svg,
                texture_images: textures.into_iter().map(PathBuf::from).collect(),
                background_texture: background_texture.map(PathBuf::from),
                resolution,
                json,
                quiet: cli.quiet,
            };
            commands::generate::run(&options)
        }
        Commands::Presets { ground } => commands::presets::run(ground),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli_args::parse_resolution;
    use groundgen_spec::{DepthRange, GroundType};

    #[test]
    fn test_cli_parses_generate_defaults() {
        let cli = Cli::try_parse_from(["groundgen", "generate", "--ground", "slate"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        match cli.command {
            Commands::Generate {
                ground,
                count,
                output_dir,
                defects,
                seed,
                depth_range,
                svg,
                textures,
                resolution,
                ..
            } => {
                assert_eq!(ground, GroundType::Slate);
                assert_eq!(count, 1);
                assert_eq!(output_dir, ".");
                assert_eq!(defects, None);
                assert_eq!(seed, 0);
                assert_eq!(depth_range, DepthRange::Sixteen);
                assert!(!svg);
                assert!(textures.is_empty());
                assert_eq!(resolution, None);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_with_options() {
        let cli = Cli::try_parse_from([
            "groundgen",
            "-vv",
            "generate",
            "-g",
            "asphalt",
            "-n",
            "5",
            "-o",
            "out",
            "-d",
            "3",
            "--seed",
            "42",
            "--depth-range",
            "8bit",
            "-r",
            "640x480",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate {
                ground,
                count,
                output_dir,
                defects,
                seed,
                depth_range,
                resolution,
                json,
                ..
            } => {
                assert_eq!(ground, GroundType::Asphalt);
                assert_eq!(count, 5);
                assert_eq!(output_dir, "out");
                assert_eq!(defects, Some(3));
                assert_eq!(seed, 42);
                assert_eq!(depth_range, DepthRange::Eight);
                assert_eq!(resolution, Some([640, 480]));
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_repeated_textures() {
        let cli = Cli::try_parse_from([
            "groundgen",
            "generate",
            "--ground",
            "cobblestone",
            "--texture",
            "a.png",
            "--texture",
            "b.png",
            "--background-texture",
            "bg.png",
            "--svg",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                textures,
                background_texture,
                svg,
                ..
            } => {
                assert_eq!(textures, vec!["a.png", "b.png"]);
                assert_eq!(background_texture.as_deref(), Some("bg.png"));
                assert!(svg);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_ground() {
        assert!(Cli::try_parse_from(["groundgen", "generate", "--ground", "gravel"]).is_err());
        assert!(Cli::try_parse_from(["groundgen", "generate"]).is_err());
    }

    #[test]
    fn test_cli_parses_presets() {
        let cli = Cli::try_parse_from(["groundgen", "-q", "presets", "--ground", "asphalt"])
            .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Presets { ground } => assert_eq!(ground, Some(GroundType::Asphalt)),
            _ => panic!("expected presets command"),
        }
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1024x768").unwrap(), [1024, 768]);
        assert_eq!(parse_resolution("64X32").unwrap(), [64, 32]);
        assert!(parse_resolution("1024").is_err());
        assert!(parse_resolution("axb").is_err());
    }
}
