use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliArgs {
    config_dir: Option<PathBuf>,
    music_dir: Option<PathBuf>,
    null_audio: bool,
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    studio_player::app::run_with_startup(studio_player::app::AppStartupOptions {
        config_dir: args.config_dir,
        music_dir: args.music_dir,
        null_audio: args.null_audio,
        verbose: args.verbose,
    })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--config-dir" => {
                index += 1;
                out.config_dir = Some(path_value(&args, index, "--config-dir")?);
            }
            "--music-dir" => {
                index += 1;
                out.music_dir = Some(path_value(&args, index, "--music-dir")?);
            }
            "--null-audio" => out.null_audio = true,
            "-v" | "--verbose" => out.verbose = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn path_value(args: &[String], index: usize, flag: &str) -> anyhow::Result<PathBuf> {
    let Some(value) = args.get(index) else {
        anyhow::bail!("{flag} requires a path");
    };
    if value.trim().is_empty() {
        anyhow::bail!("{flag} cannot be empty");
    }
    Ok(PathBuf::from(value.trim()))
}

fn print_help() {
    println!("Studio Player");
    println!("  --config-dir <path>  Config, session and log directory");
    println!("  --music-dir <path>   Build the playlist from a music folder");
    println!("  --null-audio         Run without an audio output device");
    println!("  -v, --verbose        Debug logging");
}
