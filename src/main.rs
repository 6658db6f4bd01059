use anyhow::{bail, Context};
use env_logger::Env;

use gridshade::simulation::patterns::Pattern;
use gridshade::{GridshadeApp, SimulationConfig};

const USAGE: &str = "\
Usage: gridshade [OPTIONS]

Options:
  --fps <value>         generations per second while running (default 10)
  --paused              start paused; step with S or the right arrow
  --mirror              read every generation back into host memory
  --shader-dir <dir>    look for shaders in <dir> before the built-in ones
  --rule <name>         transition shader, e.g. life.frag.wgsl
  --pattern <name>      clear, glider, blinker, gosper or random
  -h, --help            print this help";

/// Builds the configuration from command-line arguments
///
/// Returns `None` when help was requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Option<SimulationConfig>> {
    let mut config = SimulationConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fps" => {
                let value = args.next().context("--fps needs a value")?;
                let fps: f64 = value
                    .parse()
                    .with_context(|| format!("invalid --fps value {:?}", value))?;
                config = config.with_frames_per_second(fps);
            }
            "--paused" => config = config.with_start_paused(true),
            "--mirror" => config = config.with_mirror_to_host(true),
            "--shader-dir" => {
                let dir = args.next().context("--shader-dir needs a directory")?;
                config = config.with_shader_dir(dir);
            }
            "--rule" => {
                let name = args.next().context("--rule needs a shader name")?;
                config = config.with_transition_shader(&name);
            }
            "--pattern" => {
                let name = args.next().context("--pattern needs a name")?;
                let pattern = Pattern::from_name(&name)
                    .with_context(|| format!("unknown pattern {:?}", name))?;
                config = config.with_pattern(pattern);
            }
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument {:?}\n\n{}", other, USAGE),
        }
    }

    Ok(Some(config))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let Some(config) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };
    config.validate().context("invalid configuration")?;

    log::info!(
        "Starting {}x{} grid at {} generations per second",
        config.grid_width,
        config.grid_height,
        config.frames_per_second
    );

    let app = GridshadeApp::new(config).context("failed to create application")?;
    app.run().context("simulation stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse_args(args(&[])).unwrap().unwrap();
        assert_eq!(config.frames_per_second, 10.0);
        assert!(!config.start_paused);
        assert_eq!(config.transition_shader, "life.frag.wgsl");
    }

    #[test]
    fn test_flags_and_values() {
        let config = parse_args(args(&[
            "--fps",
            "2.5",
            "--paused",
            "--mirror",
            "--rule",
            "isolation.frag.wgsl",
            "--pattern",
            "blinker",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.frames_per_second, 2.5);
        assert!(config.start_paused);
        assert!(config.mirror_to_host);
        assert_eq!(config.transition_shader, "isolation.frag.wgsl");
        assert_eq!(config.initial_pattern, Pattern::Blinker);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(args(&["--fps", "fast"])).is_err());
        assert!(parse_args(args(&["--fps"])).is_err());
        assert!(parse_args(args(&["--pattern", "spaceship"])).is_err());
        assert!(parse_args(args(&["--wrap"])).is_err());
    }

    #[test]
    fn test_help() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
    }
}
