//! Writes one pose message for the render node
//!
//! The file is replaced atomically so the node never sees a partial message.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

use pose_render::pose::{write_message, PoseSample};

const DEFAULT_MESSAGE_PATH: &str = "/tmp/test_ipc";
const IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

fn cli() -> Command {
    Command::new("send_pose")
        .about("Publishes a satellite pose to the render node's message file")
        .arg(
            Arg::new("quaternion")
                .short('q')
                .long("quaternion")
                .value_name("QX,QY,QZ,QW")
                .help("Orientation, vector part first")
                .value_delimiter(',')
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("position")
                .short('p')
                .long("position")
                .value_name("X,Y,Z")
                .help("Position in scene units")
                .value_delimiter(',')
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("path")
                .short('o')
                .long("path")
                .value_name("FILE")
                .help("Message file watched by the node")
                .default_value(DEFAULT_MESSAGE_PATH),
        )
}

fn components<const N: usize>(
    matches: &clap::ArgMatches,
    id: &str,
    default: [f64; N],
) -> Result<[f64; N]> {
    let Some(values) = matches.get_many::<f64>(id) else {
        return Ok(default);
    };
    let values: Vec<f64> = values.copied().collect();
    let found = values.len();
    values
        .try_into()
        .map_err(|_| anyhow::anyhow!("--{id} expects {N} components, got {found}"))
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let quaternion = components(&matches, "quaternion", IDENTITY)?;
    let position = components(&matches, "position", ORIGIN)?;
    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .context("Missing message path")?;

    let sample = PoseSample::from_wire(quaternion, position);
    write_message(&path, &sample)
        .with_context(|| format!("Failed to write pose to {}", path.display()))?;

    println!("Wrote pose {quaternion:?} @ {position:?} to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn test_parses_comma_separated_components() {
        let matches = cli()
            .try_get_matches_from(["send_pose", "-q", "0,0,0.7071,0.7071", "-p", "10,-2.5,-3000"])
            .unwrap();
        assert_eq!(components(&matches, "quaternion", IDENTITY).unwrap(), [0.0, 0.0, 0.7071, 0.7071]);
        assert_eq!(components(&matches, "position", ORIGIN).unwrap(), [10.0, -2.5, -3000.0]);
    }

    #[test]
    fn test_defaults_are_identity_at_origin() {
        let matches = cli().try_get_matches_from(["send_pose"]).unwrap();
        assert_eq!(components(&matches, "quaternion", IDENTITY).unwrap(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(components(&matches, "position", ORIGIN).unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_wrong_component_count_is_rejected() {
        let matches = cli().try_get_matches_from(["send_pose", "-p", "1,2"]).unwrap();
        assert!(components(&matches, "position", ORIGIN).is_err());
    }

    #[test]
    fn test_negative_leading_component() {
        let matches = cli().try_get_matches_from(["send_pose", "-p", "-1,2,3"]).unwrap();
        assert_eq!(components(&matches, "position", ORIGIN).unwrap(), [-1.0, 2.0, 3.0]);
    }
}
