use super::*;

fn cfg(width: u32, height: u32) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        tick_rate: TickRate::default(),
        out_path: PathBuf::from("target/out.mp4"),
        overwrite: true,
    }
}

#[test]
fn config_validation_catches_bad_sizes() {
    assert!(cfg(0, 10).validate().is_err());
    assert!(cfg(11, 10).validate().is_err());
    assert!(cfg(800, 601).validate().is_err());
    assert!(cfg(800, 600).validate().is_ok());
}

#[test]
fn args_describe_raw_rgba_input() {
    let args = cfg(800, 600).ffmpeg_args();
    assert_eq!(args[0], "-y");
    let size = args.iter().position(|a| a == "-s").unwrap();
    assert_eq!(args[size + 1], "800x600");
    let rate = args.iter().position(|a| a == "-r").unwrap();
    assert_eq!(args[rate + 1], "60");
    assert_eq!(args.last().unwrap(), "target/out.mp4");

    let keep = EncodeConfig {
        overwrite: false,
        ..cfg(800, 600)
    };
    assert_eq!(keep.ffmpeg_args()[0], "-n");
}

#[test]
fn parent_dir_of_bare_file_name_is_fine() {
    ensure_parent_dir(Path::new("frame.png")).unwrap();
}
