use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use image::RgbImage;
use tempfile::TempDir;

const STEGI: &str = env!("CARGO_BIN_EXE_stegi");

/// 4 × 4 RGB, the red LSB is set on even rows only
fn write_alternating_rows(dir: &Path) -> PathBuf {
    let img = RgbImage::from_fn(4, 4, |_, y| {
        let red = if y % 2 == 0 { 0x81 } else { 0x80 };
        image::Rgb([red, 0x33, 0xcc])
    });
    let path = dir.join("rows.png");
    img.save(&path).expect("Failed to write test image");
    path
}

fn stegi(dir: &Path, args: &[&str]) -> Output {
    Command::new(STEGI)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run stegi")
}

#[test]
fn raw_output_should_go_to_stdout() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-c", "001", "-b", "1", "-r", "rows.png"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, vec![0b1111_0000, 0b1111_0000]);
}

#[test]
fn column_flag_should_pack_column_by_column() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-c", "1", "-b", "1", "-r", "--column", "rows.png"]);

    assert!(out.status.success());
    assert_eq!(out.stdout, vec![0b1010_1010, 0b1010_1010]);
}

#[test]
fn image_output_should_be_black_and_white() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-c", "1", "-b", "1", "-o", "plane.png", "rows.png"]);

    assert!(out.status.success());
    let img = image::open(dir.path().join("plane.png")).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(2, 0).0, [255, 255, 255]);
    assert_eq!(img.get_pixel(2, 1).0, [0, 0, 0]);
}

#[test]
fn sweep_should_default_to_the_out_folder() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-a", "rows.png"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let files = fs::read_dir(dir.path().join("out")).unwrap().count();
    assert_eq!(files, 32);
    assert!(dir.path().join("out").join("3_00000001.bmp").exists());
}

#[test]
fn raw_sweep_should_write_bin_files() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-a", "-r", "-o", "planes", "rows.png"]);

    assert!(out.status.success());
    let red_lsb = fs::read(dir.path().join("planes").join("0_00000001.bin")).unwrap();
    assert_eq!(red_lsb, vec![0b1111_0000, 0b1111_0000]);
}

#[test]
fn empty_input_should_exit_with_1() {
    let dir = TempDir::new().unwrap();

    let out = stegi(dir.path(), &[""]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "Please specify a file");
}

#[test]
fn no_input_should_exit_with_1() {
    let dir = TempDir::new().unwrap();

    let out = stegi(dir.path(), &["-a"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unreadable_input_should_exit_with_2() {
    let dir = TempDir::new().unwrap();

    let out = stegi(dir.path(), &["-c", "1", "-b", "1", "-r", "missing.png"]);

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stegi: Image media is invalid"), "{stderr}");
    assert!(stderr.contains("for help use --help"), "{stderr}");
}

#[test]
fn strict_should_exit_with_2_on_wide_masks() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["--strict", "-c", "1111", "-b", "1", "-r", "rows.png"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid channel mask 1111"));
    assert!(out.stdout.is_empty());
}

#[test]
fn non_binary_masks_should_be_refused() {
    let dir = TempDir::new().unwrap();

    let out = stegi(dir.path(), &["-c", "2", "rows.png"]);

    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn verbose_should_echo_the_parameters() {
    let dir = TempDir::new().unwrap();
    write_alternating_rows(dir.path());

    let out = stegi(dir.path(), &["-v", "-c", "101", "-b", "10", "-o", "x.bin", "-r", "rows.png"]);

    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Channel mask: 101"), "{stderr}");
    assert!(stderr.contains("Plane mask: 10"), "{stderr}");
    assert!(stderr.contains("Output file: x.bin"), "{stderr}");
    assert!(stderr.contains("All masks: false"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn interrupted_sweep_should_exit_with_0_and_keep_written_files() {
    let dir = TempDir::new().unwrap();
    RgbImage::from_fn(1024, 1024, |x, y| image::Rgb([x as u8, y as u8, (x ^ y) as u8]))
        .save(dir.path().join("big.png"))
        .expect("Failed to write test image");
    let out_dir = dir.path().join("out");

    let mut child = Command::new(STEGI)
        .current_dir(dir.path())
        .args(["-a", "big.png"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start stegi");
    let written = || fs::read_dir(&out_dir).map(|d| d.count()).unwrap_or(0);
    let started = Instant::now();
    while written() == 0 && started.elapsed() < Duration::from_secs(60) {
        thread::sleep(Duration::from_millis(10));
    }
    Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to send SIGINT");

    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(0), "{status:?}");
    let files = written();
    assert!((1..=32).contains(&files), "{files} files left");
    assert!(out_dir.join("0_00000001.bmp").exists());
}
