//! Integration tests for Wine path resolution.
//!
//! These build a complete fixture on disk (procfs tree, passwd, Wine
//! prefix with registry hives, dosdevices symlinks, and the client's
//! config file) and run the resolver end-to-end against it.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use mapwatch_core::SongsResolver;
use tempfile::TempDir;

const PID: i32 = 777;

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    fn proc_root(&self) -> PathBuf {
        self.root.path().join("proc")
    }

    fn passwd_path(&self) -> PathBuf {
        self.root.path().join("passwd")
    }

    /// A procfs entry for the target with the given environ content.
    fn write_proc(&self, environ: &[u8], loginuid: &str) {
        let dir = self.proc_root().join(PID.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("environ"), environ).unwrap();
        fs::write(dir.join("loginuid"), loginuid).unwrap();
    }

    fn write_passwd(&self, content: &str) {
        fs::write(self.passwd_path(), content).unwrap();
    }

    /// A Wine prefix at `at` with a `c:` drive, an install dir under
    /// `drive_c/Games/osu!`, registry hives pointing at it, and a
    /// config file naming `beatmap_dir`.
    fn write_prefix(&self, at: &Path, beatmap_dir: &str) {
        let install = at.join("drive_c/Games/osu!");
        fs::create_dir_all(&install).unwrap();
        fs::create_dir_all(at.join("dosdevices")).unwrap();
        symlink("../drive_c", at.join("dosdevices/c:")).unwrap();

        fs::write(
            at.join("system.reg"),
            concat!(
                "WINE REGISTRY Version 2\n",
                ";; All keys relative to \\\\Machine\n",
                "\n",
                "[Software\\\\Classes\\\\osu\\\\shell\\\\open\\\\command] 1686000000\n",
                "#time=1d9a30f00000000\n",
                "@=\"\\\"C:\\\\Games\\\\osu!\\\\osu!.exe\\\" \\\"%1\\\"\"\n",
            ),
        )
        .unwrap();

        fs::write(
            install.join("osu!.player.cfg"),
            format!("Username = player\nBeatmapDirectory = {beatmap_dir}\nVolume = 80\n"),
        )
        .unwrap();
    }

    fn resolver(&self) -> SongsResolver {
        SongsResolver::with_roots(self.proc_root(), self.passwd_path())
    }
}

#[test]
fn test_resolve_with_wineprefix_env() {
    let fx = Fixture::new();
    let prefix = fx.root.path().join("wineprefix");
    fx.write_prefix(&prefix, "Songs");
    fs::create_dir_all(prefix.join("drive_c/Games/osu!/Songs")).unwrap();

    let environ = format!("HOME=/home/player\0WINEPREFIX={}\0", prefix.display());
    fx.write_proc(environ.as_bytes(), "1000");
    fx.write_passwd("player:x:1000:1000::/home/player:/bin/bash\n");

    let songs = fx.resolver().resolve(PID).unwrap();

    let expected = fs::canonicalize(prefix.join("drive_c/Games/osu!/Songs")).unwrap();
    assert_eq!(songs, expected);
}

#[test]
fn test_resolve_repairs_config_case() {
    let fx = Fixture::new();
    let prefix = fx.root.path().join("wineprefix");
    // Config says "songs" but the on-disk directory is "Songs".
    fx.write_prefix(&prefix, "songs");
    fs::create_dir_all(prefix.join("drive_c/Games/osu!/Songs")).unwrap();

    let environ = format!("WINEPREFIX={}\0", prefix.display());
    fx.write_proc(environ.as_bytes(), "1000");
    fx.write_passwd("player:x:1000:1000::/home/player:/bin/bash\n");

    let songs = fx.resolver().resolve(PID).unwrap();

    let expected = fs::canonicalize(prefix.join("drive_c/Games/osu!/Songs")).unwrap();
    assert_eq!(songs, expected);
}

#[test]
fn test_resolve_falls_back_to_home_wine() {
    let fx = Fixture::new();
    let home = fx.root.path().join("home/player");
    let prefix = home.join(".wine");
    fx.write_prefix(&prefix, "Songs");
    fs::create_dir_all(prefix.join("drive_c/Games/osu!/Songs")).unwrap();

    // No WINEPREFIX in the environment, no login session: the resolver
    // assumes uid 1000 and derives the prefix from that user's home.
    fx.write_proc(b"HOME=/ignored\0PATH=/usr/bin\0", "4294967295");
    fx.write_passwd(&format!(
        "root:x:0:0:root:/root:/bin/bash\nplayer:x:1000:1000::{}:/bin/bash\n",
        home.display()
    ));

    let songs = fx.resolver().resolve(PID).unwrap();

    let expected = fs::canonicalize(prefix.join("drive_c/Games/osu!/Songs")).unwrap();
    assert_eq!(songs, expected);
}

#[test]
fn test_resolve_absolute_beatmap_directory() {
    let fx = Fixture::new();
    let prefix = fx.root.path().join("wineprefix");
    fx.write_prefix(&prefix, r"D:\Beatmaps");

    // d: points outside the prefix entirely.
    let external = fx.root.path().join("external");
    fs::create_dir_all(external.join("Beatmaps")).unwrap();
    symlink(&external, prefix.join("dosdevices/d:")).unwrap();

    let environ = format!("WINEPREFIX={}\0", prefix.display());
    fx.write_proc(environ.as_bytes(), "1000");
    fx.write_passwd("player:x:1000:1000::/home/player:/bin/bash\n");

    let songs = fx.resolver().resolve(PID).unwrap();

    let expected = fs::canonicalize(external.join("Beatmaps")).unwrap();
    assert_eq!(songs, expected);
}

#[test]
fn test_resolve_fails_without_registry_entry() {
    let fx = Fixture::new();
    let prefix = fx.root.path().join("wineprefix");
    fs::create_dir_all(prefix.join("dosdevices")).unwrap();

    let environ = format!("WINEPREFIX={}\0", prefix.display());
    fx.write_proc(environ.as_bytes(), "1000");
    fx.write_passwd("player:x:1000:1000::/home/player:/bin/bash\n");

    assert!(fx.resolver().resolve(PID).is_err());
}

#[test]
fn test_resolve_fails_for_unknown_uid() {
    let fx = Fixture::new();
    fx.write_proc(b"", "1234");
    fx.write_passwd("root:x:0:0:root:/root:/bin/bash\n");

    assert!(fx.resolver().resolve(PID).is_err());
}
