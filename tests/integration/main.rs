//! Integration tests for tce-fetch

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn tce_fetch() -> Command {
        cargo_bin_cmd!("tce-fetch")
    }

    #[test]
    fn help_displays() {
        tce_fetch()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Fetch Tiny Core Linux extensions and their dependencies",
            ));
    }

    #[test]
    fn version_displays() {
        tce_fetch()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tce-fetch"));
    }

    #[test]
    fn get_requires_extension() {
        tce_fetch()
            .arg("get")
            .assert()
            .failure()
            .stderr(predicate::str::contains("EXTENSION"));
    }

    #[test]
    fn completions_generate() {
        tce_fetch()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tce-fetch"));
    }

    #[test]
    fn config_path_honors_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");

        tce_fetch()
            .args(["config", "path", "--config"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = tempfile::TempDir::new().unwrap();

        tce_fetch()
            .args(["config", "show", "--config"])
            .arg(dir.path().join("missing.toml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("[repository]"))
            .stdout(predicate::str::contains("tinycorelinux.net"));
    }
}

/// Runs against a pre-populated cache; the mirror points at a closed port
/// so any unexpected request fails the test.
mod offline_cache {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                dir: TempDir::new().unwrap(),
            };
            fs::create_dir_all(fixture.cache_dir()).unwrap();
            fixture
        }

        fn cache_dir(&self) -> PathBuf {
            self.dir.path().join("8.x").join("x86")
        }

        fn write(&self, file: &str, content: &[u8]) -> &Self {
            fs::write(self.cache_dir().join(file), content).unwrap();
            self
        }

        /// Payload, matching checksum and dependency list
        fn package(&self, name: &str, payload: &[u8], deps: &[&str]) -> &Self {
            let digest = format!("{:x}", md5::compute(payload));
            let dep_file: String = deps.iter().map(|d| format!("{}.tcz\n", d)).collect();
            self.write(&format!("{}.tcz", name), payload)
                .write(
                    &format!("{}.tcz.md5.txt", name),
                    format!("{}  {}.tcz\n", digest, name).as_bytes(),
                )
                .write(&format!("{}.tcz.dep", name), dep_file.as_bytes())
        }

        fn command(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("tce-fetch");
            cmd.env("CI", "1")
                .env_remove("RUST_LOG")
                .arg("--config")
                .arg(self.dir.path().join("no-config.toml"));
            cmd
        }

        fn out_template(&self) -> String {
            format!("{}/%v/%a", self.dir.path().display())
        }

        fn get(&self, names: &[&str]) -> assert_cmd::assert::Assert {
            self.command()
                .args(["get", "--mirror", "http://127.0.0.1:9", "--arch", "x86"])
                .args(["--release", "8.x", "--out", &self.out_template()])
                .args(names)
                .assert()
        }

        fn path(&self, file: &str) -> PathBuf {
            self.cache_dir().join(file)
        }
    }

    fn is_empty_file(path: &Path) -> bool {
        fs::metadata(path).map(|m| m.len() == 0).unwrap_or(false)
    }

    #[test]
    fn resolves_closure_from_cache() {
        let fx = Fixture::new();
        fx.package("openssh", b"ssh payload", &["openssl", "zlib"])
            .package("openssl", b"ssl payload", &["zlib"])
            .package("zlib", b"zlib payload", &[]);

        fx.get(&["openssh"])
            .success()
            .stdout(predicate::str::contains("Checking openssh.tcz... Present!"))
            .stdout(predicate::str::contains("Checking zlib.tcz... Present!"))
            .stdout(predicate::str::contains("Retrieved openssh successfully"))
            .stdout(predicate::str::contains("3 extension(s) ready"));
    }

    #[test]
    fn shared_dependency_checked_once() {
        let fx = Fixture::new();
        fx.package("openssh", b"ssh", &["openssl", "zlib"])
            .package("openssl", b"ssl", &["zlib"])
            .package("zlib", b"z", &[]);

        let output = fx.get(&["zlib", "openssh"]).success().get_output().stdout.clone();
        let stdout = String::from_utf8(output).unwrap();

        assert_eq!(stdout.matches("Checking zlib.tcz...").count(), 1);
        assert_eq!(stdout.matches("Checking openssl.tcz...").count(), 1);
    }

    #[test]
    fn accepts_tcz_suffix_on_request() {
        let fx = Fixture::new();
        fx.package("bash", b"bash", &[]);

        fx.get(&["bash.tcz"])
            .success()
            .stdout(predicate::str::contains("Retrieved bash successfully"));
    }

    #[test]
    fn known_absent_payload_fails_but_others_continue() {
        let fx = Fixture::new();
        fx.write("ghost.tcz", b"").package("bash", b"bash", &[]);

        fx.get(&["ghost", "bash"])
            .failure()
            .stdout(predicate::str::contains("Known absent!"))
            .stdout(predicate::str::contains("Failed to get ghost"))
            .stdout(predicate::str::contains("Extension not found: ghost"))
            .stdout(predicate::str::contains("Retrieved bash successfully"))
            .stderr(predicate::str::contains("1 of 2 requested extension(s) failed"));
    }

    #[test]
    fn checksum_mismatch_reported() {
        let fx = Fixture::new();
        fx.write("zlib.tcz", b"tampered")
            .write("zlib.tcz.md5.txt", b"00000000000000000000000000000000  zlib.tcz\n")
            .write("zlib.tcz.dep", b"");

        fx.get(&["zlib"])
            .failure()
            .stdout(predicate::str::contains("does not match"))
            .stdout(predicate::str::contains("00000000000000000000000000000000"));
    }

    #[test]
    fn kernel_placeholder_uses_flag() {
        let fx = Fixture::new();
        fx.package("alsa", b"alsa", &["alsa-modules-KERNEL"])
            .package("alsa-modules-6.1.2-tinycore", b"mods", &[]);

        fx.command()
            .args(["get", "--mirror", "http://127.0.0.1:9", "--kernel", "6.1.2-tinycore"])
            .args(["--out", &fx.out_template(), "alsa"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Checking alsa-modules-6.1.2-tinycore.tcz... Present!",
            ));

        assert!(!fx.path("alsa-modules-KERNEL.tcz").exists());
    }

    #[test]
    fn unreachable_mirror_is_transport_error() {
        let fx = Fixture::new();
        fx.write("app.tcz", b"app").write("app.tcz.md5.txt", b"");

        fx.get(&["app"])
            .failure()
            .stdout(predicate::str::contains("Downloading app.tcz.dep... Failed!"));

        // Nothing was written for the failed request
        assert!(!fx.path("app.tcz.dep").exists());
        assert!(is_empty_file(&fx.path("app.tcz.md5.txt")));
    }

    #[test]
    fn cache_list_json() {
        let fx = Fixture::new();
        fx.write("zlib.tcz", b"zlib").write("zlib.tcz.md5.txt", b"");

        fx.command()
            .args(["cache", "list", "--format", "json", "--out", &fx.out_template()])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"known_absent\""))
            .stdout(predicate::str::contains("\"present\""));
    }

    #[test]
    fn cache_status_does_not_fetch() {
        let fx = Fixture::new();
        fx.write("zlib.tcz", b"zlib");

        fx.command()
            .args(["cache", "status", "--mirror", "http://127.0.0.1:9"])
            .args(["--out", &fx.out_template(), "zlib"])
            .assert()
            .success()
            .stdout(predicate::str::contains("present"))
            .stdout(predicate::str::contains("not fetched"));

        assert!(!fx.path("zlib.tcz.dep").exists());
    }

    #[test]
    fn cache_list_missing_directory() {
        let dir = TempDir::new().unwrap();

        cargo_bin_cmd!("tce-fetch")
            .env("CI", "1")
            .arg("--config")
            .arg(dir.path().join("none.toml"))
            .args(["cache", "list", "--out"])
            .arg(dir.path().join("nowhere"))
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache at"));
    }
}
