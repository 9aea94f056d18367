//! Throwaway shell scripts standing in for yt-dlp
//!
//! Scripts are run as `/bin/sh <script> <yt-dlp args...>`, so they need no
//! executable bit.

use std::path::{Path, PathBuf};

/// Parses `-o <template>` and `-- <url>`, then writes an mp4 to the template
pub const SUCCESS_SCRIPT: &str = r#"
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) shift; out="$1" ;;
    --) shift; break ;;
  esac
  shift
done
file=$(printf '%s' "$out" | sed 's/%(ext)s/mp4/')
printf 'fake video for %s' "$1" > "$file"
"#;

/// Fails the way yt-dlp does for a private video
pub const PRIVATE_SCRIPT: &str = r#"
echo "ERROR: [Instagram] C1x2y3z4: Private video. Sign in if you've been granted access" >&2
exit 1
"#;

/// Fails the way yt-dlp does for a removed video
pub const REMOVED_SCRIPT: &str = r#"
echo "ERROR: [youtube] dQw4w9WgXcQ: Video unavailable" >&2
exit 1
"#;

/// Exits cleanly without writing anything
pub const SILENT_SCRIPT: &str = "exit 0\n";

/// Floods stderr well past any pipe buffer, then fails
pub const NOISY_SCRIPT: &str = r#"
i=0
while [ $i -lt 4000 ]; do
  echo "WARNING: line $i of diagnostic output padding padding padding padding" >&2
  i=$((i + 1))
done
exit 3
"#;

/// Like [`SUCCESS_SCRIPT`], but keeps running for `seconds` after the file exists
pub fn lingering_success_script(seconds: u32) -> String {
    format!("{SUCCESS_SCRIPT}sleep {seconds}\n")
}

/// Writes its argument vector, one per line, to `args_file`
pub fn echo_args_script(args_file: &Path) -> String {
    format!(
        "for a in \"$@\"; do printf '%s\\n' \"$a\" >> '{}'; done\nexit 1\n",
        args_file.display()
    )
}

/// Records its pid in `pid_file`, then hangs
pub fn hanging_script(pid_file: &Path) -> String {
    format!(
        "echo $$ > '{}'\necho '[youtube] x: Downloading webpage' >&2\nexec sleep 30\n",
        pid_file.display()
    )
}

/// Write `body` to `<dir>/<name>.sh`
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(format!("{name}.sh"));
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("failed to write script");
    path
}

/// Whether a process with `pid` still exists
pub fn process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
