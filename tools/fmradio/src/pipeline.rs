// SPDX-License-Identifier: MIT

//! External audio pipelines run via a shell-out, exactly as
//! `original_source/linux-si470x.c` does through its two `execl("/bin/sh",
//! "sh", "-c", command, ...)` branches. spec.md §9 explicitly allows a
//! rewrite to retain this rather than reimplementing `arecord`/`oggenc`.

use std::process::{Child, Command};

use crate::cli::CliError;

/// Pipe raw capture audio through `oggenc` into `path`, matching the
/// original's compressed-recording branch.
pub fn spawn_record_to_file(alsa_device: &str, path: &str) -> Result<Child, CliError> {
    let command = format!(
        "arecord -q -D '{alsa_device}' -r96000 -c2 -f S16_LE | \
         oggenc -Q --resample 48000 -q 5 -o '{path}' -"
    );
    spawn_shell(&command)
}

/// Monitor capture audio live through `aplay`, used when neither `-j` nor
/// `-o` select a different audio path.
pub fn spawn_monitor(alsa_device: &str) -> Result<Child, CliError> {
    let command =
        format!("arecord -q -D '{alsa_device}' -r96000 -c2 -f S16_LE | aplay -q -B -");
    spawn_shell(&command)
}

fn spawn_shell(command: &str) -> Result<Child, CliError> {
    Command::new("/bin/sh")
        .arg("-c")
        .arg(command)
        .spawn()
        .map_err(|e| CliError::Pipeline(format!("{command}: {e}")))
}
