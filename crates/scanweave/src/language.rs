//! Recognition language validation.
//!
//! Requests may carry a single code or a '+'-joined list (`"spa+eng"`).
//! Codes are checked against the locally installed set probed from the
//! binary; anything that does not survive validation is substituted with the
//! fixed default, logged, and never fails the request.

use crate::config::LocalEngineConfig;
use std::collections::HashSet;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Substituted when no requested language survives validation.
pub const DEFAULT_LANGUAGE: &str = "spa";

/// Assumed installed when the binary cannot be probed.
pub const FALLBACK_LANGUAGES: [&str; 2] = ["eng", "spa"];

lazy_static::lazy_static! {
    /// Codes with published tesseract training data. Used to distinguish a
    /// valid-but-not-installed code from a typo in log output.
    pub static ref KNOWN_LANGUAGE_CODES: HashSet<&'static str> = [
        "afr", "amh", "ara", "asm", "aze", "aze_cyrl", "bel", "ben", "bod",
        "bos", "bre", "bul", "cat", "ceb", "ces", "chi_sim", "chi_tra", "chr",
        "cos", "cym", "dan", "deu", "div", "dzo", "ell", "eng", "enm", "epo",
        "equ", "est", "eus", "fao", "fas", "fil", "fin", "fra", "frk", "frm",
        "fry", "gla", "gle", "glg", "grc", "guj", "hat", "heb", "hin", "hrv",
        "hun", "hye", "iku", "ind", "isl", "ita", "ita_old", "jav", "jpn",
        "kan", "kat", "kat_old", "kaz", "khm", "kir", "kmr", "kor", "lao",
        "lat", "lav", "lit", "ltz", "mal", "mar", "mkd", "mlt", "mon", "mri",
        "msa", "mya", "nep", "nld", "nor", "oci", "ori", "osd", "pan", "pol",
        "por", "pus", "que", "ron", "rus", "san", "sin", "slk", "slv", "snd",
        "spa", "spa_old", "sqi", "srp", "srp_latn", "sun", "swa", "swe",
        "syr", "tam", "tat", "tel", "tgk", "tha", "tir", "ton", "tur", "uig",
        "ukr", "urd", "uzb", "uzb_cyrl", "vie", "yid", "yor",
    ]
    .into_iter()
    .collect();
}

/// Probe the local binary for its installed languages.
///
/// Runs `<binary> --list-langs` and parses the listing (first line is a
/// header). Any failure, including a missing binary, falls back to
/// [`FALLBACK_LANGUAGES`] with a warning rather than erroring.
pub async fn available_languages(config: &LocalEngineConfig) -> Vec<String> {
    let fallback = || FALLBACK_LANGUAGES.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let mut command = Command::new(&config.binary_path);
    command.arg("--list-langs");
    if let Some(dir) = &config.tessdata_dir {
        command.arg("--tessdata-dir").arg(dir);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout(Duration::from_secs(config.timeout_seconds), command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!("Could not run '{} --list-langs': {}", config.binary_path, e);
            return fallback();
        }
        Err(_) => {
            warn!("'{} --list-langs' timed out", config.binary_path);
            return fallback();
        }
    };

    if !output.status.success() {
        warn!(
            "'{} --list-langs' exited with {}: {}",
            config.binary_path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return fallback();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let languages: Vec<String> = stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if languages.is_empty() {
        warn!("'{} --list-langs' returned no languages", config.binary_path);
        fallback()
    } else {
        languages
    }
}

/// Validate a requested language against the installed set.
///
/// Splits on '+', ',' and whitespace, keeps the segments that are installed,
/// and rejoins them with '+'. When nothing survives, the substitution to
/// [`DEFAULT_LANGUAGE`] is logged but the request is never failed.
pub fn normalize_language(requested: &str, available: &[String]) -> String {
    let mut valid: Vec<&str> = Vec::new();

    for segment in requested.split(|c: char| c == '+' || c == ',' || c.is_whitespace()) {
        if segment.is_empty() {
            continue;
        }
        if available.iter().any(|a| a == segment) {
            valid.push(segment);
        } else if KNOWN_LANGUAGE_CODES.contains(segment) {
            debug!("Language '{}' is a valid code but not installed locally", segment);
        } else {
            warn!("Unrecognized language code '{}'", segment);
        }
    }

    if valid.is_empty() {
        warn!(
            "No usable language in '{}', substituting '{}'",
            requested, DEFAULT_LANGUAGE
        );
        DEFAULT_LANGUAGE.to_string()
    } else {
        valid.join("+")
    }
}
