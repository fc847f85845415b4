//! Structured Logging with Sensitive Data Redaction
//!
//! Every field passed to the `log_*!` macros is classified by its key before
//! it is formatted:
//! - secret material (keys, seeds, mnemonics, passphrases, WIF) is masked
//! - addresses keep their prefix and last few characters
//! - everything else is printed as-is
//!
//! Entries go to stderr so stdout stays clean for command output.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Minimum level that reaches stderr
static MAX_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Set the lowest level that is emitted
pub fn set_max_level(level: LogLevel) {
    MAX_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Check whether entries at `level` are emitted
pub fn is_enabled(level: LogLevel) -> bool {
    level as u8 >= MAX_LEVEL.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key fragments whose values are never printed
const SECRET_KEYS: &[&str] = &[
    "private",
    "secret",
    "seed",
    "mnemonic",
    "phrase",
    "wif",
    "chain_code",
    "import_format",
];

/// Characters of an address body kept on each side of the elision
const ADDRESS_KEEP: usize = 4;

/// How a field value is treated on its way to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    Secret,
    Address,
    Plain,
}

impl Sensitivity {
    /// Classify a field by its key name
    pub fn of(key: &str) -> Self {
        let key = key.to_ascii_lowercase();
        if SECRET_KEYS.iter().any(|fragment| key.contains(fragment)) {
            Self::Secret
        } else if key.contains("address") {
            Self::Address
        } else {
            Self::Plain
        }
    }

    pub fn apply(self, value: String) -> String {
        match self {
            Self::Secret => mask(&value),
            Self::Address => elide_address(&value),
            Self::Plain => value,
        }
    }
}

fn mask(value: &str) -> String {
    match value.chars().count() {
        0 => "[EMPTY]".to_string(),
        n => format!("[REDACTED len={}]", n),
    }
}

/// `bitcoincash:qqyx...3q6` style elision; `0x` and `hrp:` prefixes are kept
fn elide_address(address: &str) -> String {
    let address = address.trim();
    let (prefix, body) = match address.split_once(':') {
        Some((hrp, rest)) => (&address[..hrp.len() + 1], rest),
        None if address.starts_with("0x") => address.split_at(2),
        None => ("", address),
    };

    let chars: Vec<char> = body.chars().collect();
    if chars.len() <= ADDRESS_KEEP * 3 {
        return mask(address);
    }

    let head: String = chars[..ADDRESS_KEEP].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_KEEP..].iter().collect();
    format!("{}{}...{}", prefix, head, tail)
}

/// One log line: level, emitting module, message and redacted fields
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Attach a field, redacted according to [`Sensitivity::of`] its key
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value = Sensitivity::of(key).apply(value.to_string());
        self.fields.push((key, value));
        self
    }

    /// The line as written, without the timestamp
    pub fn render(&self) -> String {
        let mut line = format!("{} [{}] {}", self.level, self.module, self.message);
        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push_str(if i == 0 { " | " } else { " " });
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line
    }

    pub fn log(self) {
        if is_enabled(self.level) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
            eprintln!("[{}] {}", timestamp, self.render());
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:ident, $module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::utils::logging::LogEntry::new($crate::utils::logging::LogLevel::$level, $module, $msg)
            $(.field(stringify!($key), &$value))*
            .log()
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($args:tt)*) => { $crate::log_at!(Debug, $($args)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($args:tt)*) => { $crate::log_at!(Info, $($args)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($args:tt)*) => { $crate::log_at!(Warn, $($args)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($args:tt)*) => { $crate::log_at!(Error, $($args)*) };
}
